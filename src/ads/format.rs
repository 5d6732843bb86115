//! Display text for ads.
//!
//! Public channel copies are rendered without the phone line, archive copies
//! and admin previews with it.

use crate::ads::submission::{fields, Gender, Role, Submission};

/// Shown for any field the submission does not carry
pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub include_code: bool,
    pub with_phone: bool,
}

impl FormatOptions {
    /// Copy posted to the public channel
    pub const PUBLIC: FormatOptions = FormatOptions {
        include_code: true,
        with_phone: false,
    };
    /// Copy posted to the hidden archive channel
    pub const ARCHIVE: FormatOptions = FormatOptions {
        include_code: true,
        with_phone: true,
    };
    /// What admins see while the ad is pending
    pub const PREVIEW: FormatOptions = FormatOptions {
        include_code: false,
        with_phone: true,
    };
}

fn value<'a>(ad: &'a Submission, key: &str) -> &'a str {
    ad.get(key).filter(|v| !v.trim().is_empty()).unwrap_or(PLACEHOLDER)
}

fn gender_label(ad: &Submission) -> &str {
    match ad.gender() {
        Some(gender) => gender.label(),
        None => value(ad, fields::GENDER),
    }
}

fn push_line(text: &mut String, label: &str, val: &str) {
    text.push_str(label);
    text.push_str(": ");
    text.push_str(val);
    text.push('\n');
}

/// Renders an ad. Never fails; absent fields become [`PLACEHOLDER`].
pub fn format_ad(ad: &Submission, options: FormatOptions) -> String {
    let mut text = String::new();

    match ad.role() {
        Some(Role::Employer) => {
            text.push_str("🏢 ISHCHI KERAK\n\n");
            push_line(&mut text, "📍 Hudud", value(ad, fields::REGION));
            push_line(&mut text, "🚻 Xodim jinsi", gender_label(ad));
            push_line(&mut text, "🆔 Yosh chegarasi", value(ad, fields::AGE_RANGE));
            push_line(&mut text, "❗️ Talablar", value(ad, fields::REQUIREMENTS));
            push_line(&mut text, "⏰ Ish vaqti", value(ad, fields::WORK_HOURS));
            push_line(&mut text, "🧰 Qo‘shimcha", value(ad, fields::EXTRA_NOTES));
            push_line(&mut text, "💰 Maosh", value(ad, fields::SALARY_OFFER));
        }
        // Unknown roles fall back to the seeker layout, the wider of the two
        Some(Role::Seeker) | None => {
            text.push_str("👷‍♂️ ISH QIDIRYAPMAN\n\n");
            push_line(&mut text, "📍 Hudud", value(ad, fields::REGION));
            push_line(&mut text, "🚻 Jinsi", gender_label(ad));
            push_line(&mut text, "🙎 I. Sh.", value(ad, fields::FULL_NAME));
            push_line(&mut text, "🆔 Yoshi", value(ad, fields::AGE));
            push_line(&mut text, "🧑‍💻 Kasbiy mahorati", value(ad, fields::SKILL));
            push_line(&mut text, "📌 Mas’uliyati", value(ad, fields::RESPONSIBILITY));
            push_line(&mut text, "⏰ Ish vaqti", value(ad, fields::WORK_HOURS));
            push_line(&mut text, "🕒 Bo‘sh vaqt", value(ad, fields::FREE_TIME));
            push_line(&mut text, "🧰 Qo‘shimcha", value(ad, fields::EXTRA_NOTES));
            push_line(&mut text, "💰 Maosh", value(ad, fields::SALARY_EXPECTATION));
        }
    }

    if options.with_phone {
        push_line(&mut text, "📞 Aloqa", value(ad, fields::PHONE));
    }

    if options.include_code {
        if let Some(code) = ad.code() {
            text.push_str("\n🔎 E’lon kodi: ");
            text.push_str(code);
        }
    }

    text
}

/// Routing check: anything that is not male goes to the female channel.
pub fn is_male(ad: &Submission) -> bool {
    ad.gender() == Some(Gender::Male)
}
