//! Reply and inline keyboards, button labels and callback data.
//!
//! Callback formats:
//! - `cancel_form`
//! - `gender:<male|female>`
//! - `channel:<male|female|hidden>`
//! - `pay:<card|owner|price>`
//! - `mod:<approve|reject|edit_text|attach_photo>:<temp id>`

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup,
};

use crate::ads::Gender;
use crate::core::settings::{ChannelKind, PaymentField};

pub const START_AD: &str = "📝 E’lon berish";
pub const ROLE_SEEKER: &str = "👷‍♂️ Ish qidiryapman";
pub const ROLE_EMPLOYER: &str = "🏢 Ish beruvchiman";
pub const SKIP_VIDEO: &str = "➡️ Videoni o'tkazib yuborish";

pub const ADMIN_SEARCH: &str = "🔎 Kod orqali qidirish";
pub const ADMIN_CHANNELS: &str = "⚙️ Kanal sozlamalari";
pub const ADMIN_PAYMENT: &str = "💳 To'lov sozlamalari";
pub const ADMIN_ADD: &str = "➕ Admin qo'shish";
pub const ADMIN_REMOVE: &str = "➖ Admin o'chirish";
pub const ADMIN_LIST: &str = "📋 Adminlar ro'yxati";
pub const USER_MODE: &str = "👤 Foydalanuvchi rejimi";

pub const LINK_BUTTON: &str = "↗️ E'lonni ko'rish va Obuna bo'lish";

/// Moderation buttons on an admin's copy of a new ad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ModAction {
    Approve,
    Reject,
    EditText,
    AttachPhoto,
}

impl ModAction {
    fn label(self) -> &'static str {
        match self {
            ModAction::Approve => "✅ Tasdiqlash",
            ModAction::Reject => "❌ Rad etish",
            ModAction::EditText => "✏️ Matnni tahrirlash",
            ModAction::AttachPhoto => "🖼 Rasm biriktirish",
        }
    }
}

/// Parsed inline-button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    CancelForm,
    Gender(Gender),
    SetChannel(ChannelKind),
    SetPayment(PaymentField),
    Moderate(ModAction, String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if data == "cancel_form" {
            return Some(CallbackAction::CancelForm);
        }
        let (prefix, rest) = data.split_once(':')?;
        match prefix {
            "gender" => rest.parse().ok().map(CallbackAction::Gender),
            "channel" => rest.parse().ok().map(CallbackAction::SetChannel),
            "pay" => rest.parse().ok().map(CallbackAction::SetPayment),
            "mod" => {
                let (action, temp_id) = rest.split_once(':')?;
                if temp_id.is_empty() {
                    return None;
                }
                Some(CallbackAction::Moderate(action.parse().ok()?, temp_id.to_string()))
            }
            _ => None,
        }
    }

    pub fn to_data(&self) -> String {
        match self {
            CallbackAction::CancelForm => "cancel_form".to_string(),
            CallbackAction::Gender(gender) => format!("gender:{}", gender),
            CallbackAction::SetChannel(kind) => format!("channel:{}", kind),
            CallbackAction::SetPayment(field) => format!("pay:{}", field),
            CallbackAction::Moderate(action, temp_id) => format!("mod:{}:{}", action, temp_id),
        }
    }
}

fn reply_keyboard(rows: Vec<Vec<&str>>) -> ReplyMarkup {
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    KeyboardMarkup::new(rows).resize_keyboard().into()
}

pub fn role_menu() -> ReplyMarkup {
    reply_keyboard(vec![vec![ROLE_SEEKER], vec![ROLE_EMPLOYER]])
}

pub fn main_menu() -> ReplyMarkup {
    reply_keyboard(vec![vec![START_AD]])
}

pub fn skip_video_menu() -> ReplyMarkup {
    reply_keyboard(vec![vec![SKIP_VIDEO]])
}

pub fn admin_menu() -> ReplyMarkup {
    reply_keyboard(vec![
        vec![ADMIN_SEARCH, ADMIN_CHANNELS],
        vec![ADMIN_PAYMENT, ADMIN_ADD],
        vec![ADMIN_REMOVE, ADMIN_LIST],
        vec![USER_MODE],
    ])
}

pub fn remove_keyboard() -> ReplyMarkup {
    KeyboardRemove::new().into()
}

fn callback_button(label: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.to_string(), action.to_data())
}

pub fn cancel_keyboard() -> ReplyMarkup {
    InlineKeyboardMarkup::new(vec![vec![callback_button("❌ Bekor qilish", CallbackAction::CancelForm)]]).into()
}

pub fn gender_keyboard() -> ReplyMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        callback_button("🚹 Erkak", CallbackAction::Gender(Gender::Male)),
        callback_button("👩 Ayol", CallbackAction::Gender(Gender::Female)),
    ]])
    .into()
}

pub fn channel_settings_keyboard() -> ReplyMarkup {
    let rows = ChannelKind::iter()
        .map(|kind| vec![callback_button(kind.label(), CallbackAction::SetChannel(kind))])
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows).into()
}

pub fn payment_settings_keyboard() -> ReplyMarkup {
    let rows = PaymentField::iter()
        .map(|field| vec![callback_button(field.label(), CallbackAction::SetPayment(field))])
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows).into()
}

pub fn moderation_keyboard(temp_id: &str) -> ReplyMarkup {
    let button = |action: ModAction| callback_button(action.label(), CallbackAction::Moderate(action, temp_id.to_string()));
    InlineKeyboardMarkup::new(vec![
        vec![button(ModAction::Approve), button(ModAction::Reject)],
        vec![button(ModAction::EditText), button(ModAction::AttachPhoto)],
    ])
    .into()
}

/// Single URL button; `None` if the link is not a valid URL
pub fn link_keyboard(link: &str) -> Option<ReplyMarkup> {
    let url = url::Url::parse(link).ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(LINK_BUTTON.to_string(), url)]]).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_data_parses_back() {
        let actions = [
            CallbackAction::CancelForm,
            CallbackAction::Gender(Gender::Female),
            CallbackAction::SetChannel(ChannelKind::Hidden),
            CallbackAction::SetPayment(PaymentField::Owner),
            CallbackAction::Moderate(ModAction::AttachPhoto, "TEMP-AB12CD34".to_string()),
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.to_data()), Some(action));
        }
        assert_eq!(
            CallbackAction::Moderate(ModAction::EditText, "TEMP-1".to_string()).to_data(),
            "mod:edit_text:TEMP-1"
        );
    }

    #[test]
    fn test_unknown_callback_data() {
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("gender:other"), None);
        assert_eq!(CallbackAction::parse("mod:approve:"), None);
        assert_eq!(CallbackAction::parse("mod:publish:TEMP-1"), None);
        assert_eq!(CallbackAction::parse("approve_TEMP-1"), None);
    }

    #[test]
    fn test_callback_data_fits_telegram_limit() {
        for action in ModAction::iter() {
            let data = CallbackAction::Moderate(action, "TEMP-ABCDEFGH".to_string()).to_data();
            assert!(data.len() <= 64, "{} is too long", data);
        }
    }

    #[test]
    fn test_link_keyboard_requires_valid_url() {
        assert!(link_keyboard("https://t.me/+AbCdEf").is_some());
        assert!(link_keyboard("not a link").is_none());
    }
}
