//! Ad form: prompts and input handling for users

use indoc::formatdoc;
use teloxide::types::ReplyMarkup;

use super::types::{CallbackAnswer, HandlerDeps};
use crate::ads::Role;
use crate::conversation::{Conversation, Input, Session, Step, Transition};
use crate::core::settings::PaymentInfo;
use crate::telegram::keyboards::{self, cancel_keyboard, gender_keyboard, main_menu, remove_keyboard, role_menu};
use crate::telegram::platform::MessageRef;

/// Payment instructions shown before the proof image is requested
pub fn payment_prompt(payment: &PaymentInfo) -> String {
    formatdoc! {"
        📋 Ma'lumotlar qabul qilindi!

        E'lonni kanallarga joylash pullik.
        Narxi: {price}

        💳 Karta: {card}
        👤 Egasi: {owner}

        Iltimos, to'lov qiling va chek rasmini shu yerga yuboring.",
        price = payment.price,
        card = payment.card,
        owner = payment.owner,
    }
}

/// Question asked when the form enters `step`.
pub fn prompt_for(step: Step, role: Role, payment: &PaymentInfo) -> (String, Option<ReplyMarkup>) {
    let cancel = Some(cancel_keyboard());
    let (text, markup) = match step {
        Step::RoleSelection => ("Assalomu alaykum!\n\nSiz kimsiz?", Some(role_menu())),
        Step::Region => ("📍 Hududni kiriting:", cancel),
        Step::Gender => ("Jinsingizni tanlang:", Some(gender_keyboard())),
        Step::FullName => ("Ism sharifingizni kiriting:", cancel),
        Step::Age => ("Yoshingiz:", cancel),
        Step::Skill => ("Kasbiy mahoratingiz (nima ish qila olasiz):", cancel),
        Step::Responsibility => ("Mas'uliyatingiz (qaysi ishlarga javob bera olasiz):", cancel),
        Step::AgeRange => ("Yosh chegarasini kiriting:\n(Masalan: 20-30 yosh)", cancel),
        Step::Requirements => ("❗️ Talablar va vazifalarni yozing:\n(Xodim nima ish qilishi kerak?)", cancel),
        Step::WorkHours => ("⏰ Ish vaqtini kiriting:", cancel),
        Step::FreeTime => ("Bo'sh vaqtingiz bormi? (bo'lsa yozing):", cancel),
        Step::ExtraNotes => match role {
            Role::Seeker => ("Qo'shimcha ma'lumotlar (ixtiyoriy):", cancel),
            Role::Employer => ("ℹ️ Qo'shimcha ma'lumotlar (Manzil, mo'ljal va h.k):", cancel),
        },
        Step::Salary => match role {
            Role::Seeker => ("💰 Qancha maosh kutmoqdasiz?", cancel),
            Role::Employer => ("💰 Qancha maosh bermoqchisiz?", cancel),
        },
        Step::Phone => ("📞 Telefon raqamingiz:", cancel),
        Step::Video => (
            "Agar xohlasangiz video yuboring yoki o'tkazib yuboring.",
            Some(keyboards::skip_video_menu()),
        ),
        Step::ProofImage => return (payment_prompt(payment), cancel),
        Step::ModerationWait => ("⏳ Chek adminga yuborildi.", Some(remove_keyboard())),
    };
    (text.to_string(), markup)
}

/// Turns a text message into form input. Button labels only count on the
/// step that shows them.
pub fn classify_text(step: Step, text: &str) -> Input {
    match (step, text) {
        (Step::RoleSelection, keyboards::ROLE_SEEKER) => Input::Role(Role::Seeker),
        (Step::RoleSelection, keyboards::ROLE_EMPLOYER) => Input::Role(Role::Employer),
        (Step::Video, keyboards::SKIP_VIDEO) => Input::SkipVideo,
        _ => Input::Text(text.to_string()),
    }
}

/// Starts a fresh form, discarding whatever the user was doing.
pub async fn start(deps: &HandlerDeps, slot: &mut Option<Session>, chat_id: i64) {
    *slot = Some(Session::Form(Conversation::new()));
    let payment = deps.settings.payment().await;
    let (text, markup) = prompt_for(Step::RoleSelection, Role::Seeker, &payment);
    deps.say(chat_id, &text, markup).await;
}

/// Feeds one input into the user's form.
pub async fn on_input(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    user_id: i64,
    chat_id: i64,
    input: Input,
) -> Option<CallbackAnswer> {
    let Some(Session::Form(conversation)) = slot.as_mut() else {
        return None;
    };

    match conversation.apply(input) {
        Transition::Advanced(step) => {
            let role = conversation.role().unwrap_or(Role::Seeker);
            if step == Step::Region {
                deps.say(chat_id, "Ajoyib. Endi e’lon berishingiz mumkin.", Some(remove_keyboard()))
                    .await;
            }
            let payment = deps.settings.payment().await;
            let (text, markup) = prompt_for(step, role, &payment);
            deps.say(chat_id, &text, markup).await;
            Some(CallbackAnswer::default())
        }
        Transition::Completed(form) => {
            let (temp_id, report) = deps.moderation.submit(form, user_id).await;
            log::info!(
                "User {} submitted {} ({} admin(s) notified, {} failed)",
                user_id,
                temp_id,
                report.delivered.len(),
                report.failed.len()
            );
            let payment = deps.settings.payment().await;
            let (text, markup) = prompt_for(Step::ModerationWait, Role::Seeker, &payment);
            deps.say(chat_id, &text, markup).await;
            None
        }
        Transition::Ignored => None,
    }
}

/// Cancels an unfinished form or admin prompt.
///
/// A form already handed to moderation cannot be taken back.
pub async fn cancel(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    chat_id: i64,
    origin: Option<MessageRef>,
) -> Option<CallbackAnswer> {
    let menu = match slot {
        Some(Session::Form(conversation)) if conversation.is_terminal() => {
            return Some(CallbackAnswer::text("E'loningiz moderatsiyada."));
        }
        Some(Session::Admin(_)) => keyboards::admin_menu(),
        _ => main_menu(),
    };
    *slot = None;

    if let Some(origin) = origin {
        if let Err(e) = deps.platform.edit_text(origin, "Jarayon bekor qilindi.").await {
            log::debug!("Could not edit cancelled prompt: {}", e);
        }
    }
    deps.say(chat_id, "Bosh menyu:", Some(menu)).await;
    Some(CallbackAnswer::default())
}
