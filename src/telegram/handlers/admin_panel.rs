//! Admin panel: settings, admin list and ad search

use super::types::{CallbackAnswer, HandlerDeps};
use crate::ads::{format_ad, FormatOptions};
use crate::conversation::{AdminPrompt, Session};
use crate::core::error::AppError;
use crate::core::settings::{ChannelKind, PaymentField};
use crate::storage::db::{self, get_connection};
use crate::telegram::keyboards::{self, admin_menu, cancel_keyboard};

const NOT_A_NUMBER: &str = "Raqam bo'lishi kerak.";

/// Reply-keyboard buttons of the admin menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminButton {
    Search,
    Channels,
    Payment,
    AddAdmin,
    RemoveAdmin,
    ListAdmins,
}

impl AdminButton {
    pub fn from_label(text: &str) -> Option<Self> {
        match text {
            keyboards::ADMIN_SEARCH => Some(AdminButton::Search),
            keyboards::ADMIN_CHANNELS => Some(AdminButton::Channels),
            keyboards::ADMIN_PAYMENT => Some(AdminButton::Payment),
            keyboards::ADMIN_ADD => Some(AdminButton::AddAdmin),
            keyboards::ADMIN_REMOVE => Some(AdminButton::RemoveAdmin),
            keyboards::ADMIN_LIST => Some(AdminButton::ListAdmins),
            _ => None,
        }
    }
}

fn channel_value(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "yo'q".to_string())
}

fn payment_prompt(field: PaymentField) -> &'static str {
    match field {
        PaymentField::Card => "Yangi karta raqamini yuboring:",
        PaymentField::Owner => "Karta egasining ism-familiyasini yuboring:",
        PaymentField::Price => "Yangi narxni yuboring:\n(Masalan: 10 000 so'm)",
    }
}

fn payment_updated(field: PaymentField) -> &'static str {
    match field {
        PaymentField::Card => "✅ Karta raqami yangilandi.",
        PaymentField::Owner => "✅ Karta egasi yangilandi.",
        PaymentField::Price => "✅ Narx yangilandi.",
    }
}

/// `/admin`: shows the panel to admins, nothing to anyone else.
pub async fn open(deps: &HandlerDeps, slot: &mut Option<Session>, user_id: i64, chat_id: i64) {
    if !deps.settings.is_admin(user_id).await {
        return;
    }
    *slot = None;
    deps.say(chat_id, "Admin panel:", Some(admin_menu())).await;
}

/// Handles an admin menu button. The caller has checked admin rights.
pub async fn on_button(deps: &HandlerDeps, slot: &mut Option<Session>, chat_id: i64, button: AdminButton) {
    *slot = None;
    match button {
        AdminButton::Search => {
            *slot = Some(Session::Admin(AdminPrompt::SearchCode));
            deps.say(chat_id, "Kod kiriting:", Some(cancel_keyboard())).await;
        }
        AdminButton::Channels => {
            let state = deps.settings.snapshot().await;
            let text = format!(
                "🚹 Erkak: {}\n👩 Ayol: {}\n🔒 Yashirin: {}\n\nO'zgartirish uchun tanlang:",
                channel_value(state.channels.get(&ChannelKind::Male).copied()),
                channel_value(state.channels.get(&ChannelKind::Female).copied()),
                channel_value(state.channels.get(&ChannelKind::Hidden).copied()),
            );
            deps.say(chat_id, &text, Some(keyboards::channel_settings_keyboard())).await;
        }
        AdminButton::Payment => {
            let payment = deps.settings.payment().await;
            let text = format!(
                "Joriy sozlamalar:\n\n💳 Karta: {}\n👤 Ega: {}\n💰 Narx: {}\n\nO'zgartirish uchun tanlang:",
                payment.card, payment.owner, payment.price
            );
            deps.say(chat_id, &text, Some(keyboards::payment_settings_keyboard())).await;
        }
        AdminButton::AddAdmin => {
            *slot = Some(Session::Admin(AdminPrompt::NewAdminId));
            deps.say(chat_id, "ID yuboring:", Some(cancel_keyboard())).await;
        }
        AdminButton::RemoveAdmin => {
            *slot = Some(Session::Admin(AdminPrompt::RemoveAdminId));
            deps.say(chat_id, "ID yuboring:", Some(cancel_keyboard())).await;
        }
        AdminButton::ListAdmins => {
            let admins = deps.settings.admins().await;
            let lines: Vec<String> = admins.iter().map(|id| format!("• {}", id)).collect();
            deps.say(chat_id, &format!("👮‍♂️ Adminlar:\n\n{}", lines.join("\n")), None)
                .await;
        }
    }
}

/// Channel or payment setting picked from an inline keyboard.
pub async fn on_setting_choice(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    chat_id: i64,
    prompt: AdminPrompt,
) -> Option<CallbackAnswer> {
    let text = match &prompt {
        AdminPrompt::ChannelId(kind) => format!("{} uchun ID yuboring:\n(Masalan: -1001234567890)", kind.label()),
        AdminPrompt::Payment(field) => payment_prompt(*field).to_string(),
        _ => return None,
    };
    *slot = Some(Session::Admin(prompt));
    deps.say(chat_id, &text, Some(cancel_keyboard())).await;
    Some(CallbackAnswer::default())
}

/// Text answer to an admin prompt.
///
/// Input that doesn't parse keeps the prompt open; anything else closes it.
pub async fn on_prompt_text(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    chat_id: i64,
    prompt: AdminPrompt,
    text: &str,
) {
    let text = text.trim();
    match prompt {
        AdminPrompt::NewAdminId => {
            let Ok(new_id) = text.parse::<i64>() else {
                deps.say(chat_id, NOT_A_NUMBER, None).await;
                return;
            };
            *slot = None;
            match deps.settings.add_admin(new_id).await {
                Ok(()) => deps.say(chat_id, &format!("✅ {} admin qilindi.", new_id), Some(admin_menu())).await,
                Err(e) => report_error(deps, chat_id, e).await,
            }
        }
        AdminPrompt::RemoveAdminId => {
            let Ok(old_id) = text.parse::<i64>() else {
                deps.say(chat_id, NOT_A_NUMBER, None).await;
                return;
            };
            *slot = None;
            match deps.settings.remove_admin(old_id).await {
                Ok(true) => deps.say(chat_id, &format!("✅ {} o'chirildi.", old_id), Some(admin_menu())).await,
                Ok(false) => deps.say(chat_id, &format!("{} admin emas.", old_id), Some(admin_menu())).await,
                Err(AppError::SuperAdminProtected(_)) => {
                    deps.say(chat_id, "Asosiy adminni o'chirolmaysiz!", Some(admin_menu())).await
                }
                Err(e) => report_error(deps, chat_id, e).await,
            }
        }
        AdminPrompt::ChannelId(kind) => {
            let Ok(channel_id) = text.parse::<i64>() else {
                deps.say(chat_id, NOT_A_NUMBER, None).await;
                return;
            };
            *slot = None;
            match deps.settings.set_channel(kind, channel_id).await {
                Ok(()) => {
                    deps.say(chat_id, &format!("✅ {} yangilandi.", kind.label()), Some(admin_menu()))
                        .await
                }
                Err(e) => report_error(deps, chat_id, e).await,
            }
        }
        AdminPrompt::Payment(field) => {
            if text.is_empty() {
                return;
            }
            *slot = None;
            match deps.settings.set_payment(field, text).await {
                Ok(()) => deps.say(chat_id, payment_updated(field), Some(admin_menu())).await,
                Err(e) => report_error(deps, chat_id, e).await,
            }
        }
        AdminPrompt::SearchCode => {
            *slot = None;
            let code = text.to_uppercase();
            match find_ad(deps, &code) {
                Ok(Some(text)) => deps.say(chat_id, &format!("✅ Topildi:\n\n{}", text), Some(admin_menu())).await,
                Ok(None) => deps.say(chat_id, "❌ Topilmadi.", Some(admin_menu())).await,
                Err(e) => report_error(deps, chat_id, e).await,
            }
        }
        AdminPrompt::ReplacementText(temp_id) => {
            if text.is_empty() {
                return;
            }
            *slot = None;
            match deps.moderation.set_text(&temp_id, text.to_string()).await {
                Ok(()) => deps.say(chat_id, "✅ Matn yangilandi.", None).await,
                Err(_) => deps.say(chat_id, "❌ E'lon topilmadi yoki allaqachon ko'rib chiqilgan.", None).await,
            }
        }
        // Waiting for a photo; text doesn't count
        AdminPrompt::ReplacementPhoto(_) => {}
    }
}

/// Photo answer to an admin prompt. Only the attach-photo prompt takes one.
pub async fn on_prompt_photo(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    chat_id: i64,
    prompt: AdminPrompt,
    photo_ref: String,
) {
    let AdminPrompt::ReplacementPhoto(temp_id) = prompt else {
        return;
    };
    *slot = None;
    match deps.moderation.set_photo(&temp_id, photo_ref).await {
        Ok(()) => deps.say(chat_id, "✅ Rasm biriktirildi.", None).await,
        Err(_) => deps.say(chat_id, "❌ E'lon topilmadi yoki allaqachon ko'rib chiqilgan.", None).await,
    }
}

fn find_ad(deps: &HandlerDeps, code: &str) -> Result<Option<String>, AppError> {
    let conn = get_connection(&deps.db_pool)?;
    Ok(db::get_ad(&conn, code)?.map(|ad| format_ad(&ad, FormatOptions::ARCHIVE)))
}

async fn report_error(deps: &HandlerDeps, chat_id: i64, error: AppError) {
    log::error!("Admin action failed in chat {}: {}", chat_id, error);
    deps.say(chat_id, &format!("Xatolik: {}", error), Some(admin_menu())).await;
}
