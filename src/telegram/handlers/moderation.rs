//! Moderation buttons on the admins' copies of a new ad

use super::types::{CallbackAnswer, HandlerDeps};
use crate::conversation::{AdminPrompt, Session};
use crate::telegram::keyboards::{cancel_keyboard, ModAction};
use crate::telegram::platform::MessageRef;

const GONE: &str = "Topilmadi.";

/// Handles one moderation button press. Non-admins get no answer text at all.
pub async fn on_action(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    user_id: i64,
    chat_id: i64,
    action: ModAction,
    temp_id: &str,
    origin: Option<MessageRef>,
) -> Option<CallbackAnswer> {
    if !deps.settings.is_admin(user_id).await {
        log::warn!("Ignoring moderation action {} from non-admin {}", action, user_id);
        return Some(CallbackAnswer::default());
    }

    match action {
        ModAction::Approve => match deps.moderation.approve(temp_id, chat_id, origin).await {
            Ok(approval) => {
                log::info!("Admin {} approved {} as {}", user_id, temp_id, approval.code);
                Some(CallbackAnswer::text(format!("Joylandi: {}", approval.code)))
            }
            Err(e) => {
                log::info!("Admin {} tried to approve {}: {}", user_id, temp_id, e);
                Some(CallbackAnswer::alert(GONE))
            }
        },
        ModAction::Reject => match deps.moderation.reject(temp_id, chat_id, origin).await {
            Ok(_) => {
                log::info!("Admin {} rejected {}", user_id, temp_id);
                Some(CallbackAnswer::text("Rad etildi"))
            }
            Err(e) => {
                log::info!("Admin {} tried to reject {}: {}", user_id, temp_id, e);
                Some(CallbackAnswer::alert(GONE))
            }
        },
        ModAction::EditText => {
            let Ok(current) = deps.moderation.current_text(temp_id).await else {
                return Some(CallbackAnswer::alert(GONE));
            };
            deps.say(chat_id, "Eski matn pastda:", None).await;
            deps.say(chat_id, &current, None).await;
            deps.say(chat_id, "Yangi matnni yuboring:", Some(cancel_keyboard())).await;
            *slot = Some(Session::Admin(AdminPrompt::ReplacementText(temp_id.to_string())));
            Some(CallbackAnswer::default())
        }
        ModAction::AttachPhoto => {
            if deps.moderation.queue().get(temp_id).await.is_none() {
                return Some(CallbackAnswer::alert(GONE));
            }
            deps.say(chat_id, "Rasm yuboring:", Some(cancel_keyboard())).await;
            *slot = Some(Session::Admin(AdminPrompt::ReplacementPhoto(temp_id.to_string())));
            Some(CallbackAnswer::default())
        }
    }
}
