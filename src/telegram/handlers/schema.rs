//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::dispatch::dispatch;
use super::types::{CallbackAnswer, HandlerDeps, HandlerError, Inbound, InboundEvent};
use crate::telegram::bot::Command;
use crate::telegram::platform::MessageRef;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Only private chats are handled. Every update is reduced to an
/// [`InboundEvent`] and passed to [`dispatch`]; callback queries are then
/// answered with whatever the dispatcher returned.
///
/// # Arguments
/// * `deps` - Handler dependencies (settings, sessions, moderation, platform)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

fn sender_id(msg: &Message) -> Option<i64> {
    msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok())
}

/// Reduces a private message to the part the handlers look at.
pub fn message_payload(msg: &Message) -> Option<Inbound> {
    if let Some(text) = msg.text() {
        return Some(Inbound::Text(text.to_string()));
    }
    if let Some(sizes) = msg.photo() {
        // Telegram sends every size; the largest one is kept
        return sizes
            .iter()
            .max_by_key(|size| size.width * size.height)
            .map(|size| Inbound::Photo(size.file.id.0.clone()));
    }
    msg.video().map(|video| Inbound::Video(video.file.id.0.clone()))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .branch(dptree::entry().filter_command::<Command>().endpoint(
            move |msg: Message, cmd: Command| {
                let deps = deps.clone();
                async move {
                    let Some(user_id) = sender_id(&msg) else {
                        return Ok(());
                    };
                    log::info!("Received command {:?} from {}", cmd, user_id);
                    let event = InboundEvent {
                        user_id,
                        chat_id: msg.chat.id.0,
                        payload: Inbound::Command(cmd),
                    };
                    dispatch(&deps, event).await;
                    Ok(())
                }
            },
        ))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                let (Some(user_id), Some(payload)) = (sender_id(&msg), message_payload(&msg)) else {
                    return Ok(());
                };
                let event = InboundEvent {
                    user_id,
                    chat_id: msg.chat.id.0,
                    payload,
                };
                dispatch(&deps, event).await;
                Ok(())
            }
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            let Ok(user_id) = i64::try_from(q.from.id.0) else {
                return Ok(());
            };
            let origin = q.message.as_ref().map(|m| MessageRef {
                chat_id: m.chat().id.0,
                message_id: m.id().0,
            });
            let event = InboundEvent {
                user_id,
                chat_id: origin.map(|o| o.chat_id).unwrap_or(user_id),
                payload: Inbound::Callback {
                    data: q.data.clone().unwrap_or_default(),
                    origin,
                },
            };

            let answer = dispatch(&deps, event).await.unwrap_or_default();
            answer_callback(&bot, &q, answer).await?;
            Ok(())
        }
    })
}

async fn answer_callback(bot: &Bot, q: &CallbackQuery, answer: CallbackAnswer) -> Result<(), HandlerError> {
    let mut request = bot.answer_callback_query(q.id.clone());
    if let Some(text) = answer.text {
        request = request.text(text);
    }
    if answer.alert {
        request = request.show_alert(true);
    }
    if let Err(e) = request.await {
        log::warn!("Failed to answer callback {:?}: {}", q.id, e);
    }
    Ok(())
}
