//! Routes inbound events to the form, the admin panel or moderation.
//!
//! The user's session slot is locked for the whole event, so a user's
//! events are handled strictly one after another.

use super::admin_panel::{self, AdminButton};
use super::moderation;
use super::types::{CallbackAnswer, HandlerDeps, Inbound, InboundEvent};
use super::user_flow;
use crate::conversation::{AdminPrompt, Input, Session};
use crate::telegram::bot::Command;
use crate::telegram::keyboards::{self, CallbackAction};
use crate::telegram::platform::MessageRef;

/// Handles one event. Returns how to answer it when it was a callback query.
pub async fn dispatch(deps: &HandlerDeps, event: InboundEvent) -> Option<CallbackAnswer> {
    let InboundEvent {
        user_id,
        chat_id,
        payload,
    } = event;
    let mut guard = deps.sessions.lock(user_id).await;
    let answer = route(deps, &mut guard, user_id, chat_id, payload).await;
    deps.sessions.release(user_id, guard);
    answer
}

async fn route(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    user_id: i64,
    chat_id: i64,
    payload: Inbound,
) -> Option<CallbackAnswer> {
    match payload {
        Inbound::Command(command) => {
            on_command(deps, slot, user_id, chat_id, command).await;
            None
        }
        Inbound::Text(text) => {
            on_text(deps, slot, user_id, chat_id, text).await;
            None
        }
        Inbound::Photo(photo_ref) => {
            match slot.clone() {
                Some(Session::Form(_)) => {
                    user_flow::on_input(deps, slot, user_id, chat_id, Input::Photo(photo_ref)).await;
                }
                Some(Session::Admin(prompt)) => {
                    admin_panel::on_prompt_photo(deps, slot, chat_id, prompt, photo_ref).await;
                }
                None => {}
            }
            None
        }
        Inbound::Video(video_ref) => {
            user_flow::on_input(deps, slot, user_id, chat_id, Input::Video(video_ref)).await;
            None
        }
        Inbound::Callback { data, origin } => {
            let answer = on_callback(deps, slot, user_id, chat_id, &data, origin).await;
            Some(answer.unwrap_or_default())
        }
    }
}

async fn on_command(deps: &HandlerDeps, slot: &mut Option<Session>, user_id: i64, chat_id: i64, command: Command) {
    match command {
        Command::Start => user_flow::start(deps, slot, chat_id).await,
        Command::Admin => admin_panel::open(deps, slot, user_id, chat_id).await,
        Command::Cancel => {
            if let Some(answer) = user_flow::cancel(deps, slot, chat_id, None).await {
                if let Some(text) = answer.text {
                    deps.say(chat_id, &text, None).await;
                }
            }
        }
    }
}

async fn on_text(deps: &HandlerDeps, slot: &mut Option<Session>, user_id: i64, chat_id: i64, text: String) {
    // Menu buttons work from any state and replace whatever was going on
    if text == keyboards::START_AD {
        user_flow::start(deps, slot, chat_id).await;
        return;
    }
    if text == keyboards::USER_MODE {
        if deps.settings.is_admin(user_id).await {
            user_flow::start(deps, slot, chat_id).await;
        }
        return;
    }
    if let Some(button) = AdminButton::from_label(&text) {
        if deps.settings.is_admin(user_id).await {
            admin_panel::on_button(deps, slot, chat_id, button).await;
            return;
        }
    }

    match slot.clone() {
        Some(Session::Form(conversation)) => {
            let input = user_flow::classify_text(conversation.step(), &text);
            user_flow::on_input(deps, slot, user_id, chat_id, input).await;
        }
        Some(Session::Admin(prompt)) => {
            admin_panel::on_prompt_text(deps, slot, chat_id, prompt, &text).await;
        }
        None => log::debug!("Ignoring text from {} outside of any flow", user_id),
    }
}

async fn on_callback(
    deps: &HandlerDeps,
    slot: &mut Option<Session>,
    user_id: i64,
    chat_id: i64,
    data: &str,
    origin: Option<MessageRef>,
) -> Option<CallbackAnswer> {
    let Some(action) = CallbackAction::parse(data) else {
        log::warn!("Unknown callback data from {}: {}", user_id, data);
        return None;
    };

    match action {
        CallbackAction::CancelForm => user_flow::cancel(deps, slot, chat_id, origin).await,
        CallbackAction::Gender(gender) => user_flow::on_input(deps, slot, user_id, chat_id, Input::Gender(gender)).await,
        CallbackAction::SetChannel(kind) => {
            if !deps.settings.is_admin(user_id).await {
                return None;
            }
            admin_panel::on_setting_choice(deps, slot, chat_id, AdminPrompt::ChannelId(kind)).await
        }
        CallbackAction::SetPayment(field) => {
            if !deps.settings.is_admin(user_id).await {
                return None;
            }
            admin_panel::on_setting_choice(deps, slot, chat_id, AdminPrompt::Payment(field)).await
        }
        CallbackAction::Moderate(action, temp_id) => {
            moderation::on_action(deps, slot, user_id, chat_id, action, &temp_id, origin).await
        }
    }
}
