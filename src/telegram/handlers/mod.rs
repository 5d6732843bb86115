//! Telegram bot handler tree configuration
//!
//! Updates are reduced to [`InboundEvent`]s and routed by [`dispatch`], which
//! talks to Telegram only through the [`ChatPlatform`](crate::telegram::platform::ChatPlatform)
//! in [`HandlerDeps`]. Integration tests drive `dispatch` directly with a
//! recording platform; production wraps it in the teloxide [`schema`].

mod admin_panel;
mod dispatch;
mod moderation;
mod schema;
mod types;
mod user_flow;

pub use admin_panel::AdminButton;
pub use dispatch::dispatch;
pub use schema::{message_payload, schema};
pub use types::{CallbackAnswer, HandlerDeps, HandlerError, Inbound, InboundEvent};
pub use user_flow::{payment_prompt, prompt_for};
