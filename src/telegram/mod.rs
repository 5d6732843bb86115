//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod keyboards;
pub mod platform;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{dispatch, schema, HandlerDeps};
pub use platform::{ChatPlatform, MessageRef, TelegramPlatform};
