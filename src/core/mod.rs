//! Core: configuration, errors, logging and runtime settings

pub mod config;
pub mod error;
pub mod logging;
pub mod settings;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use settings::{BotSettings, ChannelKind, PaymentField};
