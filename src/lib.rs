//! Adboard - Telegram bot for paid job ads with admin moderation
//!
//! Users fill in a job-seeker or employer form, pay and send a proof image.
//! Admins review the ad, optionally replace its text or photo, and approve
//! it to the channel matching the ad's gender, or reject it.
//!
//! # Module Structure
//!
//! - `ads`: Ad records, formatting and identifiers
//! - `conversation`: Form state machine and per-user sessions
//! - `core`: Configuration, errors, logging and runtime settings
//! - `moderation`: Pending queue and approve/reject resolution
//! - `storage`: SQLite pool, migrations and queries
//! - `telegram`: Telegram bot integration and handlers

#![allow(clippy::too_many_arguments)]

pub mod ads;
pub mod cli;
pub mod conversation;
pub mod core;
pub mod moderation;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
