use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot
///
/// Everything here is read once from the environment (after `.env` has been
/// loaded in `main`). Values that admins can change at runtime (channels,
/// payment details, the admin list) are only *seeds*: the database wins once
/// a value has been stored there.

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_chat_id(raw: Option<String>) -> Option<i64> {
    raw.and_then(|value| value.parse::<i64>().ok()).filter(|id| *id != 0)
}

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: adboard.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "adboard.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: adboard.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "adboard.log".to_string()));

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    /// Super administrator ID
    /// Read from SUPER_ADMIN_ID (falls back to ADMIN_ID)
    /// Seeded into the admin table on every start and never removable from the bot
    /// Defaults to 0 if not set (no super admin)
    pub static SUPER_ADMIN_ID: Lazy<i64> = Lazy::new(|| {
        env::var("SUPER_ADMIN_ID")
            .or_else(|_| env::var("ADMIN_ID"))
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    });
}

/// Distribution channel seeds
pub mod channels {
    use super::{non_empty_var, parse_chat_id};
    use once_cell::sync::Lazy;

    /// Public channel for ads with gender = male
    pub static MALE_CHANNEL_ID: Lazy<Option<i64>> = Lazy::new(|| parse_chat_id(non_empty_var("MALE_CHANNEL_ID")));

    /// Public channel for every other ad
    pub static FEMALE_CHANNEL_ID: Lazy<Option<i64>> =
        Lazy::new(|| parse_chat_id(non_empty_var("FEMALE_CHANNEL_ID")));

    /// Hidden archive channel, receives the copy with contact details
    pub static HIDDEN_CHANNEL_ID: Lazy<Option<i64>> =
        Lazy::new(|| parse_chat_id(non_empty_var("HIDDEN_CHANNEL_ID")));
}

/// Payment instructions shown before the proof-of-payment step
pub mod payment {
    use once_cell::sync::Lazy;
    use std::env;

    pub const DEFAULT_CARD: &str = "8600 0000 0000 0000";
    pub const DEFAULT_OWNER: &str = "Noma'lum";
    pub const DEFAULT_PRICE: &str = "10 000 so'm";

    /// Read from PAYMENT_CARD environment variable
    pub static CARD: Lazy<String> =
        Lazy::new(|| env::var("PAYMENT_CARD").unwrap_or_else(|_| DEFAULT_CARD.to_string()));

    /// Read from PAYMENT_OWNER environment variable
    pub static OWNER: Lazy<String> =
        Lazy::new(|| env::var("PAYMENT_OWNER").unwrap_or_else(|_| DEFAULT_OWNER.to_string()));

    /// Read from AD_PRICE environment variable
    pub static PRICE: Lazy<String> = Lazy::new(|| env::var("AD_PRICE").unwrap_or_else(|_| DEFAULT_PRICE.to_string()));
}

/// Static cover photos (Telegram file ids) attached to published ads
/// when the admin did not supply one.
pub mod photos {
    use super::non_empty_var;
    use once_cell::sync::Lazy;

    pub static SEEKER_MALE: Lazy<Option<String>> = Lazy::new(|| non_empty_var("SEEKER_MALE_PHOTO"));
    pub static SEEKER_FEMALE: Lazy<Option<String>> = Lazy::new(|| non_empty_var("SEEKER_FEMALE_PHOTO"));
    pub static EMPLOYER_MALE: Lazy<Option<String>> = Lazy::new(|| non_empty_var("EMPLOYER_MALE_PHOTO"));
    pub static EMPLOYER_FEMALE: Lazy<Option<String>> = Lazy::new(|| non_empty_var("EMPLOYER_FEMALE_PHOTO"));
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// `get_me` attempts while a local Bot API server is still starting
    pub const STARTUP_ATTEMPTS: u32 = 60;

    pub const STARTUP_RETRY_DELAY: Duration = Duration::from_secs(5);

    /// Dispatcher restarts after a panic before the process gives up
    pub const MAX_DISPATCHER_RESTARTS: u32 = 5;

    /// Wait before dispatcher restart `attempt` (1-based): 2s, 4s, 8s, capped at 5 minutes
    pub fn backoff(attempt: u32) -> Duration {
        let secs = 2u64.saturating_pow(attempt.max(1)).min(300);
        Duration::from_secs(secs)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Bot API server configuration utilities
pub mod bot_api {
    /// Returns the BOT_API_URL environment variable if set.
    pub fn get_url() -> Option<String> {
        std::env::var("BOT_API_URL").ok()
    }
}
