//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A configuration summary logged once at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

fn describe_channel(value: Option<i64>) -> String {
    value.map(|id| id.to_string()).unwrap_or_else(|| "not set".to_string())
}

/// Returns a list of configuration problems that make the bot unusable
/// or silently degrade publishing.
pub fn configuration_warnings() -> Vec<String> {
    let mut warnings = Vec::new();
    if config::BOT_TOKEN.is_empty() {
        warnings.push("BOT_TOKEN is not set".to_string());
    }
    if *config::admin::SUPER_ADMIN_ID == 0 {
        warnings.push("SUPER_ADMIN_ID is not set, nobody can moderate until an admin is stored".to_string());
    }
    if config::channels::HIDDEN_CHANNEL_ID.is_none() {
        warnings.push("HIDDEN_CHANNEL_ID is not set, approved ads will not be archived unless set from /admin".to_string());
    }
    warnings
}

/// Logs the environment-derived configuration at application startup
pub fn log_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⚙️  Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Database: {}", config::DATABASE_PATH.as_str());
    log::info!("Super admin: {}", *config::admin::SUPER_ADMIN_ID);
    log::info!(
        "Channel seeds: male={}, female={}, hidden={}",
        describe_channel(*config::channels::MALE_CHANNEL_ID),
        describe_channel(*config::channels::FEMALE_CHANNEL_ID),
        describe_channel(*config::channels::HIDDEN_CHANNEL_ID)
    );
    if let Some(url) = config::bot_api::get_url() {
        log::info!("Bot API URL: {}", url);
    }

    for warning in configuration_warnings() {
        log::warn!("⚠️  {}", warning);
    }
}
