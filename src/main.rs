use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Instant;
use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::Me;
use tokio::time::sleep;

use adboard::ads::{format_ad, FormatOptions};
use adboard::cli::{Cli, Commands};
use adboard::conversation::SessionStore;
use adboard::core::config;
use adboard::core::logging::{configuration_warnings, init_logger, log_configuration};
use adboard::core::settings::{BotSettings, SettingsSeed};
use adboard::moderation::{Moderation, PendingQueue};
use adboard::storage::db;
use adboard::storage::{create_pool, get_connection};
use adboard::telegram::{create_bot, schema, setup_bot_commands, ChatPlatform, HandlerDeps, TelegramPlatform};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    let cli = Cli::parse_args();

    // Log panics from handler tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::CheckConfig) => run_check_config(),
        Some(Commands::ShowAd { code }) => run_show_ad(&code),
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Logs the configuration and fails if it has problems
fn run_check_config() -> Result<()> {
    log_configuration();
    let warnings = configuration_warnings();
    if warnings.is_empty() {
        log::info!("Configuration looks good");
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} configuration problem(s) found", warnings.len()))
    }
}

/// Prints a published ad from the database
fn run_show_ad(code: &str) -> Result<()> {
    let pool = create_pool(&config::DATABASE_PATH).context("Failed to open database")?;
    let conn = get_connection(&pool)?;
    let code = code.trim().to_uppercase();
    match db::get_ad(&conn, &code)? {
        Some(ad) => {
            println!("{}", format_ad(&ad, FormatOptions::ARCHIVE));
            Ok(())
        }
        None => Err(anyhow::anyhow!("Ad {} not found", code)),
    }
}

async fn run_bot() -> Result<()> {
    let started = Instant::now();
    log_configuration();

    let bot = create_bot()?;
    let me = wait_for_bot_api(&bot).await?;
    log::info!("Running as @{} ({})", me.username(), me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH).context("Failed to open database")?);
    let settings = Arc::new(
        BotSettings::load((*db_pool).clone(), SettingsSeed::from_env()).context("Failed to load settings")?,
    );
    match settings.super_admin() {
        Some(id) => log::info!("Loaded {} admin(s), super admin {}", settings.admins().await.len(), id),
        None => log::warn!("SUPER_ADMIN_ID is not set; only admins already in the database can moderate"),
    }

    let platform: Arc<dyn ChatPlatform> = Arc::new(TelegramPlatform::new(bot.clone()));
    let moderation = Arc::new(Moderation::new(
        Arc::new(PendingQueue::new()),
        Arc::clone(&settings),
        Arc::clone(&db_pool),
        Arc::clone(&platform),
    ));
    let handler = schema(HandlerDeps::new(
        settings,
        Arc::new(SessionStore::new()),
        moderation,
        db_pool,
        platform,
    ));
    log::info!("Ready in {:.2}s, polling for updates", started.elapsed().as_secs_f64());

    // A panic inside the dispatcher restarts it; pending ads live in `moderation` and survive
    let mut restarts = 0;
    loop {
        let dispatcher = tokio::spawn({
            let bot = bot.clone();
            let handler = handler.clone();
            async move {
                Dispatcher::builder(bot, handler)
                    .enable_ctrlc_handler()
                    .build()
                    .dispatch()
                    .await
            }
        });

        match dispatcher.await {
            Ok(()) => {
                log::info!("Dispatcher stopped");
                return Ok(());
            }
            Err(e) if e.is_panic() && restarts < config::retry::MAX_DISPATCHER_RESTARTS => {
                restarts += 1;
                let delay = config::retry::backoff(restarts);
                log::error!(
                    "Dispatcher panicked: {}. Restart {}/{} in {:?}",
                    e,
                    restarts,
                    config::retry::MAX_DISPATCHER_RESTARTS,
                    delay
                );
                sleep(delay).await;
            }
            Err(e) => return Err(anyhow::anyhow!("Dispatcher failed: {}", e)),
        }
    }
}

/// `get_me`, retried on network errors while a local Bot API server starts up
async fn wait_for_bot_api(bot: &Bot) -> Result<Me> {
    let mut attempt = 1;
    loop {
        match bot.get_me().await {
            Ok(me) => return Ok(me),
            Err(e @ (RequestError::Network(_) | RequestError::Io(_)))
                if attempt < config::retry::STARTUP_ATTEMPTS =>
            {
                log::warn!(
                    "Bot API not reachable (attempt {}/{}): {}",
                    attempt,
                    config::retry::STARTUP_ATTEMPTS,
                    e
                );
                attempt += 1;
                sleep(config::retry::STARTUP_RETRY_DELAY).await;
            }
            Err(e) => return Err(e).context("Failed to reach the Bot API"),
        }
    }
}
