//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::ReplyMarkup;

use crate::conversation::SessionStore;
use crate::core::settings::BotSettings;
use crate::moderation::Moderation;
use crate::storage::db::DbPool;
use crate::telegram::bot::Command;
use crate::telegram::platform::{ChatPlatform, MessageRef};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub settings: Arc<BotSettings>,
    pub sessions: Arc<SessionStore>,
    pub moderation: Arc<Moderation>,
    pub db_pool: Arc<DbPool>,
    pub platform: Arc<dyn ChatPlatform>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(
        settings: Arc<BotSettings>,
        sessions: Arc<SessionStore>,
        moderation: Arc<Moderation>,
        db_pool: Arc<DbPool>,
        platform: Arc<dyn ChatPlatform>,
    ) -> Self {
        Self {
            settings,
            sessions,
            moderation,
            db_pool,
            platform,
        }
    }

    /// Sends a message, logging instead of failing
    pub async fn say(&self, chat_id: i64, text: &str, markup: Option<ReplyMarkup>) {
        if let Err(e) = self.platform.send_text(chat_id, text, markup).await {
            log::warn!("Failed to send message to {}: {}", chat_id, e);
        }
    }
}

/// Inbound update, reduced to what the handlers look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Text(String),
    /// File id of the largest photo size
    Photo(String),
    Video(String),
    Callback {
        data: String,
        /// Message the pressed button belongs to
        origin: Option<MessageRef>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: i64,
    pub chat_id: i64,
    pub payload: Inbound,
}

/// How to answer a callback query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackAnswer {
    pub text: Option<String>,
    pub alert: bool,
}

impl CallbackAnswer {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            alert: false,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            alert: true,
        }
    }
}
