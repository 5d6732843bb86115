//! Outbound chat operations behind a trait.
//!
//! Moderation and the handlers talk to [`ChatPlatform`] only; the teloxide
//! implementation lives here and tests plug in a recording fake.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, MessageId, ReplyMarkup};

use crate::core::error::AppResult;

/// Address of a message the bot sent (or received) and may edit later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

impl MessageRef {
    pub fn of(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
        }
    }
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<ReplyMarkup>) -> AppResult<MessageRef>;

    /// `photo_ref` is a platform file id, never a local file
    async fn send_photo(
        &self,
        chat_id: i64,
        photo_ref: &str,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageRef>;

    async fn edit_caption(&self, message: MessageRef, caption: &str) -> AppResult<()>;

    async fn edit_text(&self, message: MessageRef, text: &str) -> AppResult<()>;

    /// Link users can open to view and join a channel, if one can be obtained
    async fn channel_link(&self, chat_id: i64) -> AppResult<Option<String>>;
}

/// [`ChatPlatform`] over the Telegram Bot API
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<ReplyMarkup>) -> AppResult<MessageRef> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        let msg = request.await?;
        Ok(MessageRef::of(&msg))
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_ref: &str,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageRef> {
        let mut request = self
            .bot
            .send_photo(ChatId(chat_id), InputFile::file_id(FileId(photo_ref.to_string())))
            .caption(caption);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        let msg = request.await?;
        Ok(MessageRef::of(&msg))
    }

    async fn edit_caption(&self, message: MessageRef, caption: &str) -> AppResult<()> {
        self.bot
            .edit_message_caption(ChatId(message.chat_id), MessageId(message.message_id))
            .caption(caption)
            .await?;
        Ok(())
    }

    async fn edit_text(&self, message: MessageRef, text: &str) -> AppResult<()> {
        self.bot
            .edit_message_text(ChatId(message.chat_id), MessageId(message.message_id), text)
            .await?;
        Ok(())
    }

    async fn channel_link(&self, chat_id: i64) -> AppResult<Option<String>> {
        let chat = self.bot.get_chat(ChatId(chat_id)).await?;
        if let Some(link) = existing_channel_link(chat.username(), chat.invite_link()) {
            return Ok(Some(link));
        }

        // Exporting revokes the current primary link, so it is the last resort
        log::debug!("Channel {} has no public or primary link, exporting one", chat_id);
        let link = self.bot.export_chat_invite_link(ChatId(chat_id)).await?;
        Ok(Some(link).filter(|l| !l.is_empty()))
    }
}

/// Public `t.me` address first, then the chat's current invite link
pub fn existing_channel_link(username: Option<&str>, invite_link: Option<&str>) -> Option<String> {
    username
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| format!("https://t.me/{}", name.trim_start_matches('@')))
        .or_else(|| {
            invite_link
                .map(str::trim)
                .filter(|link| !link.is_empty())
                .map(str::to_string)
        })
}
