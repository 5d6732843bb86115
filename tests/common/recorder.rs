//! Chat platform that records outbound calls instead of hitting Telegram

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;
use teloxide::types::ReplyMarkup;

use adboard::core::error::{AppError, AppResult};
use adboard::telegram::{ChatPlatform, MessageRef};

/// One recorded platform call
#[derive(Debug, Clone)]
pub enum ApiCall {
    SendText {
        message: MessageRef,
        text: String,
        markup: Option<ReplyMarkup>,
    },
    SendPhoto {
        message: MessageRef,
        photo: String,
        caption: String,
        markup: Option<ReplyMarkup>,
    },
    EditCaption {
        message: MessageRef,
        caption: String,
    },
    EditText {
        message: MessageRef,
        text: String,
    },
}

impl ApiCall {
    pub fn chat_id(&self) -> i64 {
        self.message().chat_id
    }

    pub fn message(&self) -> MessageRef {
        match self {
            ApiCall::SendText { message, .. }
            | ApiCall::SendPhoto { message, .. }
            | ApiCall::EditCaption { message, .. }
            | ApiCall::EditText { message, .. } => *message,
        }
    }

    /// Text or caption of the call
    pub fn body(&self) -> &str {
        match self {
            ApiCall::SendText { text, .. } | ApiCall::EditText { text, .. } => text,
            ApiCall::SendPhoto { caption, .. } | ApiCall::EditCaption { caption, .. } => caption,
        }
    }

    pub fn markup(&self) -> Option<&ReplyMarkup> {
        match self {
            ApiCall::SendText { markup, .. } | ApiCall::SendPhoto { markup, .. } => markup.as_ref(),
            _ => None,
        }
    }

    pub fn photo(&self) -> Option<&str> {
        match self {
            ApiCall::SendPhoto { photo, .. } => Some(photo),
            _ => None,
        }
    }

    pub fn is_send(&self) -> bool {
        matches!(self, ApiCall::SendText { .. } | ApiCall::SendPhoto { .. })
    }
}

/// In-memory [`ChatPlatform`].
///
/// Sends to chats marked as failing return an error and are not recorded.
pub struct RecordingPlatform {
    calls: Mutex<Vec<ApiCall>>,
    failing_chats: Mutex<HashSet<i64>>,
    link: Mutex<Option<String>>,
    next_message_id: AtomicI32,
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing_chats: Mutex::new(HashSet::new()),
            link: Mutex::new(None),
            next_message_id: AtomicI32::new(1),
        }
    }

    /// Every call to `chat_id` fails from now on
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().unwrap().insert(chat_id);
    }

    pub fn set_link(&self, link: Option<&str>) {
        *self.link.lock().unwrap() = link.map(str::to_string);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Messages sent (text or photo) to a chat, in order
    pub fn sent_to(&self, chat_id: i64) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.is_send() && call.chat_id() == chat_id)
            .collect()
    }

    /// Bodies of the messages sent to a chat
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent_to(chat_id).iter().map(|call| call.body().to_string()).collect()
    }

    pub fn last_to(&self, chat_id: i64) -> Option<ApiCall> {
        self.sent_to(chat_id).pop()
    }

    pub fn edits(&self) -> Vec<ApiCall> {
        self.calls().into_iter().filter(|call| !call.is_send()).collect()
    }

    fn check(&self, chat_id: i64) -> AppResult<()> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            return Err(AppError::Platform(format!("Forbidden: bot can't reach chat {}", chat_id)));
        }
        Ok(())
    }

    fn next_ref(&self, chat_id: i64) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
        }
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Option<ReplyMarkup>) -> AppResult<MessageRef> {
        self.check(chat_id)?;
        let message = self.next_ref(chat_id);
        self.record(ApiCall::SendText {
            message,
            text: text.to_string(),
            markup,
        });
        Ok(message)
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo_ref: &str,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> AppResult<MessageRef> {
        self.check(chat_id)?;
        let message = self.next_ref(chat_id);
        self.record(ApiCall::SendPhoto {
            message,
            photo: photo_ref.to_string(),
            caption: caption.to_string(),
            markup,
        });
        Ok(message)
    }

    async fn edit_caption(&self, message: MessageRef, caption: &str) -> AppResult<()> {
        self.check(message.chat_id)?;
        self.record(ApiCall::EditCaption {
            message,
            caption: caption.to_string(),
        });
        Ok(())
    }

    async fn edit_text(&self, message: MessageRef, text: &str) -> AppResult<()> {
        self.check(message.chat_id)?;
        self.record(ApiCall::EditText {
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn channel_link(&self, chat_id: i64) -> AppResult<Option<String>> {
        self.check(chat_id)?;
        Ok(self.link.lock().unwrap().clone())
    }
}
