//! Approve and reject: turning a pending item into a published ad

use std::sync::Arc;
use teloxide::types::ReplyMarkup;

use crate::ads::format::is_male;
use crate::ads::{format_ad, ids, FormatOptions, Submission};
use crate::conversation::CompletedForm;
use crate::core::error::AppError;
use crate::core::settings::{BotSettings, ChannelKind};
use crate::moderation::notify::{broadcast_new_ad, BroadcastReport};
use crate::moderation::queue::{PendingItem, PendingQueue};
use crate::moderation::ModerationError;
use crate::storage::db::{self, get_connection, DbPool};
use crate::telegram::keyboards::link_keyboard;
use crate::telegram::platform::{ChatPlatform, MessageRef};

/// Prefix of every post in the hidden archive channel
pub const ARCHIVE_TAG: &str = "🔐 #ARXIV\n\n";

/// Fresh codes tried before giving up on finding an unused one
const CODE_ATTEMPTS: usize = 50;

/// Result of a successful approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub code: String,
    pub user_id: i64,
    pub target_channel: Option<i64>,
    pub link: Option<String>,
    /// Steps that failed after the item left the queue; already reported to the admin
    pub failures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub user_id: i64,
    pub failures: Vec<String>,
}

/// Applies admin decisions to pending items.
///
/// Every outbound call is attempted once. A failure is logged and reported
/// back to the acting admin but never undoes earlier steps: the item stays
/// resolved and an allocated code stays allocated.
pub struct Moderation {
    queue: Arc<PendingQueue>,
    settings: Arc<BotSettings>,
    db_pool: Arc<DbPool>,
    platform: Arc<dyn ChatPlatform>,
}

impl Moderation {
    pub fn new(
        queue: Arc<PendingQueue>,
        settings: Arc<BotSettings>,
        db_pool: Arc<DbPool>,
        platform: Arc<dyn ChatPlatform>,
    ) -> Self {
        Self {
            queue,
            settings,
            db_pool,
            platform,
        }
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    /// Queues a finished form and sends it to every admin.
    pub async fn submit(&self, form: CompletedForm, user_id: i64) -> (String, BroadcastReport) {
        let temp_id = self.queue.enqueue(form.submission, user_id, form.proof_ref).await;
        let admins = self.settings.admins().await;

        let report = match self.queue.get(&temp_id).await {
            Some(item) => broadcast_new_ad(self.platform.as_ref(), &admins, &item).await,
            // Resolved before we got here; nothing left to announce
            None => BroadcastReport::default(),
        };
        (temp_id, report)
    }

    /// Text the admin is editing: the current override, or the full preview.
    pub async fn current_text(&self, temp_id: &str) -> Result<String, ModerationError> {
        let item = self
            .queue
            .get(temp_id)
            .await
            .ok_or_else(|| ModerationError::NotFound(temp_id.to_string()))?;
        Ok(item
            .admin_text
            .unwrap_or_else(|| format_ad(&item.submission, FormatOptions::PREVIEW)))
    }

    pub async fn set_text(&self, temp_id: &str, text: String) -> Result<(), ModerationError> {
        self.queue.set_admin_text(temp_id, text).await?;
        log::info!("Text override set for {}", temp_id);
        Ok(())
    }

    pub async fn set_photo(&self, temp_id: &str, photo_ref: String) -> Result<(), ModerationError> {
        self.queue.set_admin_photo(temp_id, photo_ref).await?;
        log::info!("Photo override set for {}", temp_id);
        Ok(())
    }

    /// Publishes a pending ad.
    ///
    /// `admin_chat` receives the failure report; `card` is the admin's
    /// moderation message, edited to show the published state.
    pub async fn approve(
        &self,
        temp_id: &str,
        admin_chat: i64,
        card: Option<MessageRef>,
    ) -> Result<Approval, ModerationError> {
        let item = self.queue.resolve(temp_id).await?;
        let code = self.allocate_code();
        let record = item.submission.with_code(&code);
        log::info!("Approving {} as {}", temp_id, code);

        // An override is used as-is for both copies, even if it lacks the phone line
        let (public_text, archive_text) = match &item.admin_text {
            Some(text) => (text.clone(), text.clone()),
            None => (
                format_ad(&record, FormatOptions::PUBLIC),
                format_ad(&record, FormatOptions::ARCHIVE),
            ),
        };

        let target_kind = if is_male(&record) {
            ChannelKind::Male
        } else {
            ChannelKind::Female
        };
        let target_channel = self.settings.channel(target_kind).await;
        let archive_channel = self.settings.channel(ChannelKind::Hidden).await;
        let photo = item
            .admin_photo
            .clone()
            .or_else(|| self.settings.photos().for_ad(&record).map(str::to_string));

        let mut failures = Vec::new();

        match target_channel {
            Some(chat_id) => {
                let sent = match &photo {
                    Some(photo_ref) => self.platform.send_photo(chat_id, photo_ref, &public_text, None).await,
                    None => self.platform.send_text(chat_id, &public_text, None).await,
                };
                if let Err(e) = sent {
                    failures.push(format!("{} kanaliga yuborilmadi: {}", target_kind, e));
                }
            }
            None => failures.push(format!("{} kanali sozlanmagan", target_kind)),
        }

        match archive_channel {
            Some(chat_id) => {
                let tagged = format!("{}{}", ARCHIVE_TAG, archive_text);
                let sent = match &item.admin_photo {
                    Some(photo_ref) => self.platform.send_photo(chat_id, photo_ref, &tagged, None).await,
                    None => self.platform.send_text(chat_id, &tagged, None).await,
                };
                if let Err(e) = sent {
                    failures.push(format!("Yashirin kanalga yuborilmadi: {}", e));
                }
            }
            None => log::warn!("Hidden channel is not configured, {} is not archived", code),
        }

        if let Err(e) = self.save(&code, &record) {
            failures.push(format!("E'lon bazaga saqlanmadi: {}", e));
        }

        let link = match target_channel {
            Some(chat_id) => match self.platform.channel_link(chat_id).await {
                Ok(link) => link,
                Err(e) => {
                    failures.push(format!("Kanal havolasi olinmadi: {}", e));
                    None
                }
            },
            None => None,
        };

        let (user_text, user_markup) = approval_message(&code, link.as_deref());
        if let Err(e) = self.platform.send_text(item.user_id, &user_text, user_markup).await {
            failures.push(format!("Foydalanuvchiga xabar yuborilmadi: {}", e));
        }

        if let Some(card) = card {
            let caption = format!("✅ JOYLANDI\nKod: {}", code);
            if let Err(e) = self.platform.edit_caption(card, &caption).await {
                failures.push(format!("Admin xabari yangilanmadi: {}", e));
            }
        }

        self.report_failures(admin_chat, &item, &failures).await;

        Ok(Approval {
            code,
            user_id: item.user_id,
            target_channel,
            link,
            failures,
        })
    }

    /// Rejects a pending ad. Nothing is published or stored.
    pub async fn reject(
        &self,
        temp_id: &str,
        admin_chat: i64,
        card: Option<MessageRef>,
    ) -> Result<Rejection, ModerationError> {
        let item = self.queue.resolve(temp_id).await?;
        log::info!("Rejecting {}", temp_id);

        let mut failures = Vec::new();
        if let Err(e) = self.platform.send_text(item.user_id, "❌ E'loningiz rad etildi.", None).await {
            failures.push(format!("Foydalanuvchiga xabar yuborilmadi: {}", e));
        }
        if let Some(card) = card {
            if let Err(e) = self.platform.edit_caption(card, "❌ RAD ETILDI").await {
                failures.push(format!("Admin xabari yangilanmadi: {}", e));
            }
        }

        self.report_failures(admin_chat, &item, &failures).await;

        Ok(Rejection {
            user_id: item.user_id,
            failures,
        })
    }

    /// A code no published ad uses yet.
    ///
    /// If the database cannot be checked, a fresh code is returned anyway; the
    /// insert-only `save_ad` then refuses a collision and the admin hears of it.
    fn allocate_code(&self) -> String {
        let conn = match get_connection(&self.db_pool) {
            Ok(conn) => conn,
            Err(e) => {
                log::warn!("Cannot check ad codes for collisions: {}", e);
                return ids::generate_code();
            }
        };
        match allocate_code_with(CODE_ATTEMPTS, ids::generate_code, |code| db::ad_exists(&conn, code)) {
            Ok(Some(code)) => code,
            Ok(None) => {
                log::error!("No free ad code after {} attempts", CODE_ATTEMPTS);
                ids::generate_code()
            }
            Err(e) => {
                log::warn!("Cannot check ad codes for collisions: {}", e);
                ids::generate_code()
            }
        }
    }

    fn save(&self, code: &str, record: &Submission) -> Result<(), AppError> {
        let conn = get_connection(&self.db_pool)?;
        db::save_ad(&conn, code, record)
    }

    async fn report_failures(&self, admin_chat: i64, item: &PendingItem, failures: &[String]) {
        if failures.is_empty() {
            return;
        }
        for failure in failures {
            log::error!("Moderation of {} (user {}): {}", item.temp_id, item.user_id, failure);
        }
        let text = format!("⚠️ Xatolik:\n• {}", failures.join("\n• "));
        if let Err(e) = self.platform.send_text(admin_chat, &text, None).await {
            log::error!("Failed to report moderation errors to admin {}: {}", admin_chat, e);
        }
    }
}

/// Draws codes until `taken` says one is free, at most `attempts` times.
pub fn allocate_code_with<E>(
    attempts: usize,
    mut generate: impl FnMut() -> String,
    mut taken: impl FnMut(&str) -> Result<bool, E>,
) -> Result<Option<String>, E> {
    for _ in 0..attempts {
        let code = generate();
        if !taken(&code)? {
            return Ok(Some(code));
        }
        log::debug!("Ad code {} is taken, drawing another", code);
    }
    Ok(None)
}

/// Message sent to the submitter once the ad is published.
pub fn approval_message(code: &str, link: Option<&str>) -> (String, Option<ReplyMarkup>) {
    let mut text = format!("✅ Tabriklaymiz! E'loningiz tasdiqlandi.\n🔎 E'lon kodi: {}", code);
    let markup = link.and_then(link_keyboard);
    if markup.is_some() {
        text.push_str(
            "\n\n📢 E'loningiz kanalimizga joylandi.\nPastdagi tugma orqali kirib ko'rishingiz va obuna bo'lishingiz mumkin.",
        );
    }
    (text, markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taken_code_is_rerolled() {
        let mut drawn = vec!["E-00003", "E-00002", "E-00001"];
        let code = allocate_code_with(
            10,
            || drawn.pop().unwrap_or("E-99999").to_string(),
            |code| Ok::<_, ()>(code != "E-00003"),
        );
        assert_eq!(code, Ok(Some("E-00003".to_string())));
    }

    #[test]
    fn test_gives_up_when_every_code_is_taken() {
        let mut calls = 0;
        let code = allocate_code_with(
            5,
            || {
                calls += 1;
                "E-00001".to_string()
            },
            |_| Ok::<_, ()>(true),
        );
        assert_eq!(code, Ok(None));
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_lookup_error_is_passed_on() {
        let code = allocate_code_with(3, || "E-00001".to_string(), |_| Err("db down"));
        assert_eq!(code, Err("db down"));
    }

    #[test]
    fn test_approval_message_with_and_without_link() {
        let (text, markup) = approval_message("E-12345", Some("https://t.me/+invite"));
        assert!(text.contains("E-12345"));
        assert!(text.contains("kanalimizga joylandi"));
        assert!(markup.is_some());

        let (text, markup) = approval_message("E-12345", None);
        assert_eq!(text, "✅ Tabriklaymiz! E'loningiz tasdiqlandi.\n🔎 E'lon kodi: E-12345");
        assert!(markup.is_none());
    }
}
