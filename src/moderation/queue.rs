use chrono::{DateTime, Utc};
use log::info;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::ads::{fields, ids, Submission};
use crate::moderation::ModerationError;

/// A finished submission waiting for an admin decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
    /// Temporary id, the queue key
    pub temp_id: String,
    /// Telegram id of the submitter
    pub user_id: i64,
    /// Form answers, frozen at submission time
    pub submission: Submission,
    /// Replacement text set by an admin
    pub admin_text: Option<String>,
    /// Replacement cover photo set by an admin
    pub admin_photo: Option<String>,
    pub video_ref: Option<String>,
    /// Payment proof photo
    pub proof_ref: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory store of pending items keyed by temporary id.
///
/// Nothing here is persisted: items waiting for moderation are lost when the
/// process restarts.
#[derive(Default)]
pub struct PendingQueue {
    items: Mutex<HashMap<String, PendingItem>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a submission and returns its temporary id.
    ///
    /// A fresh id is drawn again if it happens to collide with a queued item.
    pub async fn enqueue(&self, submission: Submission, user_id: i64, proof_ref: String) -> String {
        let mut items = self.items.lock().await;
        let mut temp_id = ids::generate_temp_id();
        while items.contains_key(&temp_id) {
            temp_id = ids::generate_temp_id();
        }

        let video_ref = submission.get(fields::VIDEO_REF).map(str::to_string);
        items.insert(
            temp_id.clone(),
            PendingItem {
                temp_id: temp_id.clone(),
                user_id,
                submission,
                admin_text: None,
                admin_photo: None,
                video_ref,
                proof_ref,
                created_at: Utc::now(),
            },
        );
        info!("Queued {} from user {} ({} pending)", temp_id, user_id, items.len());
        temp_id
    }

    /// Copy of a queued item, `None` if unknown or already resolved
    pub async fn get(&self, temp_id: &str) -> Option<PendingItem> {
        self.items.lock().await.get(temp_id).cloned()
    }

    pub async fn set_admin_text(&self, temp_id: &str, text: String) -> Result<(), ModerationError> {
        let mut items = self.items.lock().await;
        let item = items
            .get_mut(temp_id)
            .ok_or_else(|| ModerationError::NotFound(temp_id.to_string()))?;
        item.admin_text = Some(text);
        Ok(())
    }

    pub async fn set_admin_photo(&self, temp_id: &str, photo_ref: String) -> Result<(), ModerationError> {
        let mut items = self.items.lock().await;
        let item = items
            .get_mut(temp_id)
            .ok_or_else(|| ModerationError::NotFound(temp_id.to_string()))?;
        item.admin_photo = Some(photo_ref);
        Ok(())
    }

    /// Removes and returns the item in one critical section.
    ///
    /// Only the first call for an id gets the item; every later call gets
    /// [`ModerationError::NotFound`].
    pub async fn resolve(&self, temp_id: &str) -> Result<PendingItem, ModerationError> {
        let item = self
            .items
            .lock()
            .await
            .remove(temp_id)
            .ok_or_else(|| ModerationError::NotFound(temp_id.to_string()))?;
        info!("Resolved {} after {}", temp_id, waited(item.created_at, Utc::now()));
        Ok(item)
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

/// How long an item waited, e.g. `3m 07s`
pub fn waited(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - since).num_seconds().max(0);
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m {:02}s", secs / 60, secs % 60),
        _ => format!("{}h {:02}m", secs / 3600, secs % 3600 / 60),
    }
}
