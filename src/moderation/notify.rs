//! Fan-out of new ads to every admin

use futures_util::future::join_all;

use crate::ads::{format_ad, FormatOptions};
use crate::moderation::queue::PendingItem;
use crate::telegram::keyboards::moderation_keyboard;
use crate::telegram::platform::ChatPlatform;

/// Caption of the admin's copy of a new ad (sent on top of the payment proof)
pub fn admin_card_caption(item: &PendingItem) -> String {
    format!(
        "🆕 YANGI E'LON!\n\n{}\n\nBoshqarish tugmalari:",
        format_ad(&item.submission, FormatOptions::PREVIEW)
    )
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: Vec<i64>,
    pub failed: Vec<i64>,
}

/// Sends the moderation card to every admin concurrently.
///
/// Each delivery stands alone: an admin who blocked the bot or never opened
/// it is logged and skipped.
pub async fn broadcast_new_ad(platform: &dyn ChatPlatform, admins: &[i64], item: &PendingItem) -> BroadcastReport {
    let caption = admin_card_caption(item);

    let sends = admins.iter().map(|&admin_id| {
        let caption = caption.as_str();
        async move {
            let result = platform
                .send_photo(admin_id, &item.proof_ref, caption, Some(moderation_keyboard(&item.temp_id)))
                .await;
            (admin_id, result)
        }
    });

    let mut report = BroadcastReport::default();
    for (admin_id, result) in join_all(sends).await {
        match result {
            Ok(_) => report.delivered.push(admin_id),
            Err(e) => {
                log::warn!("Failed to notify admin {} about {}: {}", admin_id, item.temp_id, e);
                report.failed.push(admin_id);
            }
        }
    }
    if report.delivered.is_empty() {
        log::error!("No admin received pending ad {}", item.temp_id);
    }
    report
}
