//! Test environment: on-disk database, real handlers, recorded platform

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;
use teloxide::types::{InlineKeyboardButtonKind, ReplyMarkup};

use adboard::conversation::SessionStore;
use adboard::core::settings::{AdPhotos, BotSettings, ChannelKind, PaymentInfo, SettingsSeed};
use adboard::moderation::{Moderation, PendingQueue};
use adboard::storage::{create_pool, DbPool};
use adboard::telegram::bot::Command;
use adboard::telegram::handlers::{dispatch, CallbackAnswer, HandlerDeps, Inbound, InboundEvent};
use adboard::telegram::keyboards;
use adboard::telegram::{ChatPlatform, MessageRef};

use super::recorder::{ApiCall, RecordingPlatform};

pub const SUPER_ADMIN: i64 = 500;
pub const SECOND_ADMIN: i64 = 501;
pub const MALE_CHANNEL: i64 = -1001;
pub const FEMALE_CHANNEL: i64 = -1002;
pub const HIDDEN_CHANNEL: i64 = -1003;

pub fn test_seed() -> SettingsSeed {
    SettingsSeed {
        super_admin: Some(SUPER_ADMIN),
        channels: vec![
            (ChannelKind::Male, MALE_CHANNEL),
            (ChannelKind::Female, FEMALE_CHANNEL),
            (ChannelKind::Hidden, HIDDEN_CHANNEL),
        ],
        payment: PaymentInfo {
            card: "8600 1111 2222 3333".to_string(),
            owner: "Aziz Karimov".to_string(),
            price: "15 000 so'm".to_string(),
        },
        photos: AdPhotos::default(),
    }
}

/// Everything a handler needs, wired the way `main` wires it
pub struct TestEnvironment {
    pub dir: TempDir,
    pub pool: DbPool,
    pub platform: Arc<RecordingPlatform>,
    pub settings: Arc<BotSettings>,
    pub moderation: Arc<Moderation>,
    pub sessions: Arc<SessionStore>,
    pub deps: HandlerDeps,
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_seed(test_seed())
    }

    pub fn with_seed(seed: SettingsSeed) -> Self {
        Self::open(tempfile::tempdir().unwrap(), seed)
    }

    fn open(dir: TempDir, seed: SettingsSeed) -> Self {
        let path = dir.path().join("adboard.sqlite");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        let db_pool = Arc::new(pool.clone());
        let settings = Arc::new(BotSettings::load(pool.clone(), seed).unwrap());
        let platform = Arc::new(RecordingPlatform::new());
        let chat: Arc<dyn ChatPlatform> = platform.clone();
        let moderation = Arc::new(Moderation::new(
            Arc::new(PendingQueue::new()),
            Arc::clone(&settings),
            Arc::clone(&db_pool),
            Arc::clone(&chat),
        ));
        let sessions = Arc::new(SessionStore::new());
        let deps = HandlerDeps::new(
            Arc::clone(&settings),
            Arc::clone(&sessions),
            Arc::clone(&moderation),
            db_pool,
            chat,
        );

        Self {
            dir,
            pool,
            platform,
            settings,
            moderation,
            sessions,
            deps,
        }
    }

    /// Simulates a process restart: same database file, everything in memory is new
    pub fn restart(self) -> Self {
        let TestEnvironment { dir, .. } = self;
        Self::open(dir, test_seed())
    }

    pub async fn send(&self, user_id: i64, payload: Inbound) -> Option<CallbackAnswer> {
        dispatch(
            &self.deps,
            InboundEvent {
                user_id,
                chat_id: user_id,
                payload,
            },
        )
        .await
    }

    pub async fn command(&self, user_id: i64, command: Command) {
        self.send(user_id, Inbound::Command(command)).await;
    }

    pub async fn text(&self, user_id: i64, text: &str) {
        self.send(user_id, Inbound::Text(text.to_string())).await;
    }

    pub async fn photo(&self, user_id: i64, file_id: &str) {
        self.send(user_id, Inbound::Photo(file_id.to_string())).await;
    }

    pub async fn video(&self, user_id: i64, file_id: &str) {
        self.send(user_id, Inbound::Video(file_id.to_string())).await;
    }

    /// Presses an inline button
    pub async fn press(&self, user_id: i64, data: &str, origin: Option<MessageRef>) -> CallbackAnswer {
        self.send(
            user_id,
            Inbound::Callback {
                data: data.to_string(),
                origin,
            },
        )
        .await
        .expect("callbacks are always answered")
    }

    /// Moderation card the admin received last: the message and its temp id
    pub fn last_card(&self, admin_id: i64) -> Option<(MessageRef, String)> {
        self.platform
            .sent_to(admin_id)
            .into_iter()
            .rev()
            .find_map(|call| {
                let temp_id = call.markup().and_then(temp_id_in)?;
                Some((call.message(), temp_id))
            })
    }

    pub async fn approve(&self, admin_id: i64, temp_id: &str, card: Option<MessageRef>) -> CallbackAnswer {
        self.press(admin_id, &format!("mod:approve:{}", temp_id), card).await
    }

    pub async fn reject(&self, admin_id: i64, temp_id: &str, card: Option<MessageRef>) -> CallbackAnswer {
        self.press(admin_id, &format!("mod:reject:{}", temp_id), card).await
    }
}

/// Temp id carried by a moderation keyboard
pub fn temp_id_in(markup: &ReplyMarkup) -> Option<String> {
    let ReplyMarkup::InlineKeyboard(keyboard) = markup else {
        return None;
    };
    keyboard.inline_keyboard.iter().flatten().find_map(|button| match &button.kind {
        InlineKeyboardButtonKind::CallbackData(data) => data.strip_prefix("mod:approve:").map(str::to_string),
        _ => None,
    })
}

/// Body of the first call matching a predicate
pub fn find_body(calls: &[ApiCall], predicate: impl Fn(&str) -> bool) -> Option<String> {
    calls.iter().map(|call| call.body().to_string()).find(|body| predicate(body))
}

/// Walks a seeker through the whole form. `video` is sent instead of skipping.
pub async fn submit_seeker(env: &TestEnvironment, user_id: i64, gender: &str, video: Option<&str>) {
    env.command(user_id, Command::Start).await;
    env.text(user_id, keyboards::ROLE_SEEKER).await;
    env.text(user_id, "Toshkent").await;
    env.press(user_id, &format!("gender:{}", gender), None).await;
    env.text(user_id, "Ali Valiyev").await;
    env.text(user_id, "25").await;
    env.text(user_id, "Oshpaz").await;
    env.text(user_id, "Oshxona tozaligi").await;
    env.text(user_id, "9:00-18:00").await;
    env.text(user_id, "Yakshanba").await;
    env.text(user_id, "Tajriba 3 yil").await;
    env.text(user_id, "5 mln").await;
    env.text(user_id, "+998901234567").await;
    match video {
        Some(file_id) => env.video(user_id, file_id).await,
        None => env.text(user_id, keyboards::SKIP_VIDEO).await,
    }
    env.photo(user_id, "proof-seeker").await;
}

/// Walks an employer through the whole form
pub async fn submit_employer(env: &TestEnvironment, user_id: i64, gender: &str) {
    env.command(user_id, Command::Start).await;
    env.text(user_id, keyboards::ROLE_EMPLOYER).await;
    env.text(user_id, "Samarqand").await;
    env.press(user_id, &format!("gender:{}", gender), None).await;
    env.text(user_id, "20-30 yosh").await;
    env.text(user_id, "Sotuvchi, kassa bilan ishlash").await;
    env.text(user_id, "8:00-17:00").await;
    env.text(user_id, "Registon yonida").await;
    env.text(user_id, "4 mln").await;
    env.text(user_id, "+998911112233").await;
    env.photo(user_id, "proof-employer").await;
}
