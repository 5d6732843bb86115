//! Runtime bot settings: admins, distribution channels, payment details.
//!
//! Loaded once at startup from the database (seeded from the environment where
//! the database has nothing yet) and then served from memory. Every admin-side
//! change is written to the database first and to the cache second, under the
//! same write lock, so the two never disagree.

use std::collections::{BTreeSet, HashMap};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tokio::sync::RwLock;

use crate::ads::{Gender, Role, Submission};
use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::storage::db::{self, get_connection, DbPool};

/// Distribution channel kinds, stored by their snake_case name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ChannelKind {
    Male,
    Female,
    Hidden,
}

impl ChannelKind {
    pub fn label(self) -> &'static str {
        match self {
            ChannelKind::Male => "🚹 Erkaklar kanali",
            ChannelKind::Female => "👩 Ayollar kanali",
            ChannelKind::Hidden => "🔒 Yashirin kanal",
        }
    }
}

/// Editable payment settings, stored under their snake_case name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PaymentField {
    Card,
    Owner,
    Price,
}

impl PaymentField {
    pub fn label(self) -> &'static str {
        match self {
            PaymentField::Card => "💳 Karta raqam",
            PaymentField::Owner => "👤 Karta egasi",
            PaymentField::Price => "💰 Narx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub card: String,
    pub owner: String,
    pub price: String,
}

impl PaymentInfo {
    pub fn get(&self, field: PaymentField) -> &str {
        match field {
            PaymentField::Card => &self.card,
            PaymentField::Owner => &self.owner,
            PaymentField::Price => &self.price,
        }
    }

    fn set(&mut self, field: PaymentField, value: String) {
        match field {
            PaymentField::Card => self.card = value,
            PaymentField::Owner => self.owner = value,
            PaymentField::Price => self.price = value,
        }
    }
}

/// Static cover photos for published ads, keyed by role and gender
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdPhotos {
    pub seeker_male: Option<String>,
    pub seeker_female: Option<String>,
    pub employer_male: Option<String>,
    pub employer_female: Option<String>,
}

impl AdPhotos {
    pub fn from_env() -> Self {
        Self {
            seeker_male: config::photos::SEEKER_MALE.clone(),
            seeker_female: config::photos::SEEKER_FEMALE.clone(),
            employer_male: config::photos::EMPLOYER_MALE.clone(),
            employer_female: config::photos::EMPLOYER_FEMALE.clone(),
        }
    }

    /// Photo for an ad, if one is configured for its role and gender.
    pub fn for_ad(&self, ad: &Submission) -> Option<&str> {
        let photo = match (ad.role()?, ad.gender()?) {
            (Role::Seeker, Gender::Male) => &self.seeker_male,
            (Role::Seeker, Gender::Female) => &self.seeker_female,
            (Role::Employer, Gender::Male) => &self.employer_male,
            (Role::Employer, Gender::Female) => &self.employer_female,
        };
        photo.as_deref()
    }
}

/// Values written to the database at startup when it has none of its own.
#[derive(Debug, Clone)]
pub struct SettingsSeed {
    pub super_admin: Option<i64>,
    pub channels: Vec<(ChannelKind, i64)>,
    pub payment: PaymentInfo,
    pub photos: AdPhotos,
}

impl SettingsSeed {
    pub fn from_env() -> Self {
        let super_admin = Some(*config::admin::SUPER_ADMIN_ID).filter(|id| *id != 0);
        let channels = [
            (ChannelKind::Male, *config::channels::MALE_CHANNEL_ID),
            (ChannelKind::Female, *config::channels::FEMALE_CHANNEL_ID),
            (ChannelKind::Hidden, *config::channels::HIDDEN_CHANNEL_ID),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
        .collect();

        Self {
            super_admin,
            channels,
            payment: PaymentInfo {
                card: config::payment::CARD.clone(),
                owner: config::payment::OWNER.clone(),
                price: config::payment::PRICE.clone(),
            },
            photos: AdPhotos::from_env(),
        }
    }
}

/// Point-in-time copy of the mutable settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    pub admins: BTreeSet<i64>,
    pub channels: HashMap<ChannelKind, i64>,
    pub payment: PaymentInfo,
}

pub struct BotSettings {
    super_admin: Option<i64>,
    pool: DbPool,
    state: RwLock<SettingsState>,
    photos: AdPhotos,
}

impl BotSettings {
    /// Seeds missing values and loads the cache from the database.
    ///
    /// The super admin is always (re)inserted. Channels and payment fields from
    /// the seed are only written when the database has no value yet.
    pub fn load(pool: DbPool, seed: SettingsSeed) -> AppResult<Self> {
        let conn = get_connection(&pool)?;

        if let Some(super_admin) = seed.super_admin {
            db::add_admin(&conn, super_admin)?;
        }

        let stored_channels = db::get_channels(&conn)?;
        for (kind, id) in &seed.channels {
            if !stored_channels.contains_key(kind.as_ref()) {
                log::info!("Seeding {} channel from environment: {}", kind, id);
                db::set_channel(&conn, kind.as_ref(), *id)?;
            }
        }

        let stored_settings = db::get_settings(&conn)?;
        for field in PaymentField::iter() {
            if !stored_settings.contains_key(field.as_ref()) {
                db::set_setting(&conn, field.as_ref(), seed.payment.get(field))?;
            }
        }

        let admins = db::list_admins(&conn)?;

        let mut channels = HashMap::new();
        for (name, id) in db::get_channels(&conn)? {
            match name.parse::<ChannelKind>() {
                Ok(kind) => {
                    channels.insert(kind, id);
                }
                Err(_) => log::warn!("Ignoring unknown channel type in database: {}", name),
            }
        }

        let stored_settings = db::get_settings(&conn)?;
        let mut payment = seed.payment.clone();
        for field in PaymentField::iter() {
            if let Some(value) = stored_settings.get(field.as_ref()) {
                payment.set(field, value.clone());
            }
        }

        log::info!(
            "Settings loaded: {} admin(s), {} channel(s)",
            admins.len(),
            channels.len()
        );

        Ok(Self {
            super_admin: seed.super_admin,
            pool,
            state: RwLock::new(SettingsState {
                admins,
                channels,
                payment,
            }),
            photos: seed.photos,
        })
    }

    pub fn super_admin(&self) -> Option<i64> {
        self.super_admin
    }

    pub fn photos(&self) -> &AdPhotos {
        &self.photos
    }

    pub async fn snapshot(&self) -> SettingsState {
        self.state.read().await.clone()
    }

    pub async fn is_admin(&self, user_id: i64) -> bool {
        self.state.read().await.admins.contains(&user_id)
    }

    pub async fn admins(&self) -> Vec<i64> {
        self.state.read().await.admins.iter().copied().collect()
    }

    pub async fn channel(&self, kind: ChannelKind) -> Option<i64> {
        self.state.read().await.channels.get(&kind).copied()
    }

    pub async fn payment(&self) -> PaymentInfo {
        self.state.read().await.payment.clone()
    }

    pub async fn add_admin(&self, user_id: i64) -> AppResult<()> {
        let mut state = self.state.write().await;
        let conn = get_connection(&self.pool)?;
        db::add_admin(&conn, user_id)?;
        state.admins.insert(user_id);
        log::info!("Admin added: {}", user_id);
        Ok(())
    }

    /// Removes an admin. The super admin is refused with
    /// [`AppError::SuperAdminProtected`].
    ///
    /// Returns whether the id was an admin.
    pub async fn remove_admin(&self, user_id: i64) -> AppResult<bool> {
        if self.super_admin == Some(user_id) {
            return Err(AppError::SuperAdminProtected(user_id));
        }
        let mut state = self.state.write().await;
        let conn = get_connection(&self.pool)?;
        db::remove_admin(&conn, user_id)?;
        let existed = state.admins.remove(&user_id);
        log::info!("Admin removed: {} (existed: {})", user_id, existed);
        Ok(existed)
    }

    pub async fn set_channel(&self, kind: ChannelKind, channel_id: i64) -> AppResult<()> {
        let mut state = self.state.write().await;
        let conn = get_connection(&self.pool)?;
        db::set_channel(&conn, kind.as_ref(), channel_id)?;
        state.channels.insert(kind, channel_id);
        log::info!("Channel {} set to {}", kind, channel_id);
        Ok(())
    }

    pub async fn set_payment(&self, field: PaymentField, value: &str) -> AppResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Validation(format!("{} cannot be empty", field)));
        }
        let mut state = self.state.write().await;
        let conn = get_connection(&self.pool)?;
        db::set_setting(&conn, field.as_ref(), value)?;
        state.payment.set(field, value.to_string());
        log::info!("Payment setting {} updated", field);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::fields;
    use crate::storage::create_pool;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn seed() -> SettingsSeed {
        SettingsSeed {
            super_admin: Some(1),
            channels: vec![(ChannelKind::Male, -100), (ChannelKind::Hidden, -300)],
            payment: PaymentInfo {
                card: config::payment::DEFAULT_CARD.to_string(),
                owner: config::payment::DEFAULT_OWNER.to_string(),
                price: config::payment::DEFAULT_PRICE.to_string(),
            },
            photos: AdPhotos {
                seeker_male: Some("seeker-male-photo".to_string()),
                ..AdPhotos::default()
            },
        }
    }

    fn pool() -> (TempDir, DbPool) {
        let dir = TempDir::new().unwrap();
        let pool = create_pool(dir.path().join("settings.sqlite").to_str().unwrap()).unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_load_seeds_empty_database() {
        let (_dir, pool) = pool();
        let settings = BotSettings::load(pool, seed()).unwrap();

        let state = settings.snapshot().await;
        assert_eq!(state.admins.into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(state.channels.get(&ChannelKind::Male), Some(&-100));
        assert_eq!(state.channels.get(&ChannelKind::Female), None);
        assert_eq!(state.payment.price, "10 000 so'm");
    }

    #[tokio::test]
    async fn test_stored_values_win_over_seed() {
        let (_dir, pool) = pool();
        {
            let conn = get_connection(&pool).unwrap();
            db::set_channel(&conn, "male", -999).unwrap();
            db::set_setting(&conn, "card", "9860 1111 2222 3333").unwrap();
        }

        let settings = BotSettings::load(pool, seed()).unwrap();
        assert_eq!(settings.channel(ChannelKind::Male).await, Some(-999));
        assert_eq!(settings.channel(ChannelKind::Hidden).await, Some(-300));
        assert_eq!(settings.payment().await.card, "9860 1111 2222 3333");
        assert_eq!(settings.payment().await.owner, "Noma'lum");
    }

    #[tokio::test]
    async fn test_mutations_reach_cache_and_database() {
        let (_dir, pool) = pool();
        let settings = BotSettings::load(pool.clone(), seed()).unwrap();

        settings.add_admin(42).await.unwrap();
        settings.set_channel(ChannelKind::Female, -200).await.unwrap();
        settings.set_payment(PaymentField::Price, "20 000 so'm").await.unwrap();

        assert!(settings.is_admin(42).await);
        assert_eq!(settings.channel(ChannelKind::Female).await, Some(-200));

        let reloaded = BotSettings::load(pool, seed()).unwrap();
        assert!(reloaded.is_admin(42).await);
        assert_eq!(reloaded.channel(ChannelKind::Female).await, Some(-200));
        assert_eq!(reloaded.payment().await.price, "20 000 so'm");

        assert!(settings.remove_admin(42).await.unwrap());
        assert!(!settings.is_admin(42).await);
        assert!(!settings.remove_admin(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_super_admin_cannot_be_removed() {
        let (_dir, pool) = pool();
        let settings = BotSettings::load(pool, seed()).unwrap();

        let err = settings.remove_admin(1).await.unwrap_err();
        assert!(matches!(err, AppError::SuperAdminProtected(1)));
        assert!(settings.is_admin(1).await);
    }

    #[tokio::test]
    async fn test_empty_payment_value_is_rejected() {
        let (_dir, pool) = pool();
        let settings = BotSettings::load(pool, seed()).unwrap();

        assert!(settings.set_payment(PaymentField::Owner, "   ").await.is_err());
        assert_eq!(settings.payment().await.owner, "Noma'lum");
    }

    #[test]
    fn test_photo_lookup_by_role_and_gender() {
        let photos = seed().photos;
        let mut ad = Submission::new();
        ad.set(fields::ROLE, "seeker");
        ad.set(fields::GENDER, "male");
        assert_eq!(photos.for_ad(&ad), Some("seeker-male-photo"));

        ad.set(fields::GENDER, "female");
        assert_eq!(photos.for_ad(&ad), None);

        ad.set(fields::ROLE, "nobody");
        assert_eq!(photos.for_ad(&ad), None);
    }
}
