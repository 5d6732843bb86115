use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::conversation::state::Conversation;
use crate::core::settings::{ChannelKind, PaymentField};

/// What an admin was last asked to type or send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPrompt {
    NewAdminId,
    RemoveAdminId,
    ChannelId(ChannelKind),
    Payment(PaymentField),
    SearchCode,
    /// Replacement ad text for the pending item with this temp id
    ReplacementText(String),
    /// Replacement photo for the pending item with this temp id
    ReplacementPhoto(String),
}

/// Per-user dialogue state. A user is in at most one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Form(Conversation),
    Admin(AdminPrompt),
}

type Slot = Arc<Mutex<Option<Session>>>;

/// Sessions keyed by user id.
///
/// Each user has a slot behind its own mutex: handlers hold the guard for the
/// whole event, so events from one user run one after another while different
/// users never wait on each other.
#[derive(Default)]
pub struct SessionStore {
    slots: DashMap<i64, Slot>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the user's slot until the guard is dropped.
    pub async fn lock(&self, user_id: i64) -> OwnedMutexGuard<Option<Session>> {
        let slot = self
            .slots
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();
        slot.lock_owned().await
    }

    /// Unlocks the slot and forgets it if the user has no session left.
    ///
    /// A slot another task still holds or waits on is kept.
    pub fn release(&self, user_id: i64, guard: OwnedMutexGuard<Option<Session>>) {
        let idle = guard.is_none();
        drop(guard);
        if idle {
            self.slots.remove_if(&user_id, |_, slot| {
                Arc::strong_count(slot) == 1 && slot.try_lock().is_ok_and(|session| session.is_none())
            });
        }
    }

    /// Copy of the user's current session
    pub async fn current(&self, user_id: i64) -> Option<Session> {
        let guard = self.lock(user_id).await;
        let session = guard.clone();
        self.release(user_id, guard);
        session
    }

    pub async fn clear(&self, user_id: i64) {
        let mut guard = self.lock(user_id).await;
        *guard = None;
        self.release(user_id, guard);
    }

    /// Users with a slot in memory
    pub fn tracked(&self) -> usize {
        self.slots.len()
    }
}
