//! Pending ads and the admin decisions that resolve them

pub mod notify;
pub mod queue;
pub mod resolver;

use thiserror::Error;

pub use queue::{PendingItem, PendingQueue};
pub use resolver::{Approval, Moderation, Rejection};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModerationError {
    /// Unknown temporary id, or the item was already approved or rejected
    #[error("pending ad {0} not found")]
    NotFound(String),
}
