//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod recorder;

#[allow(unused_imports)]
pub use fixtures::{
    submit_employer, submit_seeker, temp_id_in, TestEnvironment, FEMALE_CHANNEL, HIDDEN_CHANNEL, MALE_CHANNEL,
    SECOND_ADMIN, SUPER_ADMIN,
};
#[allow(unused_imports)]
pub use recorder::{ApiCall, RecordingPlatform};
