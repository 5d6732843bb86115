//! Job ads: form data, display formatting and identifiers

pub mod format;
pub mod ids;
pub mod submission;

pub use format::{format_ad, FormatOptions};
pub use submission::{fields, required_fields, Gender, Role, Submission, EMPLOYER_NAME};
