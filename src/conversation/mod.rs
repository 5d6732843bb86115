//! Per-user dialogue state: the ad form and admin prompts

pub mod session;
pub mod state;

pub use session::{AdminPrompt, Session, SessionStore};
pub use state::{CompletedForm, Conversation, Input, Step, Transition};
