//! Ad form state machine.
//!
//! One [`Conversation`] per user collects a [`Submission`] step by step. The
//! only branch points are the role (chosen first, applied after gender) and
//! the video step, which employers never see. Transitions are a pure table
//! keyed by `(step, role)`; [`Conversation::apply`] decides what an input
//! means for the current step.

use std::mem;

use crate::ads::{fields, Gender, Role, Submission, EMPLOYER_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    RoleSelection,
    Region,
    Gender,
    FullName,
    Age,
    Skill,
    Responsibility,
    AgeRange,
    Requirements,
    WorkHours,
    FreeTime,
    ExtraNotes,
    Salary,
    Phone,
    Video,
    ProofImage,
    /// Proof sent, submission handed to moderation
    ModerationWait,
}

impl Step {
    /// Submission field a free-text step writes to.
    pub fn text_field(self, role: Role) -> Option<&'static str> {
        let field = match self {
            Step::Region => fields::REGION,
            Step::FullName => fields::FULL_NAME,
            Step::Age => fields::AGE,
            Step::Skill => fields::SKILL,
            Step::Responsibility => fields::RESPONSIBILITY,
            Step::AgeRange => fields::AGE_RANGE,
            Step::Requirements => fields::REQUIREMENTS,
            Step::WorkHours => fields::WORK_HOURS,
            Step::FreeTime => fields::FREE_TIME,
            Step::ExtraNotes => fields::EXTRA_NOTES,
            Step::Salary => match role {
                Role::Seeker => fields::SALARY_EXPECTATION,
                Role::Employer => fields::SALARY_OFFER,
            },
            Step::Phone => fields::PHONE,
            Step::RoleSelection | Step::Gender | Step::Video | Step::ProofImage | Step::ModerationWait => {
                return None
            }
        };
        Some(field)
    }

    pub fn is_terminal(self) -> bool {
        self == Step::ModerationWait
    }
}

/// Transition table. `None` only for the terminal step.
pub fn next_step(step: Step, role: Role) -> Option<Step> {
    let next = match (step, role) {
        (Step::RoleSelection, _) => Step::Region,
        (Step::Region, _) => Step::Gender,
        (Step::Gender, Role::Seeker) => Step::FullName,
        (Step::Gender, Role::Employer) => Step::AgeRange,
        (Step::FullName, _) => Step::Age,
        (Step::Age, _) => Step::Skill,
        (Step::Skill, _) => Step::Responsibility,
        (Step::Responsibility, _) => Step::WorkHours,
        (Step::AgeRange, _) => Step::Requirements,
        (Step::Requirements, _) => Step::WorkHours,
        (Step::WorkHours, Role::Seeker) => Step::FreeTime,
        (Step::WorkHours, Role::Employer) => Step::ExtraNotes,
        (Step::FreeTime, _) => Step::ExtraNotes,
        (Step::ExtraNotes, _) => Step::Salary,
        (Step::Salary, _) => Step::Phone,
        (Step::Phone, Role::Seeker) => Step::Video,
        (Step::Phone, Role::Employer) => Step::ProofImage,
        (Step::Video, _) => Step::ProofImage,
        (Step::ProofImage, _) => Step::ModerationWait,
        (Step::ModerationWait, _) => return None,
    };
    Some(next)
}

/// What the user sent, already classified by the chat layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Photo(String),
    Video(String),
    Role(Role),
    Gender(Gender),
    SkipVideo,
}

/// A finished form, ready for the pending queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedForm {
    pub submission: Submission,
    pub proof_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Advanced(Step),
    Completed(CompletedForm),
    /// Input doesn't fit the current step; nothing changed
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    step: Step,
    role: Option<Role>,
    submission: Submission,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            step: Step::RoleSelection,
            role: None,
            submission: Submission::new(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn is_terminal(&self) -> bool {
        self.step.is_terminal()
    }

    pub fn apply(&mut self, input: Input) -> Transition {
        match (self.step, input) {
            (Step::RoleSelection, Input::Role(role)) => {
                self.role = Some(role);
                self.submission.set(fields::ROLE, role.as_ref());
                self.advance()
            }
            (Step::Gender, Input::Gender(gender)) => {
                self.submission.set(fields::GENDER, gender.as_ref());
                if self.role == Some(Role::Employer) {
                    self.submission.set(fields::FULL_NAME, EMPLOYER_NAME);
                }
                self.advance()
            }
            (Step::Video, Input::Video(video_ref)) => {
                self.submission.set(fields::VIDEO_REF, video_ref);
                self.advance()
            }
            (Step::Video, Input::SkipVideo) => self.advance(),
            (Step::ProofImage, Input::Photo(proof_ref)) => {
                self.step = Step::ModerationWait;
                Transition::Completed(CompletedForm {
                    submission: mem::take(&mut self.submission),
                    proof_ref,
                })
            }
            (step, Input::Text(text)) => {
                let Some(field) = self.role.and_then(|role| step.text_field(role)) else {
                    return Transition::Ignored;
                };
                let value = text.trim();
                if value.is_empty() {
                    return Transition::Ignored;
                }
                self.submission.set(field, value);
                self.advance()
            }
            _ => Transition::Ignored,
        }
    }

    fn advance(&mut self) -> Transition {
        match self.role.and_then(|role| next_step(self.step, role)) {
            Some(next) => {
                self.step = next;
                Transition::Advanced(next)
            }
            None => Transition::Ignored,
        }
    }
}
