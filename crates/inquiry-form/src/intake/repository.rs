use serde::Serialize;

use super::domain::{NewSubmission, Submission, SubmissionId};

/// Storage abstraction so the service and router can be exercised in isolation.
pub trait SubmissionRepository: Send + Sync {
    /// Create the submissions table when it is absent. Safe to call repeatedly.
    fn install_schema(&self) -> Result<(), RepositoryError>;
    fn table_exists(&self) -> Result<bool, RepositoryError>;
    fn insert(&self, submission: NewSubmission) -> Result<Submission, RepositoryError>;
    /// Returns whether a row matched `id`.
    fn mark_complete(&self, id: SubmissionId) -> Result<bool, RepositoryError>;
    fn fetch(&self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError>;
    /// Every submission, newest first.
    fn newest_first(&self) -> Result<Vec<Submission>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored submission {id} is unreadable: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Outbound mail hook. Delivery is best effort; callers never retry.
pub trait ConfirmationSender: Send + Sync {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), MailError>;
}

pub const CONFIRMATION_SUBJECT: &str = "Confirmation Message";
pub const CONFIRMATION_BODY: &str = "Thank you for your interest in our Workshops!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ConfirmationMessage {
    pub fn workshop_confirmation(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body: CONFIRMATION_BODY.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}
