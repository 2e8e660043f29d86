//! Workshop inquiry intake: public form, submission handling, confirmation
//! mail, and the administrator review listing.

pub mod domain;
pub mod mailer;
pub mod redirect;
pub mod render;
pub mod repository;
pub mod router;
pub mod sanitize;
pub mod schema;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Campus, NewSubmission, Submission, SubmissionForm, SubmissionId, SubmissionStatus,
};
pub use mailer::{LogMailer, SpoolMailer};
pub use render::RenderError;
pub use repository::{
    ConfirmationMessage, ConfirmationSender, MailError, RepositoryError, SubmissionRepository,
};
pub use router::{admin_router, intake_router, public_router};
pub use sanitize::Rejection;
pub use service::{IntakeError, IntakeService, SubmitOutcome};
pub use store::SqliteSubmissionRepository;
