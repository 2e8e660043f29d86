use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{Submission, SubmissionForm, SubmissionId};
use super::redirect::add_query_arg;
use super::repository::{
    ConfirmationMessage, ConfirmationSender, RepositoryError, SubmissionRepository,
};
use super::router::FORM_PATH;
use super::sanitize::{clean_submission, Rejection};

/// Service composing the submissions store and the confirmation mailer.
pub struct IntakeService<R, M> {
    repository: Arc<R>,
    mailer: Arc<M>,
    from_address: String,
}

/// Result of a submission that was not rejected.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Stored and confirmed; the client should be sent to `redirect_to`.
    Accepted {
        submission: Submission,
        redirect_to: String,
    },
    /// The submissions table does not exist, so nothing was stored or sent.
    TableMissing,
}

impl<R, M> IntakeService<R, M>
where
    R: SubmissionRepository + 'static,
    M: ConfirmationSender + 'static,
{
    pub fn new(repository: Arc<R>, mailer: Arc<M>, from_address: impl Into<String>) -> Self {
        Self {
            repository,
            mailer,
            from_address: from_address.into(),
        }
    }

    /// Ensure the submissions table exists. Callers treat failure as fatal.
    pub fn install(&self) -> Result<(), IntakeError> {
        self.repository.install_schema()?;
        Ok(())
    }

    /// Clean, store, and confirm a posted form.
    ///
    /// A missing table drops the post before any validation. The confirmation
    /// is best effort: a mail failure is logged and the stored submission stands.
    pub fn submit(
        &self,
        form: &SubmissionForm,
        referer: Option<&str>,
    ) -> Result<SubmitOutcome, IntakeError> {
        if !self.repository.table_exists()? {
            warn!("submissions table missing; dropping submission");
            return Ok(SubmitOutcome::TableMissing);
        }

        let clean = clean_submission(form).map_err(IntakeError::Rejected)?;

        let submission = self.repository.insert(clean)?;
        info!(id = %submission.id, campus = %submission.campus, "inquiry submitted");

        let redirect_to = redirect_target(referer);
        self.send_confirmation(&submission);

        Ok(SubmitOutcome::Accepted {
            submission,
            redirect_to,
        })
    }

    fn send_confirmation(&self, submission: &Submission) {
        let message =
            ConfirmationMessage::workshop_confirmation(&self.from_address, &submission.email);
        if let Err(err) = self.mailer.send(&message) {
            warn!(id = %submission.id, error = %err, "confirmation message not sent");
        }
    }

    /// Mark a submission reviewed. Unknown ids are a silent no-op.
    pub fn mark_complete(&self, id: SubmissionId) -> Result<(), IntakeError> {
        if self.repository.mark_complete(id)? {
            info!(%id, "submission marked complete");
        } else {
            debug!(%id, "no submission to mark complete");
        }
        Ok(())
    }

    /// All submissions, newest first.
    pub fn submissions(&self) -> Result<Vec<Submission>, IntakeError> {
        Ok(self.repository.newest_first()?)
    }

    /// Apply an optional completion toggle, then list.
    pub fn review(&self, complete: Option<SubmissionId>) -> Result<Vec<Submission>, IntakeError> {
        if let Some(id) = complete {
            self.mark_complete(id)?;
        }
        self.submissions()
    }
}

/// Where to send the client after a stored submission. Callers pass only a
/// referer already known to point back at this site.
pub fn redirect_target(referer: Option<&str>) -> String {
    let base = referer
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(FORM_PATH);
    add_query_arg(base, "submitted", "yes")
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("submission rejected: {0}")]
    Rejected(Rejection),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
