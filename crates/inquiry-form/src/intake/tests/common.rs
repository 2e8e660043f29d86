use std::sync::{Arc, Mutex};

use axum::response::Response;

use crate::intake::domain::{NewSubmission, Submission, SubmissionForm, SubmissionId};
use crate::intake::repository::{
    ConfirmationMessage, ConfirmationSender, MailError, RepositoryError, SubmissionRepository,
};
use crate::intake::store::SqliteSubmissionRepository;
use crate::intake::{intake_router, IntakeService};

pub(super) const FROM_ADDRESS: &str = "workshops@example.edu";

pub(super) fn jane_form() -> SubmissionForm {
    SubmissionForm {
        action: Some("handle_inquiry_form".to_string()),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("jane@x.com".to_string()),
        phone: Some("555-1000".to_string()),
        campus: Some("towson".to_string()),
        workshop: Some("Robotics".to_string()),
    }
}

pub(super) fn form_for(first_name: &str, campus: &str) -> SubmissionForm {
    SubmissionForm {
        first_name: Some(first_name.to_string()),
        email: Some(format!("{}@x.com", first_name.to_lowercase())),
        campus: Some(campus.to_string()),
        ..jane_form()
    }
}

pub(super) fn jane_body() -> &'static str {
    "action=handle_inquiry_form&firstName=Jane&lastName=Doe&email=jane%40x.com&phone=555-1000&campus=towson&workshop=Robotics"
}

pub(super) fn installed_repository() -> Arc<SqliteSubmissionRepository> {
    let repository = SqliteSubmissionRepository::in_memory("wp_").expect("in-memory store");
    repository.install_schema().expect("schema installs");
    Arc::new(repository)
}

pub(super) type TestService = IntakeService<SqliteSubmissionRepository, MemoryMailer>;

pub(super) fn build_service() -> (
    TestService,
    Arc<SqliteSubmissionRepository>,
    Arc<MemoryMailer>,
) {
    let repository = installed_repository();
    let mailer = Arc::new(MemoryMailer::default());
    let service = IntakeService::new(repository.clone(), mailer.clone(), FROM_ADDRESS);
    (service, repository, mailer)
}

pub(super) fn router_with_service<R, M>(service: IntakeService<R, M>) -> axum::Router
where
    R: SubmissionRepository + 'static,
    M: ConfirmationSender + 'static,
{
    intake_router(Arc::new(service))
}

#[derive(Default)]
pub(super) struct MemoryMailer {
    sent: Mutex<Vec<ConfirmationMessage>>,
}

impl MemoryMailer {
    pub(super) fn sent(&self) -> Vec<ConfirmationMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl ConfirmationSender for MemoryMailer {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) struct FailingMailer;

impl ConfirmationSender for FailingMailer {
    fn send(&self, _message: &ConfirmationMessage) -> Result<(), MailError> {
        Err(MailError::Transport("smtp relay refused connection".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn install_schema(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn table_exists(&self) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _submission: NewSubmission) -> Result<Submission, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn mark_complete(&self, _id: SubmissionId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn newest_first(&self) -> Result<Vec<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
