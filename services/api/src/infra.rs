use inquiry_form::config::{AppConfig, MailConfig};
use inquiry_form::error::AppError;
use inquiry_form::intake::{
    ConfirmationMessage, ConfirmationSender, IntakeService, LogMailer, MailError,
    SpoolMailer, SqliteSubmissionRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mail transport picked from configuration at start-up.
#[derive(Debug)]
pub(crate) enum ConfiguredMailer {
    Log(LogMailer),
    Spool(SpoolMailer),
}

impl ConfiguredMailer {
    pub(crate) fn from_config(config: &MailConfig) -> Self {
        match &config.spool_dir {
            Some(dir) => Self::Spool(SpoolMailer::new(dir.clone())),
            None => Self::Log(LogMailer),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Log(_) => "log".to_string(),
            Self::Spool(mailer) => format!("spool:{}", mailer.dir().display()),
        }
    }
}

impl ConfirmationSender for ConfiguredMailer {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), MailError> {
        match self {
            Self::Log(mailer) => mailer.send(message),
            Self::Spool(mailer) => mailer.send(message),
        }
    }
}

pub(crate) type InquiryService = IntakeService<SqliteSubmissionRepository, ConfiguredMailer>;

/// Open the store and wire the mailer. The schema is not touched here.
pub(crate) fn build_service(config: &AppConfig) -> Result<InquiryService, AppError> {
    let repository = Arc::new(SqliteSubmissionRepository::from_config(&config.storage)?);
    let mailer = Arc::new(ConfiguredMailer::from_config(&config.mail));
    info!(mailer = %mailer.describe(), "confirmation mailer configured");
    Ok(IntakeService::new(
        repository,
        mailer,
        config.mail.from_address.clone(),
    ))
}
