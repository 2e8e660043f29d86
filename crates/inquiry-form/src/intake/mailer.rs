use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::info;

use super::repository::{ConfirmationMessage, ConfirmationSender, MailError};

/// Records confirmation messages in the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl ConfirmationSender for LogMailer {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            from = %message.from,
            subject = %message.subject,
            "confirmation message queued (log only)"
        );
        Ok(())
    }
}

/// Writes each message as an `.eml` file for a local MTA or pickup agent.
#[derive(Debug)]
pub struct SpoolMailer {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl SpoolMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn render(message: &ConfirmationMessage) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            message.from,
            message.to,
            message.subject,
            Utc::now().to_rfc2822(),
            message.body,
        )
    }
}

impl ConfirmationSender for SpoolMailer {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), MailError> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| MailError::Transport(format!("{}: {err}", self.dir.display())))?;

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let file_name = format!(
            "{}-{sequence:06}.eml",
            Utc::now().format("%Y%m%dT%H%M%S%.6f")
        );
        let path = self.dir.join(file_name);
        fs::write(&path, Self::render(message))
            .map_err(|err| MailError::Transport(format!("{}: {err}", path.display())))?;

        info!(to = %message.to, path = %path.display(), "confirmation message spooled");
        Ok(())
    }
}
