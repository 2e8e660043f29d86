use crate::infra::build_service;
use inquiry_form::config::AppConfig;
use inquiry_form::error::AppError;
use inquiry_form::intake::Submission;
use inquiry_form::telemetry;

/// Schema Initializer entry point for deployments.
pub(crate) fn run_install() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let service = build_service(&config)?;
    service.install()?;

    println!(
        "Submissions table ready in {}",
        config.storage.database_path.display()
    );
    Ok(())
}

pub(crate) fn run_list() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;
    let submissions = service.submissions()?;

    if submissions.is_empty() {
        println!("No submissions found.");
        return Ok(());
    }

    println!("Inquiry form submissions (newest first)");
    for submission in &submissions {
        println!("{}", format_line(submission));
    }
    let pending = submissions
        .iter()
        .filter(|submission| submission.status.is_pending())
        .count();
    println!("{} total, {} pending", submissions.len(), pending);
    Ok(())
}

fn format_line(submission: &Submission) -> String {
    format!(
        "  #{:<5} {}  {:<8} {} {} <{}> {} | {} | {}",
        submission.id,
        submission.created_at.format("%Y-%m-%d %H:%M:%S"),
        submission.status.label(),
        submission.first_name,
        submission.last_name,
        submission.email,
        submission.phone,
        submission.campus,
        submission.workshop,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use inquiry_form::intake::{SubmissionId, SubmissionStatus};

    #[test]
    fn format_line_includes_every_column() {
        let submission = Submission {
            id: SubmissionId(7),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "555-1000".to_string(),
            campus: "towson".to_string(),
            workshop: "Robotics".to_string(),
            created_at: NaiveDate::from_ymd_opt(2025, 3, 4)
                .and_then(|date| date.and_hms_opt(9, 30, 0))
                .expect("valid timestamp"),
            status: SubmissionStatus::Pending,
        };

        let line = format_line(&submission);
        assert!(line.starts_with("  #7 "));
        assert!(line.contains("2025-03-04 09:30:00"));
        assert!(line.contains("Jane Doe <jane@x.com> 555-1000 | towson | Robotics"));
        assert!(line.contains("pending"));
    }
}
