use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage-assigned identifier of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub i64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Campuses offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Campus {
    Baltimore,
    Towson,
    Rockville,
}

impl Campus {
    pub const ALL: [Campus; 3] = [Campus::Baltimore, Campus::Towson, Campus::Rockville];

    /// Value posted by the form and persisted in storage.
    pub const fn value(self) -> &'static str {
        match self {
            Campus::Baltimore => "baltimore",
            Campus::Towson => "towson",
            Campus::Rockville => "rockville",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Campus::Baltimore => "Baltimore",
            Campus::Towson => "Towson",
            Campus::Rockville => "Rockville",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown campus '{0}'")]
pub struct UnknownCampus(pub String);

impl FromStr for Campus {
    type Err = UnknownCampus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Campus::ALL
            .into_iter()
            .find(|campus| campus.value() == value)
            .ok_or_else(|| UnknownCampus(value.to_string()))
    }
}

/// Review lifecycle. Only `Pending -> Complete` is ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Complete,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Complete => "complete",
        }
    }

    pub const fn is_pending(self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown submission status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for SubmissionStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pending" => Ok(SubmissionStatus::Pending),
            "complete" => Ok(SubmissionStatus::Complete),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Fields exactly as posted. Everything is optional so the handler can apply
/// its dispatch guard before any validation happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub action: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub campus: Option<String>,
    pub workshop: Option<String>,
}

/// Builds a form from posted pairs. A repeated field keeps its last value and
/// unknown fields are ignored.
impl FromIterator<(String, String)> for SubmissionForm {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut form = SubmissionForm::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "action" => &mut form.action,
                "firstName" => &mut form.first_name,
                "lastName" => &mut form.last_name,
                "email" => &mut form.email,
                "phone" => &mut form.phone,
                "campus" => &mut form.campus,
                "workshop" => &mut form.workshop,
                _ => continue,
            };
            *slot = Some(value);
        }
        form
    }
}

/// Sanitized and validated values ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub campus: Campus,
    pub workshop: String,
}

/// A stored inquiry.
///
/// `campus` is kept as the stored text so the review listing shows exactly
/// what was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub campus: String,
    pub workshop: String,
    pub created_at: NaiveDateTime,
    pub status: SubmissionStatus,
}
