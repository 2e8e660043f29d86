//! Cleans posted text and decides whether a submission is acceptable.
//!
//! Text fields are reduced to a single line of plain text; the email address is
//! normalized and must still be a syntactically valid address afterwards.

use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use validator::Validate;

use super::domain::{Campus, NewSubmission, SubmissionForm};

lazy_static! {
    static ref SCRIPT_OR_STYLE: Regex =
        Regex::new(r"(?is)<script[^>]*?>.*?</script>|<style[^>]*?>.*?</style>").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref OCTET: Regex = Regex::new(r"%[a-fA-F0-9]{2}").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref LOCAL_PART_DISALLOWED: Regex =
        Regex::new(r"[^a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]").unwrap();
    static ref LABEL_DISALLOWED: Regex = Regex::new(r"[^a-z0-9-]+").unwrap();
}

/// Reduce arbitrary input to a trimmed single line without markup.
pub fn sanitize_text_field(raw: &str) -> String {
    let without_blocks = SCRIPT_OR_STYLE.replace_all(raw, "");
    let without_tags = TAG.replace_all(&without_blocks, "");
    let mut text = without_tags.into_owned();
    // Removing one octet can expose another ("%%4141").
    while OCTET.is_match(&text) {
        text = OCTET.replace_all(&text, "").into_owned();
    }
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Normalize an email address, returning `None` when nothing usable remains.
pub fn sanitize_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() < 6 {
        return None;
    }

    let (local, domain) = trimmed.split_once('@')?;
    let local = LOCAL_PART_DISALLOWED.replace_all(local, "");
    if local.is_empty() {
        return None;
    }

    if domain.contains("..") {
        return None;
    }
    let domain = domain.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '\0');
    let labels: Vec<String> = domain
        .to_ascii_lowercase()
        .split('.')
        .map(|label| {
            let label = label.trim_matches(|c: char| c.is_whitespace() || c == '-');
            LABEL_DISALLOWED
                .replace_all(label, "")
                .trim_matches('-')
                .to_string()
        })
        .filter(|label| !label.is_empty())
        .collect();
    if labels.len() < 2 {
        return None;
    }

    Some(format!("{local}@{}", labels.join(".")))
}

/// A submission that failed validation, carrying what is needed to re-render the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    /// Cleaned values keyed by form field name.
    pub values: BTreeMap<&'static str, String>,
    /// First problem per form field name.
    pub errors: BTreeMap<&'static str, String>,
}

impl Rejection {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

#[derive(Debug, Validate)]
struct SubmissionDraft {
    #[validate(length(min = 1, max = 30, message = "Please enter your first name (up to 30 characters)."))]
    first_name: String,
    #[validate(length(min = 1, max = 30, message = "Please enter your last name (up to 30 characters)."))]
    last_name: String,
    #[validate(
        email(message = "Please enter a valid email address."),
        length(max = 255, message = "Email addresses are limited to 255 characters.")
    )]
    email: String,
    #[validate(length(min = 1, max = 25, message = "Please enter a phone number (up to 25 characters)."))]
    phone: String,
    #[validate(length(min = 1, message = "Please tell us which workshop interests you."))]
    workshop: String,
}

fn form_name(field: &str) -> Option<&'static str> {
    match field {
        "first_name" => Some("firstName"),
        "last_name" => Some("lastName"),
        "email" => Some("email"),
        "phone" => Some("phone"),
        "workshop" => Some("workshop"),
        _ => None,
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(sanitize_text_field).unwrap_or_default()
}

/// Sanitize every posted field and validate the result.
pub fn clean_submission(form: &SubmissionForm) -> Result<NewSubmission, Rejection> {
    let first_name = text(&form.first_name);
    let last_name = text(&form.last_name);
    let phone = text(&form.phone);
    let campus = text(&form.campus);
    let workshop = text(&form.workshop);
    let raw_email = form.email.as_deref().unwrap_or_default();
    let email = sanitize_email(raw_email).unwrap_or_default();

    let draft = SubmissionDraft {
        first_name,
        last_name,
        email,
        phone,
        workshop,
    };

    let mut errors = BTreeMap::new();
    if let Err(report) = draft.validate() {
        for (field, failures) in report.field_errors() {
            let Some(name) = form_name(&field) else {
                continue;
            };
            let message = failures
                .iter()
                .find_map(|failure| failure.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "This field is invalid.".to_string());
            errors.insert(name, message);
        }
    }

    let parsed_campus = campus.parse::<Campus>();
    if parsed_campus.is_err() {
        errors.insert("campus", "Please choose one of the listed campuses.".to_string());
    }

    match parsed_campus {
        Ok(campus) if errors.is_empty() => Ok(NewSubmission {
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            campus,
            workshop: draft.workshop,
        }),
        _ => {
            let echoed_email = if draft.email.is_empty() {
                sanitize_text_field(raw_email)
            } else {
                draft.email
            };
            let values = BTreeMap::from([
                ("firstName", draft.first_name),
                ("lastName", draft.last_name),
                ("email", echoed_email),
                ("phone", draft.phone),
                ("campus", campus),
                ("workshop", draft.workshop),
            ]);
            Err(Rejection { values, errors })
        }
    }
}
