//! HTML for the public form, the thank-you notice, and the review listing.
//!
//! Templates are compiled into the binary and every interpolated value is
//! HTML-escaped, so stored text is never trusted as markup.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use minijinja::{context, Environment, Value};
use serde::Serialize;
use thiserror::Error;

use super::domain::{Campus, Submission};
use super::router::{ACTION_NAME, ACTION_PATH, ADMIN_PATH, STYLESHEET_PATH};
use super::sanitize::Rejection;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<link rel="stylesheet" href="{{ stylesheet }}">
</head>
<body>
{{ body }}
</body>
</html>
"#;

const THANK_YOU_TEMPLATE: &str = "<div>Thank you for your submission!</div>";

const FORM_TEMPLATE: &str = r#"<form action="{{ action_url }}" method="post" class="grid-form">
    <input type="hidden" name="action" value="{{ action_name }}">
    {%- if errors %}
    <div class="form-errors" role="alert">Please correct the highlighted fields.</div>
    {%- endif %}
    <label for="firstName">First Name:</label>
    <input type="text" id="firstName" name="firstName" maxlength="30" value="{{ values.firstName }}" required>
    {%- if errors.firstName %}<span class="field-error">{{ errors.firstName }}</span>{% endif %}
    <label for="lastName">Last Name:</label>
    <input type="text" id="lastName" name="lastName" maxlength="30" value="{{ values.lastName }}" required>
    {%- if errors.lastName %}<span class="field-error">{{ errors.lastName }}</span>{% endif %}
    <label for="email">Email:</label>
    <input type="email" id="email" name="email" maxlength="255" value="{{ values.email }}" required>
    {%- if errors.email %}<span class="field-error">{{ errors.email }}</span>{% endif %}
    <label for="phone">Phone:</label>
    <input type="text" id="phone" name="phone" maxlength="25" value="{{ values.phone }}" required>
    {%- if errors.phone %}<span class="field-error">{{ errors.phone }}</span>{% endif %}
    <label for="campus">Which campus are you interested in? :</label>
    <select id="campus" name="campus" required>
        <option value="">Please select...</option>
        {%- for campus in campuses %}
        <option value="{{ campus.value }}"{% if campus.value == values.campus %} selected{% endif %}>{{ campus.label }}</option>
        {%- endfor %}
    </select>
    {%- if errors.campus %}<span class="field-error">{{ errors.campus }}</span>{% endif %}
    <label for="workshop">Which workshop would you like to learn more about?:</label>
    <textarea id="workshop" name="workshop" rows="4" cols="100" placeholder="Type here..." required>{{ values.workshop }}</textarea>
    {%- if errors.workshop %}<span class="field-error">{{ errors.workshop }}</span>{% endif %}
    <input type="submit" value="Submit">
</form>"#;

const REVIEW_TEMPLATE: &str = r#"<div class="wrap"><h1>Inquiry Form Submissions</h1>
{%- if rows %}
<table class="widefat fixed">
<tr><th>ID</th><th>First Name</th><th>Last Name</th><th>Email</th><th>Phone</th><th>Campus</th><th>Workshop</th><th>Created At</th><th>Status</th><th>Action</th></tr>
{%- for row in rows %}
<tr><td>{{ row.id }}</td><td>{{ row.first_name }}</td><td>{{ row.last_name }}</td><td>{{ row.email }}</td><td>{{ row.phone }}</td><td>{{ row.campus }}</td><td>{{ row.workshop }}</td><td>{{ row.created_at }}</td><td>{{ row.status }}</td><td>
{%- if row.pending %}<a href="{{ admin_path }}?status={{ row.id }}">Mark Complete</a>{% else %}Complete{% endif -%}
</td></tr>
{%- endfor %}
</table>
{%- else %}
<p>No submissions found.</p>
{%- endif %}
</div>"#;

/// Grid layout for the public form.
pub const STYLESHEET: &str = ".grid-form {
    display: grid;
    grid-template-columns: minmax(8rem, max-content) 1fr;
    gap: 0.75rem 1rem;
    max-width: 48rem;
}

.grid-form label {
    align-self: center;
    font-weight: 600;
}

.grid-form textarea,
.grid-form input[type=\"submit\"],
.grid-form .form-errors {
    grid-column: 1 / -1;
}

.grid-form .field-error {
    grid-column: 2;
    color: #b32d2e;
}
";

const TEMPLATES: [(&str, &str); 4] = [
    ("page.html", PAGE_TEMPLATE),
    ("thank_you.html", THANK_YOU_TEMPLATE),
    ("form.html", FORM_TEMPLATE),
    ("review.html", REVIEW_TEMPLATE),
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render template '{name}': {source}")]
    Template {
        name: &'static str,
        #[source]
        source: minijinja::Error,
    },
}

fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            if let Err(err) = env.add_template(name, source) {
                tracing::error!(
                    "built-in template {name} failed to compile and will be reported as missing: {err}"
                );
            }
        }
        env
    })
}

fn render(name: &'static str, ctx: Value) -> Result<String, RenderError> {
    let wrap = |source: minijinja::Error| RenderError::Template { name, source };
    environment()
        .get_template(name)
        .map_err(wrap)?
        .render(ctx)
        .map_err(wrap)
}

#[derive(Serialize)]
struct CampusOption {
    value: &'static str,
    label: &'static str,
}

fn campus_options() -> Vec<CampusOption> {
    Campus::ALL
        .into_iter()
        .map(|campus| CampusOption {
            value: campus.value(),
            label: campus.label(),
        })
        .collect()
}

fn form(
    values: &BTreeMap<&'static str, String>,
    errors: &BTreeMap<&'static str, String>,
) -> Result<String, RenderError> {
    render(
        "form.html",
        context! {
            action_url => ACTION_PATH,
            action_name => ACTION_NAME,
            campuses => campus_options(),
            values => values,
            errors => errors,
        },
    )
}

/// The embeddable form fragment, or the thank-you notice when `submitted` is `yes`.
pub fn form_fragment(submitted: Option<&str>) -> Result<String, RenderError> {
    if submitted == Some("yes") {
        return render("thank_you.html", context! {});
    }
    form(&BTreeMap::new(), &BTreeMap::new())
}

/// The form again, pre-filled with the cleaned values and one message per bad field.
pub fn rejected_form(rejection: &Rejection) -> Result<String, RenderError> {
    form(&rejection.values, &rejection.errors)
}

#[derive(Serialize)]
struct ReviewRow<'a> {
    id: i64,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    phone: &'a str,
    campus: &'a str,
    workshop: &'a str,
    created_at: String,
    status: &'static str,
    pending: bool,
}

impl<'a> From<&'a Submission> for ReviewRow<'a> {
    fn from(submission: &'a Submission) -> Self {
        Self {
            id: submission.id.0,
            first_name: &submission.first_name,
            last_name: &submission.last_name,
            email: &submission.email,
            phone: &submission.phone,
            campus: &submission.campus,
            workshop: &submission.workshop,
            created_at: submission.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            status: submission.status.label(),
            pending: submission.status.is_pending(),
        }
    }
}

/// The administrator listing, in the order given.
pub fn review_table(submissions: &[Submission]) -> Result<String, RenderError> {
    let rows: Vec<ReviewRow<'_>> = submissions.iter().map(ReviewRow::from).collect();
    render(
        "review.html",
        context! {
            rows => rows,
            admin_path => ADMIN_PATH,
        },
    )
}

/// Wrap a rendered fragment in a minimal standalone document.
pub fn page(title: &str, body: String) -> Result<String, RenderError> {
    render(
        "page.html",
        context! {
            title => title,
            stylesheet => STYLESHEET_PATH,
            body => Value::from_safe_string(body),
        },
    )
}
