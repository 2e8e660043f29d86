use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::domain::{SubmissionForm, SubmissionId};
use super::redirect::is_local_redirect;
use super::render::{self, RenderError, STYLESHEET};
use super::repository::{ConfirmationSender, SubmissionRepository};
use super::service::{IntakeError, IntakeService, SubmitOutcome};

pub const FORM_PATH: &str = "/inquiry";
pub const FRAGMENT_PATH: &str = "/inquiry/form";
pub const ACTION_PATH: &str = "/admin-post";
/// Value of the hidden `action` field the handler answers to.
pub const ACTION_NAME: &str = "handle_inquiry_form";
pub const ADMIN_PATH: &str = "/admin/inquiry-form";
pub const STYLESHEET_PATH: &str = "/assets/inquiry-form.css";

const FORM_TITLE: &str = "Workshop Inquiry";
const ADMIN_TITLE: &str = "Inquiry Form Submissions";

/// Public form, submission endpoint, and the administrator listing.
pub fn intake_router<R, M>(service: Arc<IntakeService<R, M>>) -> Router
where
    R: SubmissionRepository + 'static,
    M: ConfirmationSender + 'static,
{
    public_router(service.clone()).merge(admin_router(service))
}

/// Routes meant to be reachable by anyone.
pub fn public_router<R, M>(service: Arc<IntakeService<R, M>>) -> Router
where
    R: SubmissionRepository + 'static,
    M: ConfirmationSender + 'static,
{
    Router::new()
        .route(FORM_PATH, get(form_page))
        .route(FRAGMENT_PATH, get(form_fragment))
        .route(STYLESHEET_PATH, get(stylesheet))
        .route(
            ACTION_PATH,
            get(ignored_request).post(submit_handler::<R, M>),
        )
        .with_state(service)
}

/// The review listing. Hosts mount this behind their own authorization layer.
pub fn admin_router<R, M>(service: Arc<IntakeService<R, M>>) -> Router
where
    R: SubmissionRepository + 'static,
    M: ConfirmationSender + 'static,
{
    Router::new()
        .route(ADMIN_PATH, get(review_handler::<R, M>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FormQuery {
    #[serde(default)]
    pub(crate) submitted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReviewQuery {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

impl ReviewQuery {
    /// Ids that do not parse are treated as absent.
    fn completion_target(&self) -> Option<SubmissionId> {
        let raw = self.status.as_deref()?.trim();
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Some(SubmissionId(id)),
            _ => {
                debug!(status = raw, "ignoring unusable status parameter");
                None
            }
        }
    }
}

fn render_failure(err: RenderError) -> Response {
    error!(error = %err, "page rendering failed");
    let payload = json!({ "error": "page could not be rendered" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

fn service_failure(err: IntakeError) -> Response {
    error!(error = %err, "intake request failed");
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

fn html_page(status: StatusCode, title: &str, fragment: Result<String, RenderError>) -> Response {
    match fragment.and_then(|body| render::page(title, body)) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => render_failure(err),
    }
}

/// The `Referer`, when it points back at this site.
fn local_referer(headers: &HeaderMap) -> Option<&str> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    if is_local_redirect(referer, host) {
        Some(referer)
    } else {
        debug!(referer = %referer, "ignoring off-site referer");
        None
    }
}

/// Requests the handler does not answer get an empty body and no redirect.
fn ignored() -> Response {
    StatusCode::OK.into_response()
}

pub(crate) async fn form_page(Query(query): Query<FormQuery>) -> Response {
    let fragment = render::form_fragment(query.submitted.as_deref());
    html_page(StatusCode::OK, FORM_TITLE, fragment)
}

pub(crate) async fn form_fragment(Query(query): Query<FormQuery>) -> Response {
    match render::form_fragment(query.submitted.as_deref()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure(err),
    }
}

pub(crate) async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

pub(crate) async fn ignored_request() -> Response {
    debug!("submission endpoint called without POST");
    ignored()
}

pub(crate) async fn submit_handler<R, M>(
    State(service): State<Arc<IntakeService<R, M>>>,
    headers: HeaderMap,
    pairs: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response
where
    R: SubmissionRepository + 'static,
    M: ConfirmationSender + 'static,
{
    let Ok(Form(pairs)) = pairs else {
        debug!("submission body is not a form; ignoring");
        return ignored();
    };
    let form: SubmissionForm = pairs.into_iter().collect();
    if form.email.is_none() {
        debug!("submission without email field; ignoring");
        return ignored();
    }
    if form.action.as_deref().is_some_and(|action| action != ACTION_NAME) {
        debug!(action = ?form.action, "submission for another action; ignoring");
        return ignored();
    }

    match service.submit(&form, local_referer(&headers)) {
        Ok(SubmitOutcome::Accepted { redirect_to, .. }) => {
            Redirect::to(&redirect_to).into_response()
        }
        Ok(SubmitOutcome::TableMissing) => ignored(),
        Err(IntakeError::Rejected(rejection)) => html_page(
            StatusCode::BAD_REQUEST,
            FORM_TITLE,
            render::rejected_form(&rejection),
        ),
        Err(other) => service_failure(other),
    }
}

pub(crate) async fn review_handler<R, M>(
    State(service): State<Arc<IntakeService<R, M>>>,
    Query(query): Query<ReviewQuery>,
) -> Response
where
    R: SubmissionRepository + 'static,
    M: ConfirmationSender + 'static,
{
    match service.review(query.completion_target()) {
        Ok(submissions) => html_page(
            StatusCode::OK,
            ADMIN_TITLE,
            render::review_table(&submissions),
        ),
        Err(err) => service_failure(err),
    }
}
