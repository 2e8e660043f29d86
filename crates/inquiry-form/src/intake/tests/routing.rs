use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::intake::domain::SubmissionStatus;
use crate::intake::repository::SubmissionRepository;
use crate::intake::store::SqliteSubmissionRepository;
use crate::intake::IntakeService;

fn post_form(body: &str) -> Request<Body> {
    Request::post("/admin-post")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::HOST, "example.edu")
        .header(header::REFERER, "https://example.edu/workshops?ref=flyer")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn submit_route_redirects_back_to_referer() {
    let (service, repository, mailer) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_form(jane_body()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.edu/workshops?ref=flyer&submitted=yes"
    );
    let stored = repository.newest_first().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, SubmissionStatus::Pending);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn submit_route_does_not_redirect_off_site() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/admin-post")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::HOST, "example.edu")
                .header(header::REFERER, "https://evil.example/phish")
                .body(Body::from(jane_body()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/inquiry?submitted=yes"
    );
    assert_eq!(repository.newest_first().unwrap().len(), 1);
}

#[tokio::test]
async fn submit_route_keeps_last_value_of_repeated_fields() {
    let (service, repository, mailer) = build_service();
    let router = router_with_service(service);

    let body = format!("{}&campus=rockville", jane_body());
    let response = router.oneshot(post_form(&body)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stored = repository.newest_first().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].campus, "rockville");
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn submit_route_ignores_get_requests() {
    let (service, repository, mailer) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get(format!("/admin-post?{}", jane_body()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(read_text_body(response).await.is_empty());
    assert!(repository.newest_first().unwrap().is_empty());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn submit_route_ignores_posts_without_email() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_form(
            "action=handle_inquiry_form&firstName=Jane&lastName=Doe&campus=towson",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(read_text_body(response).await.is_empty());
    assert!(repository.newest_first().unwrap().is_empty());
}

#[tokio::test]
async fn submit_route_ignores_other_actions() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let body = jane_body().replace("handle_inquiry_form", "handle_newsletter");
    let response = router.oneshot(post_form(&body)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(repository.newest_first().unwrap().is_empty());
}

#[tokio::test]
async fn submit_route_rerenders_form_on_invalid_input() {
    let (service, repository, mailer) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_form(
            "action=handle_inquiry_form&firstName=Jane&lastName=Doe&email=nope&phone=555&campus=towson&workshop=%3Cb%3ERobotics%3C%2Fb%3E",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = read_text_body(response).await;
    assert!(html.contains("Please enter a valid email address."));
    assert!(html.contains(r#"value="Jane""#));
    assert!(html.contains(r#"<option value="towson" selected>"#));
    assert!(html.contains(">Robotics</textarea>"));
    assert!(repository.newest_first().unwrap().is_empty());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn submit_route_is_silent_when_table_missing() {
    let repository = Arc::new(SqliteSubmissionRepository::in_memory("wp_").expect("store"));
    let mailer = Arc::new(MemoryMailer::default());
    let router = router_with_service(IntakeService::new(
        repository.clone(),
        mailer.clone(),
        FROM_ADDRESS,
    ));

    let response = router
        .oneshot(post_form(jane_body()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(read_text_body(response).await.is_empty());
    assert!(mailer.sent().is_empty());

    let invalid = router_with_service(IntakeService::new(
        repository.clone(),
        Arc::new(MemoryMailer::default()),
        FROM_ADDRESS,
    ))
    .oneshot(post_form("action=handle_inquiry_form&email=bad"))
    .await
    .expect("route executes");
    assert_eq!(invalid.status(), StatusCode::OK);
    assert!(read_text_body(invalid).await.is_empty());
}

#[tokio::test]
async fn submit_route_reports_storage_failure() {
    let router = router_with_service(IntakeService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryMailer::default()),
        FROM_ADDRESS,
    ));

    let response = router
        .oneshot(post_form(jane_body()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn form_page_switches_to_thank_you_after_redirect() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let blank = router
        .clone()
        .oneshot(Request::get("/inquiry").body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(blank.status(), StatusCode::OK);
    let html = read_text_body(blank).await;
    assert!(html.contains("<form"));
    assert!(html.contains(r#"href="/assets/inquiry-form.css""#));

    let thanks = router
        .oneshot(
            Request::get("/inquiry?submitted=yes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let html = read_text_body(thanks).await;
    assert!(html.contains("Thank you for your submission!"));
    assert!(!html.contains("<form"));
}

#[tokio::test]
async fn admin_route_marks_pending_rows_complete() {
    let (service, repository, _) = build_service();
    let service = Arc::new(service);
    for name in ["Ann", "Bob", "Cy"] {
        service.submit(&form_for(name, "towson"), None).unwrap();
    }
    let router = crate::intake::intake_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::get("/admin/inquiry-form?status=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let html = read_text_body(response).await;
    assert!(!html.contains("?status=2\""));
    assert!(html.contains(r#"<a href="/admin/inquiry-form?status=1">Mark Complete</a>"#));
    assert!(html.contains(r#"<a href="/admin/inquiry-form?status=3">Mark Complete</a>"#));

    let complete: Vec<i64> = repository
        .newest_first()
        .unwrap()
        .into_iter()
        .filter(|s| s.status == SubmissionStatus::Complete)
        .map(|s| s.id.0)
        .collect();
    assert_eq!(complete, vec![2]);

    let unchanged = router
        .oneshot(
            Request::get("/admin/inquiry-form?status=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(unchanged.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_route_reports_empty_store() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/admin/inquiry-form")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    let html = read_text_body(response).await;
    assert!(html.contains("No submissions found."));
    assert!(!html.contains("<table"));
}

#[tokio::test]
async fn stylesheet_is_served_as_css() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/assets/inquiry-form.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css; charset=utf-8"
    );
    assert!(read_text_body(response).await.contains(".grid-form"));
}
