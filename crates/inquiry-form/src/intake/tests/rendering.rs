use super::common::*;
use crate::intake::render::{form_fragment, rejected_form, review_table};
use crate::intake::repository::SubmissionRepository;
use crate::intake::sanitize::clean_submission;
use crate::intake::SubmitOutcome;

const FIELDS: [&str; 6] = [
    r#"name="firstName""#,
    r#"name="lastName""#,
    r#"name="email""#,
    r#"name="phone""#,
    r#"name="campus""#,
    r#"name="workshop""#,
];

#[test]
fn blank_form_has_every_field_and_the_hidden_action() {
    let html = form_fragment(None).expect("form renders");

    for field in FIELDS {
        assert!(html.contains(field), "missing {field}");
    }
    assert!(html.contains(r#"<form action="/admin-post" method="post" class="grid-form">"#));
    assert!(html.contains(r#"<input type="hidden" name="action" value="handle_inquiry_form">"#));
    assert!(html.contains(r#"<option value="">Please select...</option>"#));
    for campus in ["baltimore", "towson", "rockville"] {
        assert!(html.contains(&format!(r#"<option value="{campus}">"#)));
    }
    assert_eq!(html.matches(" required>").count(), 6);
    assert!(!html.contains("field-error"));
}

#[test]
fn submitted_flag_shows_only_the_thank_you() {
    let html = form_fragment(Some("yes")).expect("thank-you renders");
    assert_eq!(html, "<div>Thank you for your submission!</div>");
    for field in FIELDS {
        assert!(!html.contains(field));
    }
}

#[test]
fn other_flag_values_still_show_the_form() {
    let html = form_fragment(Some("no")).expect("form renders");
    assert!(html.contains("<form"));
}

#[test]
fn rejected_form_escapes_echoed_values() {
    let mut form = jane_form();
    form.email = Some(r#""><script>x</script>"#.to_string());
    let rejection = clean_submission(&form).expect_err("email rejected");

    let html = rejected_form(&rejection).expect("form renders");
    assert!(!html.contains("<script>"));
    assert!(html.contains(r#"<span class="field-error">Please enter a valid email address.</span>"#));
    assert!(html.contains("Please correct the highlighted fields."));
}

#[test]
fn review_table_shows_link_only_for_pending_rows() {
    let (service, _, _) = build_service();
    let SubmitOutcome::Accepted { submission, .. } = service.submit(&jane_form(), None).unwrap()
    else {
        panic!("expected accepted submission");
    };
    service.submit(&form_for("Bob", "rockville"), None).unwrap();
    service.mark_complete(submission.id).unwrap();

    let listing = service.submissions().unwrap();
    let html = review_table(&listing).expect("table renders");

    assert!(html.contains("<h1>Inquiry Form Submissions</h1>"));
    assert!(html.contains("<th>Created At</th>"));
    assert!(html.contains(r#"<a href="/admin/inquiry-form?status=2">Mark Complete</a>"#));
    assert!(!html.contains("?status=1\""));
    assert!(html.contains("<td>complete</td><td>Complete</td>"));
    assert!(html.contains(&submission.created_at.format("%Y-%m-%d %H:%M:%S").to_string()));

    let bob = html.find("<td>Bob</td>").expect("bob listed");
    let jane = html.find("<td>Jane</td>").expect("jane listed");
    assert!(bob < jane, "newest row first");
}

#[test]
fn review_table_escapes_stored_text() {
    let (service, repository, _) = build_service();
    service.submit(&jane_form(), None).unwrap();
    let mut listing = repository.newest_first().unwrap();
    listing[0].workshop = "<img src=x onerror=alert(1)>".to_string();

    let html = review_table(&listing).expect("table renders");
    assert!(html.contains("&lt;img"));
    assert!(!html.contains("<img"));
}

#[test]
fn empty_listing_renders_message() {
    let html = review_table(&[]).expect("empty listing renders");
    assert!(html.contains("<p>No submissions found.</p>"));
    assert!(!html.contains("<table"));
}
