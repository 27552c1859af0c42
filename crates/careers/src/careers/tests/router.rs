use std::sync::Arc;

use axum::http::StatusCode;
use tower::ServiceExt;

use super::common::*;
use crate::careers::postings::StaticListings;
use crate::careers::router::careers_router;

const FIELDS: [(&str, &str); 4] = [
    ("email", "a@b.com"),
    ("phone", "+1234567890"),
    ("position", "Event Manager"),
    ("positionId", "event-manager"),
];

#[tokio::test]
async fn apply_route_returns_message_id() {
    let (relay, mailer) = recording_relay();
    let router = router_with(relay);

    let response = router
        .oneshot(apply_request(multipart_body(&FIELDS, None)))
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Application submitted successfully");
    assert_eq!(body["messageId"], "<recorded-1@example.com>");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].email.subject.contains("Event Manager"));
}

#[tokio::test]
async fn apply_route_forwards_uploaded_resume() {
    let (relay, mailer) = recording_relay();
    let router = router_with(relay);

    let response = router
        .oneshot(apply_request(multipart_body(&FIELDS, Some(&resume()))))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let attachment = mailer.sent()[0]
        .email
        .attachment
        .clone()
        .expect("attachment present");
    assert_eq!(attachment.filename, "resume.pdf");
    assert_eq!(attachment.content, resume().content);
}

#[tokio::test]
async fn apply_route_rejects_missing_phone() {
    let (relay, mailer) = recording_relay();
    let router = router_with(relay);
    let fields = [
        ("email", "a@b.com"),
        ("position", "Event Manager"),
    ];

    let response = router
        .oneshot(apply_request(multipart_body(&fields, None)))
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Missing required fields: email, phone, and position are required"
    );
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn apply_route_reports_missing_configuration() {
    let router = router_with(unconfigured_relay());

    let response = router
        .oneshot(apply_request(multipart_body(&FIELDS, None)))
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Email service not configured. Please contact support."
    );
}

#[tokio::test]
async fn apply_route_rejects_non_multipart_body() {
    let (relay, _) = recording_relay();
    let router = router_with(relay);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/careers/apply")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(r#"{"email":"a@b.com"}"#))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn apply_route_enforces_upload_limit() {
    let (relay, mailer) = recording_relay();
    let router = careers_router(relay, Arc::new(StaticListings::standard()), 64);

    let response = router
        .oneshot(apply_request(multipart_body(&FIELDS, Some(&resume()))))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn positions_route_lists_postings() {
    let (relay, _) = recording_relay();
    let router = router_with(relay);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/careers/positions")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    let postings = body.as_array().expect("array");
    assert_eq!(postings.len(), 7);
    assert_eq!(postings[0]["id"], "event-manager");
    assert_eq!(postings[0]["type"], "Full-time");
}

#[tokio::test]
async fn position_route_resolves_general_application_and_unknown_ids() {
    let (relay, _) = recording_relay();
    let router = router_with(relay);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/careers/positions/new-role")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "New Role Application");

    let response = router
        .oneshot(
            axum::http::Request::get("/api/careers/positions/astronaut")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn repeated_fields_keep_their_first_value() {
    let (relay, mailer) = recording_relay();
    let router = router_with(relay);
    let fields = [
        ("email", "a@b.com"),
        ("email", "other@b.com"),
        ("phone", "+1234567890"),
        ("position", "Event Manager"),
        ("position", "Marketing Lead"),
        ("positionId", "event-manager"),
    ];

    let response = router
        .oneshot(apply_request(multipart_body(&fields, None)))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let mail = &mailer.sent()[0];
    assert_eq!(mail.email.subject, "New Job Application: Event Manager");
    assert!(mail.email.text_body.contains("Email: a@b.com"));
    assert!(!mail.email.text_body.contains("other@b.com"));
}
