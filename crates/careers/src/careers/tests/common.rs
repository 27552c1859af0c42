use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::{Local, TimeZone};
use serde_json::Value;

use crate::careers::clock::FixedClock;
use crate::careers::mailer::{DispatchReceipt, MailError, Mailer, OutgoingMail};
use crate::careers::postings::StaticListings;
use crate::careers::relay::ApplicationRelay;
use crate::careers::router::careers_router;
use crate::careers::submission::{ApplicationForm, ResumeAttachment};
use crate::config::{MailConfig, SmtpSettings};

pub(super) const BOUNDARY: &str = "careers-test-boundary";

pub(super) fn smtp_settings() -> SmtpSettings {
    SmtpSettings {
        host: "smtp.example.com".to_string(),
        port: 587,
        user: "relay@example.com".to_string(),
        password: "secret".to_string(),
        sender: "careers@example.com".to_string(),
        recipient: "hr@example.com".to_string(),
    }
}

pub(super) fn form() -> ApplicationForm {
    ApplicationForm {
        email: Some("a@b.com".to_string()),
        phone: Some("+1234567890".to_string()),
        position: Some("Event Manager".to_string()),
        position_id: Some("event-manager".to_string()),
        resume: None,
    }
}

pub(super) fn resume() -> ResumeAttachment {
    ResumeAttachment::new("resume.pdf", b"%PDF-1.7\n\x00\x01binary".to_vec())
}

pub(super) fn fixed_clock() -> Arc<FixedClock> {
    let now = Local
        .with_ymd_and_hms(2026, 10, 17, 9, 30, 0)
        .earliest()
        .expect("valid local time");
    Arc::new(FixedClock::new(now))
}

/// Mailer that keeps every message instead of sending it.
#[derive(Default)]
pub(super) struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<DispatchReceipt, MailError> {
        let mut guard = self.sent.lock().expect("mailer mutex poisoned");
        guard.push(mail.clone());
        Ok(DispatchReceipt {
            message_id: format!("<recorded-{}@example.com>", guard.len()),
        })
    }
}

/// Mailer whose transport always fails with the given message.
pub(super) struct FailingMailer(pub(super) String);

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: &OutgoingMail) -> Result<DispatchReceipt, MailError> {
        Err(MailError::Transport(self.0.clone()))
    }
}

pub(super) fn recording_relay() -> (Arc<ApplicationRelay<RecordingMailer>>, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let relay = ApplicationRelay::new(&smtp_settings(), mailer.clone()).with_clock(fixed_clock());
    (Arc::new(relay), mailer)
}

pub(super) fn unconfigured_relay() -> Arc<ApplicationRelay<RecordingMailer>> {
    let error = MailConfig::resolve_with(|_| None)
        .into_result()
        .expect_err("empty lookup is unconfigured");
    Arc::new(ApplicationRelay::unconfigured(error))
}

pub(super) fn router_with(relay: Arc<ApplicationRelay<RecordingMailer>>) -> axum::Router {
    careers_router(relay, Arc::new(StaticListings::standard()), 1024 * 1024)
}

/// Encode text fields and an optional file as a multipart/form-data body.
pub(super) fn multipart_body(fields: &[(&str, &str)], file: Option<&ResumeAttachment>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(file) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"resume\"; filename=\"{}\"\r\n",
                file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(&file.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn apply_request(body: Vec<u8>) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/careers/apply")
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .expect("request builds")
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
