//! Client side of the apply flow: form state, local checks, and the post to the relay.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::multipart::{Form, Part};

use super::postings::PositionTarget;
use super::router::{ApplyResponse, APPLY_PATH};

const REJECTED_FALLBACK: &str = "Failed to submit application";

/// Resume picked by the applicant.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl ResumeFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        Ok(Self { filename, content })
    }

    fn content_type(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

impl std::fmt::Debug for ResumeFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeFile")
            .field("filename", &self.filename)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// Values entered into the apply form for one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFormState {
    pub target: PositionTarget,
    pub email: String,
    pub phone: String,
    pub resume: Option<ResumeFile>,
}

impl ApplicationFormState {
    pub fn new(target: PositionTarget) -> Self {
        Self {
            target,
            email: String::new(),
            phone: String::new(),
            resume: None,
        }
    }

    /// Clear the applicant's entries, keeping the position.
    pub fn reset(&mut self) {
        self.email.clear();
        self.phone.clear();
        self.resume = None;
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.is_empty() || self.phone.is_empty() {
            return Err(FormError::Validation);
        }
        Ok(())
    }

    fn to_multipart(&self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new()
            .text("email", self.email.clone())
            .text("phone", self.phone.clone())
            .text("position", self.target.form_label().to_string())
            .text("positionId", self.target.form_id().to_string());

        if let Some(resume) = &self.resume {
            let part = Part::bytes(resume.content.clone())
                .file_name(resume.filename.clone())
                .mime_str(&resume.content_type())?;
            form = form.part("resume", part);
        }

        Ok(form)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Nothing was sent.
    #[error("Please fill in your email and phone number.")]
    Validation,
    #[error("An application is already being submitted.")]
    Busy,
    /// The relay answered with an error; carries its message.
    #[error("{0}")]
    Rejected(String),
    #[error("There was an error submitting your application. Please try again.")]
    Transport(#[source] reqwest::Error),
}

/// Accepted submission, as reported by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: String,
    pub message_id: String,
}

/// Posts applications to the relay, one request at a time.
#[derive(Debug)]
pub struct ApplicationClient {
    http: reqwest::Client,
    endpoint: String,
    in_flight: AtomicBool,
}

impl ApplicationClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{APPLY_PATH}", base_url.trim_end_matches('/')),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the form. On success the entries are cleared; on failure they are kept
    /// so the applicant can correct them and try again.
    pub async fn submit(
        &self,
        state: &mut ApplicationFormState,
    ) -> Result<SubmitReceipt, FormError> {
        state.validate()?;
        let _guard = InFlight::acquire(&self.in_flight).ok_or(FormError::Busy)?;

        let form = state.to_multipart().map_err(FormError::Transport)?;
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(FormError::Transport)?;

        let accepted = response.status().is_success();
        let body: ApplyResponse = response.json().await.map_err(FormError::Transport)?;

        if !accepted || !body.success {
            let message = body
                .error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| REJECTED_FALLBACK.to_string());
            return Err(FormError::Rejected(message));
        }

        state.reset();
        Ok(SubmitReceipt {
            message: body.message.unwrap_or_default(),
            message_id: body.message_id.unwrap_or_default(),
        })
    }
}

/// Marks a request as outstanding until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ApplicationFormState {
        let mut state = ApplicationFormState::new(PositionTarget::Listed {
            id: "event-manager".to_string(),
            title: "Event Manager".to_string(),
        });
        state.email = "a@b.com".to_string();
        state.phone = "+1234567890".to_string();
        state
    }

    #[test]
    fn validation_requires_email_and_phone() {
        assert!(state().validate().is_ok());

        let mut missing_phone = state();
        missing_phone.phone.clear();
        assert!(matches!(missing_phone.validate(), Err(FormError::Validation)));

        let mut missing_email = state();
        missing_email.email.clear();
        assert!(matches!(missing_email.validate(), Err(FormError::Validation)));
    }

    #[test]
    fn reset_keeps_target() {
        let mut filled = state();
        filled.resume = Some(ResumeFile::new("cv.docx", vec![1]));
        filled.reset();
        assert!(filled.email.is_empty());
        assert!(filled.phone.is_empty());
        assert!(filled.resume.is_none());
        assert_eq!(filled.target.form_id(), "event-manager");
    }

    #[test]
    fn in_flight_guard_allows_one_request_at_a_time() {
        let flag = AtomicBool::new(false);
        let first = InFlight::acquire(&flag).expect("first acquire");
        assert!(InFlight::acquire(&flag).is_none());
        drop(first);
        assert!(InFlight::acquire(&flag).is_some());
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = ApplicationClient::new("http://localhost:3000/");
        assert_eq!(client.endpoint(), "http://localhost:3000/api/careers/apply");
        assert!(!client.is_submitting());
    }

    #[tokio::test]
    async fn submit_without_phone_sends_nothing() {
        // Port 9 is discard; a request would fail with a transport error instead.
        let client = ApplicationClient::new("http://127.0.0.1:9");
        let mut incomplete = state();
        incomplete.phone.clear();
        let err = client
            .submit(&mut incomplete)
            .await
            .expect_err("validation fails");
        assert!(matches!(err, FormError::Validation));
        assert_eq!(incomplete.email, "a@b.com");
    }

    #[test]
    fn resume_content_type_follows_extension() {
        assert_eq!(ResumeFile::new("cv.pdf", vec![]).content_type(), "application/pdf");
        assert_eq!(
            ResumeFile::new("cv", vec![]).content_type(),
            "application/octet-stream"
        );
    }
}
