use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, error, info};

use super::clock::{Clock, SystemClock};
use super::mailer::{MailError, Mailer, OutgoingMail, SmtpMailer};
use super::message::ApplicationEmail;
use super::submission::{ApplicationForm, ApplicationSubmission, SubmissionError};
use crate::config::{MailConfig, MailConfigError, SmtpSettings};

const SUCCESS_MESSAGE: &str = "Application submitted successfully";
const DISPATCH_FALLBACK: &str = "Failed to submit application. Please try again later.";

/// Result of a relayed application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    pub message: String,
    pub message_id: String,
}

/// Why an application was not relayed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Config(#[from] MailConfigError),
    #[error("{0}")]
    Dispatch(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Submission(_) => StatusCode::BAD_REQUEST,
            RelayError::Config(_) | RelayError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the applicant.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::Dispatch(message) if message.trim().is_empty() => {
                DISPATCH_FALLBACK.to_string()
            }
            other => other.to_string(),
        }
    }
}

struct MailRoute<M> {
    sender: String,
    recipient: String,
    mailer: Arc<M>,
}

enum Delivery<M> {
    Ready(MailRoute<M>),
    Misconfigured(MailConfigError),
    Broken(MailError),
}

/// Turns validated form posts into notification emails.
///
/// Holds no per-request state; one instance serves every request.
pub struct ApplicationRelay<M> {
    delivery: Delivery<M>,
    clock: Arc<dyn Clock>,
}

impl<M> ApplicationRelay<M>
where
    M: Mailer,
{
    pub fn new(settings: &SmtpSettings, mailer: Arc<M>) -> Self {
        Self::with_delivery(Delivery::Ready(MailRoute {
            sender: settings.sender.clone(),
            recipient: settings.recipient.clone(),
            mailer,
        }))
    }

    /// A relay that rejects every valid submission with the given configuration error.
    pub fn unconfigured(error: MailConfigError) -> Self {
        Self::with_delivery(Delivery::Misconfigured(error))
    }

    fn with_delivery(delivery: Delivery<M>) -> Self {
        Self {
            delivery,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.delivery, Delivery::Ready(_))
    }

    pub async fn relay(&self, form: ApplicationForm) -> Result<RelayReceipt, RelayError> {
        let submission = ApplicationSubmission::from_form(form).inspect_err(|err| {
            debug!(%err, "application rejected by presence check");
        })?;

        let route = match &self.delivery {
            Delivery::Ready(route) => route,
            Delivery::Misconfigured(err) => {
                let presence = err.presence();
                error!(
                    %err,
                    smtp_host = presence.smtp_host,
                    smtp_port = presence.smtp_port,
                    smtp_user = presence.smtp_user,
                    smtp_pass = presence.smtp_pass,
                    smtp_password = presence.smtp_password,
                    smtp_from = presence.smtp_from,
                    smtp_to = presence.smtp_to,
                    admin_email = presence.admin_email,
                    "mail service misconfigured"
                );
                return Err(RelayError::Config(err.clone()));
            }
            Delivery::Broken(err) => {
                error!(%err, "mail transport unavailable");
                return Err(RelayError::Dispatch(err.to_string()));
            }
        };

        let email = ApplicationEmail::compose(&submission, self.clock.now());
        let outgoing = OutgoingMail {
            from: route.sender.clone(),
            to: route.recipient.clone(),
            email,
        };

        match route.mailer.send(&outgoing).await {
            Ok(receipt) => {
                info!(
                    message_id = %receipt.message_id,
                    position_id = %submission.position_id,
                    has_resume = outgoing.email.attachment.is_some(),
                    "application relayed"
                );
                Ok(RelayReceipt {
                    message: SUCCESS_MESSAGE.to_string(),
                    message_id: receipt.message_id,
                })
            }
            Err(err) => {
                error!(%err, position_id = %submission.position_id, "application dispatch failed");
                Err(RelayError::Dispatch(err.to_string()))
            }
        }
    }
}

impl ApplicationRelay<SmtpMailer> {
    /// Production relay backed by SMTP, or an unconfigured one when settings are incomplete.
    pub fn from_config(mail: &MailConfig) -> Self {
        match mail.settings() {
            Ok(settings) => match SmtpMailer::connect(settings) {
                Ok(mailer) => Self::new(settings, Arc::new(mailer)),
                Err(err) => Self::with_delivery(Delivery::Broken(err)),
            },
            Err(err) => Self::unconfigured(err.clone()),
        }
    }
}
