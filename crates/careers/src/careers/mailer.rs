//! Mailer trait and the lettre-backed SMTP implementation.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::message::ApplicationEmail;
use crate::config::SmtpSettings;

/// Port on which SMTP servers expect TLS from the first byte.
pub const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("{0}")]
    Transport(String),
}

/// Envelope plus content of one outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub email: ApplicationEmail,
}

/// What the transport reports back after accepting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub message_id: String,
}

#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, mail: &OutgoingMail) -> Result<DispatchReceipt, MailError>;
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSecurity {
    /// TLS wraps the connection from the start.
    ImplicitTls,
    /// Plaintext connect, upgraded with STARTTLS when the server offers it.
    Opportunistic,
}

impl TransportSecurity {
    pub fn for_port(port: u16) -> Self {
        if port == IMPLICIT_TLS_PORT {
            TransportSecurity::ImplicitTls
        } else {
            TransportSecurity::Opportunistic
        }
    }
}

/// SMTP mailer over lettre's tokio transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    security: TransportSecurity,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    pub fn connect(settings: &SmtpSettings) -> Result<Self, MailError> {
        let security = TransportSecurity::for_port(settings.port);
        let parameters = TlsParameters::new(settings.host.clone())
            .map_err(|err| MailError::Transport(err.to_string()))?;
        let tls = match security {
            TransportSecurity::ImplicitTls => Tls::Wrapper(parameters),
            TransportSecurity::Opportunistic => Tls::Opportunistic(parameters),
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .tls(tls)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            security,
        })
    }

    pub fn security(&self) -> TransportSecurity {
        self.security
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<DispatchReceipt, MailError> {
        let (message, message_id) = build_message(mail)?;

        self.transport
            .send(message)
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        Ok(DispatchReceipt { message_id })
    }
}

/// Assemble the MIME message and the Message-ID it carries.
pub fn build_message(mail: &OutgoingMail) -> Result<(Message, String), MailError> {
    let from: Mailbox = mail
        .from
        .parse()
        .map_err(|_| MailError::InvalidAddress(mail.from.clone()))?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|_| MailError::InvalidAddress(mail.to.clone()))?;

    let message_id = format!("<{}@{}>", uuid::Uuid::new_v4(), from.email.domain());
    let email = &mail.email;

    let alternative =
        MultiPart::alternative_plain_html(email.text_body.clone(), email.html_body.clone());

    let builder = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .message_id(Some(message_id.clone()));

    let message = match &email.attachment {
        Some(resume) => {
            let content_type = attachment_content_type(&resume.filename)?;
            let part = Attachment::new(resume.filename.clone())
                .body(resume.content.clone(), content_type);
            builder.multipart(MultiPart::mixed().multipart(alternative).singlepart(part))
        }
        None => builder.multipart(alternative),
    }
    .map_err(|err| MailError::Build(err.to_string()))?;

    Ok((message, message_id))
}

fn attachment_content_type(filename: &str) -> Result<ContentType, MailError> {
    let guessed = mime_guess::from_path(filename).first_or_octet_stream();
    ContentType::parse(guessed.essence_str()).map_err(|err| MailError::Build(err.to_string()))
}
