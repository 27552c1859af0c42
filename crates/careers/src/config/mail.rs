//! SMTP settings resolution.
//!
//! The relay needs a host, a user, and a password before it can dispatch
//! anything. Sender and recipient fall back through a fixed chain of keys and
//! finally to [`DEFAULT_MAILBOX`]. Resolution happens once at startup; the
//! outcome (including a failure) is kept so the relay can report it per request.

use std::env;

/// Mailbox used when neither a sender nor a recipient is configured.
pub const DEFAULT_MAILBOX: &str = "info@thejaayveeworld.com";

const DEFAULT_SMTP_PORT: u16 = 587;

/// Fully resolved SMTP settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub sender: String,
    pub recipient: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Which mail keys were present when the settings were resolved. Never carries values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyPresence {
    pub smtp_host: bool,
    pub smtp_port: bool,
    pub smtp_user: bool,
    pub smtp_pass: bool,
    pub smtp_password: bool,
    pub smtp_from: bool,
    pub smtp_to: bool,
    pub admin_email: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailConfigError {
    #[error("Email service not configured. Please contact support.")]
    NotConfigured { presence: KeyPresence },
    #[error("Email service not configured. Please contact support.")]
    InvalidPort { value: String, presence: KeyPresence },
    #[error(
        "Recipient email not configured. Please set SMTP_TO or ADMIN_EMAIL environment variable."
    )]
    InvalidRecipient {
        recipient: String,
        presence: KeyPresence,
    },
}

impl MailConfigError {
    pub fn presence(&self) -> KeyPresence {
        match self {
            MailConfigError::NotConfigured { presence }
            | MailConfigError::InvalidPort { presence, .. }
            | MailConfigError::InvalidRecipient { presence, .. } => *presence,
        }
    }
}

/// Outcome of resolving the SMTP keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    outcome: Result<SmtpSettings, MailConfigError>,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self::resolve_with(|key| env::var(key).ok())
    }

    pub fn resolve_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values behave like missing ones in every chain below.
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let host = get("SMTP_HOST");
        let port = get("SMTP_PORT");
        let user = get("SMTP_USER");
        let pass = get("SMTP_PASS");
        let password = get("SMTP_PASSWORD");
        let from = get("SMTP_FROM");
        let to = get("SMTP_TO");
        let admin = get("ADMIN_EMAIL");

        let presence = KeyPresence {
            smtp_host: host.is_some(),
            smtp_port: port.is_some(),
            smtp_user: user.is_some(),
            smtp_pass: pass.is_some(),
            smtp_password: password.is_some(),
            smtp_from: from.is_some(),
            smtp_to: to.is_some(),
            admin_email: admin.is_some(),
        };

        let outcome = Self::resolve(
            host,
            port,
            user,
            pass.or(password),
            from,
            to,
            admin,
            presence,
        );
        Self { outcome }
    }

    pub fn from_settings(settings: SmtpSettings) -> Self {
        Self {
            outcome: Ok(settings),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve(
        host: Option<String>,
        port: Option<String>,
        user: Option<String>,
        password: Option<String>,
        from: Option<String>,
        to: Option<String>,
        admin: Option<String>,
        presence: KeyPresence,
    ) -> Result<SmtpSettings, MailConfigError> {
        let recipient = to
            .or(admin)
            .or_else(|| from.clone())
            .or_else(|| user.clone())
            .unwrap_or_else(|| DEFAULT_MAILBOX.to_string());

        let (Some(host), Some(user), Some(password)) = (host, user, password) else {
            return Err(MailConfigError::NotConfigured { presence });
        };

        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| MailConfigError::InvalidPort {
                    value: raw.clone(),
                    presence,
                })?,
            None => DEFAULT_SMTP_PORT,
        };

        if !recipient.contains('@') {
            return Err(MailConfigError::InvalidRecipient {
                recipient,
                presence,
            });
        }

        let sender = from.unwrap_or_else(|| user.clone());

        Ok(SmtpSettings {
            host,
            port,
            user,
            password,
            sender,
            recipient,
        })
    }

    pub fn settings(&self) -> Result<&SmtpSettings, &MailConfigError> {
        self.outcome.as_ref()
    }

    pub fn into_result(self) -> Result<SmtpSettings, MailConfigError> {
        self.outcome
    }
}
