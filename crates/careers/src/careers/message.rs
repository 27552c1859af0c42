use chrono::{DateTime, TimeZone};

use std::fmt::Write as _;

use super::submission::{ApplicationSubmission, ResumeAttachment};

const GENERAL_POSITION_LINE: &str = "General Application (Role Not Listed)";

/// Timestamp layout used in notification bodies, e.g. `10/17/2026, 3:04:05 PM`.
pub const SUBMITTED_AT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Notification email for one application, ready to hand to a mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub attachment: Option<ResumeAttachment>,
}

impl ApplicationEmail {
    pub fn compose<Tz>(submission: &ApplicationSubmission, submitted_at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let general = submission.is_general_application();
        let subject = if general {
            "New Role Application - General Interest".to_string()
        } else {
            format!("New Job Application: {}", submission.position_label)
        };
        let headline = if general {
            "New Role Application Received"
        } else {
            "New Job Application Received"
        };
        let position = if general {
            GENERAL_POSITION_LINE
        } else {
            submission.position_label.as_str()
        };
        let timestamp = submitted_at.format(SUBMITTED_AT_FORMAT).to_string();

        let text_body = format!(
            "{headline}\n\nPosition: {position}\nPosition ID: {}\nEmail: {}\nPhone: {}\n\nApplication submitted at: {timestamp}",
            submission.position_id, submission.email, submission.phone,
        );

        let html_body = render_html(headline, position, submission, &timestamp);

        Self {
            subject,
            text_body,
            html_body,
            attachment: submission.resume.clone(),
        }
    }
}

fn render_html(
    headline: &str,
    position: &str,
    submission: &ApplicationSubmission,
    timestamp: &str,
) -> String {
    let email = escape_html(&submission.email);
    let phone = escape_html(&submission.phone);

    let mut html = String::new();
    html.push_str(r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">"#);
    let _ = write!(
        html,
        r#"<h2 style="color: #333; border-bottom: 2px solid #000; padding-bottom: 10px;">{}</h2>"#,
        escape_html(headline)
    );
    html.push_str(r#"<div style="margin-top: 20px;">"#);
    let _ = write!(
        html,
        "<p><strong>Position:</strong> {}</p>",
        escape_html(position)
    );
    let _ = write!(
        html,
        "<p><strong>Position ID:</strong> {}</p>",
        escape_html(&submission.position_id)
    );
    let _ = write!(
        html,
        r#"<p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>"#
    );
    let _ = write!(
        html,
        r#"<p><strong>Phone:</strong> <a href="tel:{phone}">{phone}</a></p>"#
    );
    let _ = write!(
        html,
        "<p><strong>Application Date:</strong> {}</p>",
        escape_html(timestamp)
    );
    html.push_str("</div></div>");
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
