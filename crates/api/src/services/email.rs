//! Leave workflow email delivery.
//!
//! Providers:
//! - `console`: logs the rendered message (development)
//! - `sendgrid`: posts to the SendGrid v3 mail API
//!
//! Delivery is best-effort. [`EmailService`] implements the domain
//! [`Notifier`] and turns every failure into a `warn!` plus
//! [`NotifyOutcome::Failed`], never an error for the caller.

use async_trait::async_trait;
use domain::services::{LeaveMailData, MailTemplate, Notifier, NotifyOutcome, Recipient};
use serde_json::json;
use shared::datetime::format_date;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::middleware::metrics::record_email;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email provider not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// A rendered message addressed to one or more recipients.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: Vec<Recipient>,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
}

impl EmailMessage {
    pub fn leave(recipients: &[Recipient], template: MailTemplate, data: &LeaveMailData) -> Self {
        let start = format_date(data.start_date);
        let end = format_date(data.end_date);

        let headline = match template {
            MailTemplate::LeaveStatusUpdated => format!(
                "Your leave request from {} to {} has been {}.",
                start, end, data.status
            ),
            MailTemplate::NewLeaveRequest => format!(
                "{} submitted a leave request from {} to {} that needs your approval.",
                data.employee_name, start, end
            ),
        };

        let body_text = format!(
            "Hello,\n\n{headline}\n\nType: {}\nReason: {}\nDays: {}\n\nThank you.",
            data.leave_type, data.reason, data.days
        );

        let body_html = format!(
            "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>{subject}</title></head>\
             <body><p>Hello,</p><p>{headline}</p><p>Type: {kind}</p><p>Reason: {reason}</p>\
             <p>Days: {days}</p><p>Thank you.</p></body></html>",
            subject = template.subject(),
            headline = escape_html(&headline),
            kind = escape_html(&data.leave_type),
            reason = escape_html(&data.reason),
            days = data.days,
        );

        Self {
            to: recipients.to_vec(),
            subject: template.subject().to_string(),
            body_text,
            body_html,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        match self.config.provider.as_str() {
            "console" => {
                info!(
                    to = ?message.to.iter().map(|r| r.email.as_str()).collect::<Vec<_>>(),
                    subject = %message.subject,
                    body = %message.body_text,
                    "Email (console provider)"
                );
                Ok(())
            }
            "sendgrid" => self.send_sendgrid(message).await,
            other => Err(EmailError::NotConfigured(other.to_string())),
        }
    }

    fn sendgrid_body(&self, message: &EmailMessage) -> serde_json::Value {
        let to: Vec<_> = message
            .to
            .iter()
            .map(|r| json!({ "email": r.email, "name": r.name }))
            .collect();

        json!({
            "personalizations": [{ "to": to }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name,
            },
            "subject": message.subject,
            "content": [
                { "type": "text/plain", "value": message.body_text },
                { "type": "text/html", "value": message.body_html },
            ],
        })
    }

    async fn send_sendgrid(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured("sendgrid api key missing".into()));
        }

        let response = self
            .client
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&self.sendgrid_body(message))
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if response.status().is_success() {
            info!(
                recipients = message.to.len(),
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn notify(
        &self,
        recipients: &[Recipient],
        template: MailTemplate,
        data: &LeaveMailData,
    ) -> NotifyOutcome {
        if !self.is_enabled() || recipients.is_empty() {
            record_email("skipped");
            return NotifyOutcome::Skipped;
        }

        let message = EmailMessage::leave(recipients, template, data);
        match self.send(&message).await {
            Ok(()) => {
                record_email("sent");
                NotifyOutcome::Sent
            }
            Err(e) => {
                warn!(
                    template = template.as_str(),
                    leave_request_id = data.leave_request_id,
                    error = %e,
                    "Leave email delivery failed"
                );
                record_email("failed");
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}
