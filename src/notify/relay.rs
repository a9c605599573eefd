//! Transactional mail relay over HTTP

use super::{NotificationDispatcher, VERIFICATION_SUBJECT, render_html, verification_message};
use crate::config::MailConfig;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
}

/// Sends mail by POSTing JSON to a relay endpoint
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
    /// Verification code lifetime quoted in the mail, seconds
    code_ttl: u64,
}

impl std::fmt::Debug for HttpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailer")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("sender_email", &self.sender_email)
            .finish()
    }
}

impl HttpMailer {
    /// Create a mailer from configuration
    pub fn new(config: &MailConfig, code_ttl: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("sociapp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender_email: config.sender_email.clone(),
            code_ttl,
            sender_name: config.sender_name.clone(),
        })
    }

    async fn deliver(&self, recipients: &[String], subject: &str, html: String) -> Result<()> {
        if recipients.is_empty() {
            return Err(AppError::validation("At least one recipient is required"));
        }

        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: recipients
                .iter()
                .map(|email| EmailAddress {
                    email: email.clone(),
                    name: None,
                })
                .collect(),
            subject: subject.to_string(),
            html_content: html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Mail accepted by relay for {} recipient(s)", recipients.len());
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        error!("Mail relay rejected send (status={}): {}", status, text);
        Err(AppError::email(format!(
            "Mail relay send failed (status={})",
            status.as_u16()
        )))
    }
}

#[async_trait]
impl NotificationDispatcher for HttpMailer {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<()> {
        self.deliver(
            &[email.to_string()],
            VERIFICATION_SUBJECT,
            render_html(&verification_message(code, self.code_ttl)),
        )
        .await
    }

    async fn send_mail(&self, recipients: &[String], subject: &str, message: &str) -> Result<()> {
        self.deliver(recipients, subject, render_html(message)).await
    }
}
