//! Log-only dispatcher for development

use super::NotificationDispatcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Records outgoing mail in the log instead of sending it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl NotificationDispatcher for LogMailer {
    async fn send_verification_code(&self, email: &str, _code: &str) -> Result<()> {
        info!(recipient = %email, "Verification code mail (not sent, mail relay disabled)");
        Ok(())
    }

    async fn send_mail(&self, recipients: &[String], subject: &str, _message: &str) -> Result<()> {
        info!(
            recipients = recipients.len(),
            subject = %subject,
            "Mail (not sent, mail relay disabled)"
        );
        Ok(())
    }
}
