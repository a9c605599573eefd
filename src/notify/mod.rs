//! Outgoing notifications
//!
//! The session core only needs to deliver verification codes; administrators
//! also send free-form mail to one or many members.

mod log_only;
mod relay;

pub use log_only::LogMailer;
pub use relay::HttpMailer;

use crate::config::MailConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Subject of the verification code mail
pub const VERIFICATION_SUBJECT: &str = "Verify your email";

/// Mail delivery
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a verification code to a single address
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<()>;

    /// Deliver a plain-text message, rendered as HTML, to every recipient
    async fn send_mail(&self, recipients: &[String], subject: &str, message: &str) -> Result<()>;
}

/// Build the dispatcher selected by configuration
///
/// `code_ttl` is the verification code lifetime quoted in outgoing mail.
pub fn build_dispatcher(
    config: &MailConfig,
    code_ttl: u64,
) -> Result<Arc<dyn NotificationDispatcher>> {
    if config.enabled {
        info!("Mail relay enabled: {}", config.api_url);
        Ok(Arc::new(HttpMailer::new(config, code_ttl)?))
    } else {
        info!("Mail relay disabled, outgoing mail is only logged");
        Ok(Arc::new(LogMailer))
    }
}

/// Wrap a plain-text message in the HTML container used for every mail
pub fn render_html(message: &str) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333;\">{}</div>",
        message.replace("\r\n", "\n").replace('\n', "<br>")
    )
}

/// Human-readable lifetime, whole minutes when possible
fn describe_ttl(secs: u64) -> String {
    match (secs / 60, secs % 60) {
        (1, 0) => "1 minute".to_string(),
        (minutes, 0) if minutes > 0 => format!("{} minutes", minutes),
        _ if secs == 1 => "1 second".to_string(),
        _ => format!("{} seconds", secs),
    }
}

/// Body of the verification code mail
pub fn verification_message(code: &str, ttl_secs: u64) -> String {
    format!(
        "Your verification code is: {}\n\nIt expires in {}. If you did not register, ignore this message.",
        code,
        describe_ttl(ttl_secs)
    )
}
