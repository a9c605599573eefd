//! Outgoing mail configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Transactional mail relay configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Send through the HTTP relay; when false mails are only logged
    #[serde(default)]
    pub enabled: bool,
    /// Relay endpoint accepting JSON send requests
    #[serde(default)]
    pub api_url: String,
    /// Relay API key
    #[serde(default)]
    pub api_key: String,
    /// Sender address
    #[serde(default)]
    pub sender_email: String,
    /// Sender display name
    #[serde(default)]
    pub sender_name: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_mail_timeout")]
    pub timeout: u64,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("enabled", &self.enabled)
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: String::new(),
            api_key: String::new(),
            sender_email: String::new(),
            sender_name: None,
            timeout: default_mail_timeout(),
        }
    }
}

impl MailConfig {
    /// Validate mail configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.api_url.is_empty() {
            return Err("Mail relay URL is required when mail is enabled".to_string());
        }
        if self.sender_email.is_empty() {
            return Err("Mail sender address is required when mail is enabled".to_string());
        }
        Ok(())
    }
}
