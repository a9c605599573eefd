//! Top-level application configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Main application configuration, one field per YAML section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Outgoing mail configuration
    #[serde(default)]
    pub mail: MailConfig,
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Overlay values read through `lookup` (normally the process environment)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(secret) = lookup("JWT_ACCESS_SECRET") {
            self.auth.access_secret = secret;
        }
        if let Some(secret) = lookup("JWT_REFRESH_SECRET") {
            self.auth.refresh_secret = secret;
        }
        if let Some(env) = lookup("APP_ENV") {
            self.auth.secure_cookies = env.eq_ignore_ascii_case("production");
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database.url = url;
            self.storage.database.enabled = true;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(url) = lookup("MAIL_API_URL") {
            self.mail.api_url = url;
            self.mail.enabled = true;
        }
        if let Some(key) = lookup("MAIL_API_KEY") {
            self.mail.api_key = key;
        }
        if let Some(sender) = lookup("MAIL_SENDER_EMAIL") {
            self.mail.sender_email = sender;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}
