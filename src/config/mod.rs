//! Configuration management for the server
//!
//! Configuration comes from an optional YAML file, overlaid with environment
//! variables, then validated before anything else starts.

pub mod models;

pub use models::*;

use crate::utils::error::{AppError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Application configuration
    pub app: AppConfig,
}

impl Config {
    /// Load configuration from a YAML file without validating it
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        let app: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(Self { app })
    }

    /// Load the file if present, overlay the process environment and validate
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok()).await
    }

    /// Same as [`Config::load`] with an explicit variable lookup
    pub async fn load_with<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path).await?
        } else {
            warn!("Config file {:?} not found, using defaults", path);
            Self::default()
        };

        config.app.apply_env(lookup);
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.app.server
    }

    /// Get auth configuration
    pub fn auth(&self) -> &AuthConfig {
        &self.app.auth
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.app.storage
    }

    /// Get mail configuration
    pub fn mail(&self) -> &MailConfig {
        &self.app.mail
    }

    /// Get rate limit configuration
    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.app.rate_limit
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.app.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.app
            .auth
            .validate()
            .map_err(|e| AppError::Config(format!("Auth config error: {}", e)))?;

        self.app
            .server
            .validate()
            .map_err(|e| AppError::Config(format!("Server config error: {}", e)))?;

        self.app
            .storage
            .database
            .validate()
            .map_err(|e| AppError::Config(format!("Database config error: {}", e)))?;

        self.app
            .mail
            .validate()
            .map_err(|e| AppError::Config(format!("Mail config error: {}", e)))?;

        self.app
            .rate_limit
            .validate()
            .map_err(|e| AppError::Config(format!("Rate limit config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.app)
            .map_err(|e| AppError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
