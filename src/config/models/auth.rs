//! Authentication configuration

use super::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

const MIN_SECRET_LEN: usize = 32;
const MAX_VERIFICATION_CODE_TTL: u64 = 24 * 60 * 60;

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign access tokens (`JWT_ACCESS_SECRET`)
    #[serde(default)]
    pub access_secret: String,
    /// Secret used to sign refresh tokens (`JWT_REFRESH_SECRET`)
    #[serde(default)]
    pub refresh_secret: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl: u64,
    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl: u64,
    /// Verification code lifetime in seconds
    #[serde(default = "default_verification_code_ttl")]
    pub verification_code_ttl: u64,
    /// Mark the refresh cookie `Secure`
    #[serde(default)]
    pub secure_cookies: bool,
    /// Interval of the background sweep removing expired unverified registrations.
    /// `None` keeps purging lazy (on the next login or verify attempt).
    #[serde(default)]
    pub purge_interval_secs: Option<u64>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("verification_code_ttl", &self.verification_code_ttl)
            .field("secure_cookies", &self.secure_cookies)
            .field("purge_interval_secs", &self.purge_interval_secs)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_token_ttl: default_access_token_ttl(),
            refresh_token_ttl: default_refresh_token_ttl(),
            verification_code_ttl: default_verification_code_ttl(),
            secure_cookies: false,
            purge_interval_secs: None,
        }
    }
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.access_secret.is_empty() {
            return Err("JWT_ACCESS_SECRET is not set".to_string());
        }

        if self.refresh_secret.is_empty() {
            return Err("JWT_REFRESH_SECRET is not set".to_string());
        }

        if self.access_secret.len() < MIN_SECRET_LEN || self.refresh_secret.len() < MIN_SECRET_LEN
        {
            return Err(format!(
                "JWT secrets must be at least {} characters long",
                MIN_SECRET_LEN
            ));
        }

        if self.access_secret == self.refresh_secret {
            return Err("Access and refresh token secrets must differ".to_string());
        }

        if self.access_token_ttl == 0 || self.refresh_token_ttl == 0 {
            return Err("Token lifetimes cannot be 0".to_string());
        }

        if self.access_token_ttl >= self.refresh_token_ttl {
            warn!("Access token lifetime is not shorter than the refresh token lifetime");
        }

        if self.verification_code_ttl == 0 {
            return Err("Verification code lifetime cannot be 0".to_string());
        }

        if self.verification_code_ttl > MAX_VERIFICATION_CODE_TTL {
            return Err("Verification code lifetime cannot exceed one day".to_string());
        }

        if self.purge_interval_secs == Some(0) {
            return Err("Purge interval cannot be 0".to_string());
        }

        Ok(())
    }
}
