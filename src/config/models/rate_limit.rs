//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Throttling of the public authentication endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Requests allowed per client within one window
    #[serde(default = "default_rate_limit_requests")]
    pub requests: u32,
    /// Window length in seconds
    #[serde(default = "default_rate_limit_window")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests: default_rate_limit_requests(),
            window_secs: default_rate_limit_window(),
        }
    }
}

impl RateLimitConfig {
    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && (self.requests == 0 || self.window_secs == 0) {
            return Err("Rate limit requests and window must be positive".to_string());
        }
        Ok(())
    }
}
