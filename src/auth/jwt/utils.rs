//! JWT utility functions

use super::types::{Claims, JwtHandler};
use crate::utils::current_timestamp;

impl JwtHandler {
    /// Extract token from Authorization header
    pub fn extract_token_from_header(header_value: &str) -> Option<&str> {
        header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Access token lifetime in seconds
    pub fn access_ttl(&self) -> u64 {
        self.access_ttl
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_ttl(&self) -> u64 {
        self.refresh_ttl
    }

    /// Get time until token expires
    pub fn time_until_expiry(&self, claims: &Claims) -> Option<u64> {
        claims.exp.checked_sub(current_timestamp()).filter(|s| *s > 0)
    }
}
