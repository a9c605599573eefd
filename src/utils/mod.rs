//! Utility modules for the sociapp server
//!
//! - **error**: Error taxonomy and its HTTP mapping

pub mod error;

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Check if a string is a valid email
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Option<regex::Regex>> = OnceLock::new();

    EMAIL_REGEX
        .get_or_init(|| regex::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}
