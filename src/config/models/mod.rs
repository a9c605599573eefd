//! Configuration data models
//!
//! This module defines all configuration structures used throughout the server.

#![allow(missing_docs)]

pub mod app;
pub mod auth;
pub mod logging;
pub mod mail;
pub mod rate_limit;
pub mod server;
pub mod storage;

// Re-export all configuration types
pub use app::*;
pub use auth::*;
pub use logging::*;
pub use mail::*;
pub use rate_limit::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    3000
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

/// Access tokens live for 15 minutes
pub fn default_access_token_ttl() -> u64 {
    15 * 60
}

/// Refresh tokens live for 7 days
pub fn default_refresh_token_ttl() -> u64 {
    7 * 24 * 60 * 60
}

/// Verification codes live for 15 minutes
pub fn default_verification_code_ttl() -> u64 {
    15 * 60
}

pub fn default_rate_limit_requests() -> u32 {
    10
}

pub fn default_rate_limit_window() -> u64 {
    60
}

pub fn default_mail_timeout() -> u64 {
    10
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
