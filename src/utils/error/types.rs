//! Error types for the server

use thiserror::Error;

/// Result type alias for the server
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for the server
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Email delivery errors
    #[error("Email error: {0}")]
    Email(String),

    /// Unauthorized errors (bad credentials, bad or missing tokens, unverified accounts)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden errors (authenticated but lacking the required role)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
