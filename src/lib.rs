//! # sociapp
//!
//! Back-office server for a nonprofit association. It keeps member accounts,
//! verifies their email with a short-lived code, issues JWT sessions and
//! gates administration routes by member category.
//!
//! ## Features
//!
//! - **Registration**: account plus member profile, verified by a 6-digit code
//! - **Sessions**: short access token in the body, rotating refresh token in an HttpOnly cookie
//! - **Role gating**: route table mapping method and path to required categories
//! - **Storage**: SeaORM (SQLite or Postgres) or an in-memory store
//! - **Mail**: transactional relay over HTTP, or log-only for development
//!
//! ## Running
//!
//! ```rust,no_run
//! use sociapp::Config;
//! use sociapp::server::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/sociapp.yaml").await?;
//!     let server = ServerBuilder::new().with_config(config).build().await?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{AppError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl BuildInfo {
    /// Values captured by the build script
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: env!("GIT_HASH"),
        }
    }
}
