//! Storage layer for member accounts
//!
//! [`CredentialStore`] is the single source of truth for accounts. Two
//! backends implement it: SeaORM for real deployments and an in-memory map
//! for development and tests.

/// Database storage module
pub mod database;
/// In-memory storage module
pub mod memory;

use crate::config::StorageConfig;
use crate::models::Account;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub use memory::InMemoryStore;

/// Point queries over accounts
///
/// Implementations must reject a second account with an existing email
/// (`AppError::Conflict`); the session layer's existence check is not atomic.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an account by exact email
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Find an account by id
    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Insert a new account
    async fn create_account(&self, account: &Account) -> Result<()>;

    /// Persist the verification flag, pending code and expiry of an account
    async fn update_verification(&self, account: &Account) -> Result<()>;

    /// Delete an account, returning whether it existed
    async fn delete_account(&self, id: Uuid) -> Result<bool>;

    /// All accounts, oldest first
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Emails of every account holding a paid membership
    async fn list_member_emails(&self) -> Result<Vec<String>>;

    /// Delete unverified accounts whose code expired before `now`
    async fn purge_expired_registrations(&self, now: DateTime<Utc>) -> Result<u64>;

    /// Backend connectivity check
    async fn health_check(&self) -> Result<()>;
}

/// Storage backend selection
#[derive(Clone)]
pub enum StorageBackend {
    /// SeaORM database
    Database(Arc<database::Database>),
    /// Process-local map
    Memory(Arc<InMemoryStore>),
}

/// Main storage layer that owns the configured backend
#[derive(Clone)]
pub struct StorageLayer {
    backend: StorageBackend,
}

impl StorageLayer {
    /// Create a new storage layer
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");

        let backend = if config.database.enabled {
            let database = database::Database::new(&config.database).await?;
            StorageBackend::Database(Arc::new(database))
        } else {
            warn!("Database disabled, accounts are kept in memory and lost on restart");
            StorageBackend::Memory(Arc::new(InMemoryStore::new()))
        };

        info!("Storage layer initialized successfully");
        Ok(Self { backend })
    }

    /// Storage layer over an in-memory store
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory(Arc::new(InMemoryStore::new())),
        }
    }

    /// Run database migrations (no-op for the in-memory backend)
    pub async fn migrate(&self) -> Result<()> {
        match &self.backend {
            StorageBackend::Database(db) => db.migrate().await,
            StorageBackend::Memory(_) => Ok(()),
        }
    }

    /// Active backend
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// The backend as a credential store
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        match &self.backend {
            StorageBackend::Database(db) => db.clone() as Arc<dyn CredentialStore>,
            StorageBackend::Memory(mem) => mem.clone() as Arc<dyn CredentialStore>,
        }
    }

    /// Health check for the configured backend
    pub async fn health_check(&self) -> StorageHealthStatus {
        let backend = match &self.backend {
            StorageBackend::Database(_) => "database",
            StorageBackend::Memory(_) => "memory",
        };

        let healthy = match self.credentials().health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Storage health check failed: {}", e);
                false
            }
        };

        StorageHealthStatus { backend, healthy }
    }
}

/// Storage health status
#[derive(Debug, Clone, Serialize)]
pub struct StorageHealthStatus {
    /// Backend name
    pub backend: &'static str,
    /// Whether the backend answered
    pub healthy: bool,
}
