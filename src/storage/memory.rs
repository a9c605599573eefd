//! In-memory credential store

use super::CredentialStore;
use crate::models::{Account, Membership};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Accounts kept in a process-local map
#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        debug!("Finding account by email");
        Ok(self
            .accounts
            .read()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        debug!("Finding account by ID: {}", id);
        Ok(self.accounts.read().get(&id).cloned())
    }

    async fn create_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write();

        // Check and insert under one write lock.
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AppError::conflict("Email already exists"));
        }
        if accounts.contains_key(&account.id) {
            return Err(AppError::conflict("Account already exists"));
        }

        accounts.insert(account.id, account.clone());
        debug!("Created account: {}", account.id);
        Ok(())
    }

    async fn update_verification(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write();
        let stored = accounts
            .get_mut(&account.id)
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        stored.is_verified = account.is_verified;
        stored.verification_code = account.verification_code.clone();
        stored.verification_expires = account.verification_expires;
        stored.updated_at = account.updated_at;
        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool> {
        debug!("Deleting account: {}", id);
        Ok(self.accounts.write().remove(&id).is_some())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.read().values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn list_member_emails(&self) -> Result<Vec<String>> {
        let mut accounts: Vec<(DateTime<Utc>, String)> = self
            .accounts
            .read()
            .values()
            .filter(|a| a.profile.membership == Membership::Socio && !a.email.is_empty())
            .map(|a| (a.created_at, a.email.clone()))
            .collect();
        accounts.sort();
        Ok(accounts.into_iter().map(|(_, email)| email).collect())
    }

    async fn purge_expired_registrations(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut accounts = self.accounts.write();
        let before = accounts.len();
        accounts.retain(|_, a| !a.is_registration_expired(now));
        Ok((before - accounts.len()) as u64)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
