use crate::models::{Account, Membership};
use crate::storage::CredentialStore;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, account};
use super::types::SeaOrmDatabase;

#[async_trait]
impl CredentialStore for SeaOrmDatabase {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        debug!("Finding account by email");

        let model = entities::Account::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(|m| m.to_domain()))
    }

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        debug!("Finding account by ID: {}", id);

        let model = entities::Account::find_by_id(id).one(&self.db).await?;

        Ok(model.map(|m| m.to_domain()))
    }

    async fn create_account(&self, account: &Account) -> Result<()> {
        debug!("Creating account: {}", account.id);

        let active_model = account::Model::from_domain(account);

        entities::Account::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::conflict("Email already exists")
                }
                _ => AppError::Database(e),
            })?;

        Ok(())
    }

    async fn update_verification(&self, account: &Account) -> Result<()> {
        debug!("Updating verification state for account: {}", account.id);

        let model = entities::Account::find_by_id(account.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        let mut active_model: account::ActiveModel = model.into();
        active_model.is_verified = Set(account.is_verified);
        active_model.verification_code = Set(account.verification_code.clone());
        active_model.verification_expires = Set(account.verification_expires.map(|dt| dt.into()));
        active_model.updated_at = Set(account.updated_at.into());

        active_model.update(&self.db).await?;
        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool> {
        debug!("Deleting account: {}", id);

        let result = entities::Account::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let models = entities::Account::find()
            .order_by_asc(account::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.iter().map(account::Model::to_domain).collect())
    }

    async fn list_member_emails(&self) -> Result<Vec<String>> {
        let emails = entities::Account::find()
            .select_only()
            .column(account::Column::Email)
            .filter(account::Column::Membership.eq(Membership::Socio.as_str()))
            .filter(account::Column::Email.ne(""))
            .order_by_asc(account::Column::CreatedAt)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(emails)
    }

    async fn purge_expired_registrations(&self, now: DateTime<Utc>) -> Result<u64> {
        // Same predicate as `Account::is_registration_expired`
        let cutoff: sea_orm::prelude::DateTimeWithTimeZone = now.into();
        let result = entities::Account::delete_many()
            .filter(account::Column::IsVerified.eq(false))
            .filter(account::Column::VerificationExpires.is_not_null())
            .filter(account::Column::VerificationExpires.lte(cutoff))
            .exec(&self.db)
            .await?;

        debug!("Purged {} expired registrations", result.rows_affected);
        Ok(result.rows_affected)
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }
}
