//! Bearer token gate in front of protected routes

use super::jwt::JwtHandler;
use crate::models::Account;
use crate::storage::CredentialStore;
use crate::utils::error::{AppError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Client-facing message for every access rejection
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// Progress of a request through the access gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStage {
    Unauthenticated,
    TokenExtracted,
    TokenVerified,
    SubjectResolved,
}

/// Resolved subject attached to an authenticated request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account: Account,
}

impl AuthContext {
    /// Lower-cased category of the subject
    pub fn category(&self) -> String {
        self.account.category.to_lowercase()
    }
}

/// Verifies bearer access tokens and resolves their subject
#[derive(Clone)]
pub struct AccessGuard {
    jwt: Arc<JwtHandler>,
    store: Arc<dyn CredentialStore>,
}

impl AccessGuard {
    pub fn new(jwt: Arc<JwtHandler>, store: Arc<dyn CredentialStore>) -> Self {
        Self { jwt, store }
    }

    fn reject(stage: AccessStage, reason: &str) -> AppError {
        warn!(?stage, "Access rejected: {}", reason);
        AppError::unauthorized(INVALID_TOKEN)
    }

    /// Authenticate a request from its `Authorization` header value
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthContext> {
        let mut stage = AccessStage::Unauthenticated;

        let token = authorization
            .and_then(JwtHandler::extract_token_from_header)
            .ok_or_else(|| Self::reject(stage, "missing bearer token"))?;
        stage = AccessStage::TokenExtracted;

        let claims = self
            .jwt
            .verify_access_token(token)
            .map_err(|e| Self::reject(stage, &e.to_string()))?;
        stage = AccessStage::TokenVerified;

        let account = self
            .store
            .find_account_by_id(claims.sub)
            .await?
            .ok_or_else(|| Self::reject(stage, "subject no longer exists"))?;
        stage = AccessStage::SubjectResolved;

        debug!(?stage, "Request authenticated for account {}", account.id);
        Ok(AuthContext { account })
    }
}
