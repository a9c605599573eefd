//! Session lifecycle: registration, email verification, login and refresh
//!
//! Every failure is an [`AppError`]; messages that reach clients are the
//! generic ones in [`messages`], never the internal cause.

use super::jwt::{JwtHandler, TokenPair};
use super::password::PasswordHasher;
use super::verification::VerificationCode;
use crate::models::{Account, MemberProfile, NewAccount};
use crate::notify::NotificationDispatcher;
use crate::storage::CredentialStore;
use crate::utils::error::{AppError, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Client-facing messages
pub mod messages {
    pub const EMAIL_EXISTS: &str = "Email already exists";
    pub const EMAIL_ALREADY_VERIFIED: &str = "Email already verified";
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
    pub const VERIFY_FIRST: &str = "Please verify your email before logging in";
    pub const REGISTRATION_EXPIRED: &str = "Registration expired, please register again";
    pub const INVALID_CODE: &str = "Invalid verification code";
    pub const NO_REFRESH_TOKEN: &str = "No refresh token provided";
    pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
    pub const UNKNOWN_ACCOUNT: &str = "No pending registration for this email";

    pub const REGISTERED: &str =
        "Registration successful. Please check your email for the verification code.";
    pub const ALREADY_VERIFIED: &str = "Email is already verified";
    pub const CODE_RESENT: &str = "A new verification code has been sent to your email";
    pub const LOGGED_OUT: &str = "Logged out successfully";
}

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub category: String,
    pub profile: MemberProfile,
}

/// Result of an email verification attempt
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// The account was verified earlier; nothing changed
    AlreadyVerified,
    /// The account is now verified and a session was opened
    Verified(TokenPair),
}

/// Orchestrates the account session lifecycle
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: Arc<JwtHandler>,
    notifier: Arc<dyn NotificationDispatcher>,
    verification_ttl: u64,
}

impl SessionService {
    /// Create a new session service
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<JwtHandler>,
        notifier: Arc<dyn NotificationDispatcher>,
        verification_ttl: u64,
    ) -> Self {
        Self {
            store,
            hasher,
            jwt,
            notifier,
            verification_ttl,
        }
    }

    /// Register a new unverified account and mail its verification code
    ///
    /// The mail is sent in the background; a delivery failure is logged and
    /// leaves the account in place.
    pub async fn register(&self, registration: Registration) -> Result<&'static str> {
        info!("Registration attempt for: {}", registration.email);

        if self
            .store
            .find_account_by_email(&registration.email)
            .await?
            .is_some()
        {
            warn!("Registration rejected, email already registered");
            return Err(AppError::conflict(messages::EMAIL_EXISTS));
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let verification = VerificationCode::generate(Utc::now(), self.verification_ttl);

        let account = Account::from_new(NewAccount {
            email: registration.email,
            password_hash,
            category: registration.category,
            verification_code: verification.code.clone(),
            verification_expires: verification.expires_at,
            profile: registration.profile,
        });

        // The store enforces uniqueness too; a racing registration surfaces as Conflict here.
        self.store.create_account(&account).await?;
        info!("Account registered: {}", account.id);

        let notifier = Arc::clone(&self.notifier);
        let email = account.email.clone();
        let code = verification.code;
        tokio::spawn(async move {
            if let Err(e) = notifier.send_verification_code(&email, &code).await {
                warn!("Failed to send verification email to {}: {}", email, e);
            }
        });

        Ok(messages::REGISTERED)
    }

    /// Verify an email with the code that was mailed to it
    ///
    /// An attempt after the code expired deletes the pending registration.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<VerificationOutcome> {
        let Some(mut account) = self.store.find_account_by_email(email).await? else {
            warn!("Verification attempt for unknown email");
            return Err(AppError::unauthorized(messages::INVALID_CODE));
        };

        if account.is_verified {
            debug!("Account {} already verified", account.id);
            return Ok(VerificationOutcome::AlreadyVerified);
        }

        let now = Utc::now();
        if account.is_registration_expired(now) {
            self.purge(&account).await?;
            return Err(AppError::unauthorized(messages::REGISTRATION_EXPIRED));
        }

        if !account.accepts_code(code, now) {
            warn!("Wrong verification code for account {}", account.id);
            return Err(AppError::unauthorized(messages::INVALID_CODE));
        }

        account.mark_verified();
        self.store.update_verification(&account).await?;
        info!("Account verified: {}", account.id);

        Ok(VerificationOutcome::Verified(self.generate_tokens(&account)?))
    }

    /// Issue and mail a fresh verification code, replacing the previous one
    pub async fn resend_verification_code(&self, email: &str) -> Result<&'static str> {
        let Some(mut account) = self.store.find_account_by_email(email).await? else {
            warn!("Resend requested for unknown email");
            return Err(AppError::unauthorized(messages::UNKNOWN_ACCOUNT));
        };

        if account.is_verified {
            return Err(AppError::conflict(messages::EMAIL_ALREADY_VERIFIED));
        }

        let verification = VerificationCode::generate(Utc::now(), self.verification_ttl);
        account.issue_verification(verification.code.clone(), verification.expires_at);
        self.store.update_verification(&account).await?;

        self.notifier
            .send_verification_code(&account.email, &verification.code)
            .await
            .map_err(|e| {
                error!("Failed to resend verification email: {}", e);
                e
            })?;

        info!("Verification code reissued for account {}", account.id);
        Ok(messages::CODE_RESENT)
    }

    /// Check credentials and return the verified account
    ///
    /// Unknown email and wrong password fail with the same message.
    pub async fn validate_user(&self, email: &str, password: &str) -> Result<Account> {
        let Some(account) = self.store.find_account_by_email(email).await? else {
            warn!("Login failed: unknown email");
            return Err(AppError::unauthorized(messages::INVALID_CREDENTIALS));
        };

        let password_ok = self
            .hasher
            .verify(password, &account.password_hash)
            .unwrap_or_else(|e| {
                error!("Stored hash for account {} is unusable: {}", account.id, e);
                false
            });

        if !password_ok {
            warn!("Login failed: wrong password for account {}", account.id);
            return Err(AppError::unauthorized(messages::INVALID_CREDENTIALS));
        }

        if !account.is_verified {
            if account.is_registration_expired(Utc::now()) {
                self.purge(&account).await?;
                return Err(AppError::unauthorized(messages::REGISTRATION_EXPIRED));
            }
            warn!("Login failed: account {} not verified", account.id);
            return Err(AppError::unauthorized(messages::VERIFY_FIRST));
        }

        Ok(account)
    }

    /// Authenticate and open a session
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let account = self.validate_user(email, password).await?;
        info!("Login successful for account {}", account.id);
        self.generate_tokens(&account)
    }

    /// Mint an access/refresh pair for an account
    pub fn generate_tokens(&self, account: &Account) -> Result<TokenPair> {
        self.jwt.create_token_pair(account)
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The presented token is not revoked; it stays valid until it expires.
    pub async fn refresh_token(&self, token: Option<&str>) -> Result<TokenPair> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized(messages::NO_REFRESH_TOKEN))?;

        let claims = self.jwt.verify_refresh_token(token).map_err(|e| {
            warn!("Refresh token rejected: {}", e);
            AppError::unauthorized(messages::INVALID_REFRESH_TOKEN)
        })?;

        let account = self
            .store
            .find_account_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                warn!("Refresh token for missing account {}", claims.sub);
                AppError::unauthorized(messages::INVALID_REFRESH_TOKEN)
            })?;

        debug!("Rotating tokens for account {}", account.id);
        self.generate_tokens(&account)
    }

    /// Delete every abandoned registration
    pub async fn purge_expired_registrations(&self) -> Result<u64> {
        self.store.purge_expired_registrations(Utc::now()).await
    }

    async fn purge(&self, account: &Account) -> Result<()> {
        info!(
            "Deleting expired registration for account {}",
            account.id
        );
        self.store.delete_account(account.id).await?;
        Ok(())
    }
}
