//! Core JWT handler implementation

use super::types::{Claims, JwtHandler, KeyPair, TokenPair, TokenType};
use crate::config::AuthConfig;
use crate::models::Account;
use crate::utils::current_timestamp;
use crate::utils::error::{AppError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

const ISSUER: &str = "sociapp";

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl JwtHandler {
    /// Create a new JWT handler
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.access_secret.is_empty() {
            return Err(AppError::config("JWT_ACCESS_SECRET is not set"));
        }
        if config.refresh_secret.is_empty() {
            return Err(AppError::config("JWT_REFRESH_SECRET is not set"));
        }

        Ok(Self {
            access_keys: KeyPair::from_secret(&config.access_secret),
            refresh_keys: KeyPair::from_secret(&config.refresh_secret),
            algorithm: Algorithm::HS256,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            issuer: ISSUER.to_string(),
        })
    }

    fn keys(&self, token_type: TokenType) -> &KeyPair {
        match token_type {
            TokenType::Access => &self.access_keys,
            TokenType::Refresh => &self.refresh_keys,
        }
    }

    fn ttl(&self, token_type: TokenType) -> u64 {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    /// Sign a token of the given type for a subject
    pub(super) fn sign(
        &self,
        user_id: Uuid,
        email: &str,
        token_type: TokenType,
        issued_at: u64,
    ) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl(token_type),
            iss: self.issuer.clone(),
            aud: token_type.audience().to_string(),
            token_type,
        };

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.keys(token_type).encoding)?;

        debug!("Created {:?} token for user: {}", token_type, user_id);
        Ok(token)
    }

    /// Create an access token for an account
    pub fn create_access_token(&self, account: &Account) -> Result<String> {
        self.sign(
            account.id,
            &account.email,
            TokenType::Access,
            current_timestamp(),
        )
    }

    /// Create a refresh token for an account
    pub fn create_refresh_token(&self, account: &Account) -> Result<String> {
        self.sign(
            account.id,
            &account.email,
            TokenType::Refresh,
            current_timestamp(),
        )
    }

    /// Create a token pair (access + refresh)
    pub fn create_token_pair(&self, account: &Account) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.create_access_token(account)?,
            refresh_token: self.create_refresh_token(account)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl,
        })
    }

    /// Verify and decode a token of the expected type
    ///
    /// The caller decides how to surface failures; the raw cause is returned
    /// here only so it can be logged.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[expected.audience()]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.keys(expected).decoding, &validation)?;

        if token_data.claims.token_type != expected {
            return Err(AppError::unauthorized("Token type mismatch"));
        }

        debug!("Token verified for user: {}", token_data.claims.sub);
        Ok(token_data.claims)
    }

    /// Verify an access token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, TokenType::Access)
    }

    /// Verify a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, TokenType::Refresh)
    }
}

#[cfg(test)]
impl JwtHandler {
    /// Refresh token backdated to `issued_at`
    pub(crate) fn refresh_token_issued_at(
        &self,
        account: &Account,
        issued_at: u64,
    ) -> Result<String> {
        self.sign(account.id, &account.email, TokenType::Refresh, issued_at)
    }
}
