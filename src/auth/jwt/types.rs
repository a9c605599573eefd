//! JWT types and data structures

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signing and verification keys for one token kind
#[derive(Clone)]
pub(super) struct KeyPair {
    pub(super) encoding: EncodingKey,
    pub(super) decoding: DecodingKey,
}

/// JWT handler for token operations
#[derive(Clone)]
pub struct JwtHandler {
    /// Keys for access tokens
    pub(super) access_keys: KeyPair,
    /// Keys for refresh tokens, never shared with access tokens
    pub(super) refresh_keys: KeyPair,
    /// JWT algorithm
    pub(super) algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub(super) access_ttl: u64,
    /// Refresh token lifetime in seconds
    pub(super) refresh_ttl: u64,
    /// Token issuer
    pub(super) issuer: String,
}

impl std::fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .field("access_keys", &"[REDACTED]")
            .field("refresh_keys", &"[REDACTED]")
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: Uuid,
    /// Subject email
    pub email: String,
    /// Issued at timestamp
    pub iat: u64,
    /// Expiration timestamp
    pub exp: u64,
    /// Issuer
    pub iss: String,
    /// Audience, mirrors the token type
    pub aud: String,
    /// Token type
    pub token_type: TokenType,
}

/// Token type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Access token for API access
    Access,
    /// Refresh token for obtaining new access tokens
    Refresh,
}

impl TokenType {
    /// Audience value stamped into tokens of this type
    pub fn audience(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Token pair (access + refresh)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}
