//! Member account: authentication identity plus membership profile

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Membership status of an account holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Membership {
    /// Fee-paying member of the association
    Socio,
    /// Registered contact without membership
    #[default]
    NoSocio,
}

impl Membership {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Membership::Socio => "Socio",
            Membership::NoSocio => "NoSocio",
        }
    }

    /// Parse the stored representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Socio" => Some(Membership::Socio),
            "NoSocio" => Some(Membership::NoSocio),
            _ => None,
        }
    }
}

// Form clients send 0/1 as well as the names.
impl<'de> Deserialize<'de> for Membership {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(u8),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(0) => Ok(Membership::NoSocio),
            Raw::Flag(1) => Ok(Membership::Socio),
            Raw::Flag(other) => Err(serde::de::Error::custom(format!(
                "invalid membership flag {}",
                other
            ))),
            Raw::Name(name) => Membership::parse(&name).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid membership '{}'", name))
            }),
        }
    }
}

/// Membership and contact attributes carried alongside the identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub first_name: String,
    pub last_name: String,
    /// National identity document
    pub document_id: String,
    pub address: String,
    pub postal_code: String,
    pub province: String,
    pub locality: String,
    pub country: String,
    pub phone: String,
    pub joined_on: NaiveDate,
    #[serde(default)]
    pub left_on: Option<NaiveDate>,
    pub payment_method: String,
    pub fee: f64,
    #[serde(default)]
    pub membership: Membership,
}

/// Data needed to persist a new, unverified account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub category: String,
    pub verification_code: String,
    pub verification_expires: DateTime<Utc>,
    pub profile: MemberProfile,
}

/// Stored account
///
/// Deliberately not `Serialize`: responses go through [`PublicAccount`] so the
/// password hash and pending code cannot reach the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    /// Unique, compared case-sensitively
    pub email: String,
    pub password_hash: String,
    /// Free-form role string
    pub category: String,
    pub is_verified: bool,
    pub verification_code: Option<String>,
    pub verification_expires: Option<DateTime<Utc>>,
    pub profile: MemberProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh unverified account from registration data
    pub fn from_new(new: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            category: new.category,
            is_verified: false,
            verification_code: Some(new.verification_code),
            verification_expires: Some(new.verification_expires),
            profile: new.profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// An unverified account whose code window has closed is an abandoned registration
    pub fn is_registration_expired(&self, now: DateTime<Utc>) -> bool {
        !self.is_verified && self.verification_expires.is_some_and(|expires| now >= expires)
    }

    /// Whether `code` matches the pending code while it is still valid
    pub fn accepts_code(&self, code: &str, now: DateTime<Utc>) -> bool {
        !self.is_registration_expired(now) && self.verification_code.as_deref() == Some(code)
    }

    /// Transition to verified, clearing the pending code
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_code = None;
        self.verification_expires = None;
        self.updated_at = Utc::now();
    }

    /// Replace the pending code and its expiry
    pub fn issue_verification(&mut self, code: String, expires: DateTime<Utc>) {
        self.verification_code = Some(code);
        self.verification_expires = Some(expires);
        self.updated_at = Utc::now();
    }

    /// Full display name
    pub fn display_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
            .trim()
            .to_string()
    }
}

/// Account as returned to clients, without password hash or pending code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicAccount {
    pub id: Uuid,
    pub email: String,
    pub category: String,
    pub is_verified: bool,
    #[serde(flatten)]
    pub profile: MemberProfile,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            category: account.category.clone(),
            is_verified: account.is_verified,
            profile: account.profile.clone(),
            created_at: account.created_at,
        }
    }
}
