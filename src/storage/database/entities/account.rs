use crate::models::{Account, MemberProfile, Membership};
use sea_orm::Set;
use sea_orm::entity::prelude::*;

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Account ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Email address (unique, storage-level backstop for concurrent registrations)
    #[sea_orm(unique)]
    pub email: String,

    /// Password hash
    pub password_hash: String,

    /// Free-form role string
    pub category: String,

    /// Email verification status
    pub is_verified: bool,

    /// Pending verification code
    pub verification_code: Option<String>,

    /// Pending verification code expiry
    pub verification_expires: Option<DateTimeWithTimeZone>,

    pub first_name: String,
    pub last_name: String,
    pub document_id: String,
    pub address: String,
    pub postal_code: String,
    pub province: String,
    pub locality: String,
    pub country: String,
    pub phone: String,
    pub joined_on: Date,
    pub left_on: Option<Date>,
    pub payment_method: String,
    #[sea_orm(column_type = "Double")]
    pub fee: f64,
    /// `Socio` or `NoSocio`
    pub membership: String,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last update timestamp
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion methods between SeaORM model and our domain model
impl Model {
    /// Convert SeaORM model to domain account
    pub fn to_domain(&self) -> Account {
        Account {
            id: self.id,
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            category: self.category.clone(),
            is_verified: self.is_verified,
            verification_code: self.verification_code.clone(),
            verification_expires: self.verification_expires.map(|dt| dt.naive_utc().and_utc()),
            profile: MemberProfile {
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
                document_id: self.document_id.clone(),
                address: self.address.clone(),
                postal_code: self.postal_code.clone(),
                province: self.province.clone(),
                locality: self.locality.clone(),
                country: self.country.clone(),
                phone: self.phone.clone(),
                joined_on: self.joined_on,
                left_on: self.left_on,
                payment_method: self.payment_method.clone(),
                fee: self.fee,
                membership: Membership::parse(&self.membership).unwrap_or_default(),
            },
            created_at: self.created_at.naive_utc().and_utc(),
            updated_at: self.updated_at.naive_utc().and_utc(),
        }
    }

    /// Convert domain account to SeaORM active model
    pub fn from_domain(account: &Account) -> ActiveModel {
        let profile = &account.profile;
        ActiveModel {
            id: Set(account.id),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            category: Set(account.category.clone()),
            is_verified: Set(account.is_verified),
            verification_code: Set(account.verification_code.clone()),
            verification_expires: Set(account.verification_expires.map(|dt| dt.into())),
            first_name: Set(profile.first_name.clone()),
            last_name: Set(profile.last_name.clone()),
            document_id: Set(profile.document_id.clone()),
            address: Set(profile.address.clone()),
            postal_code: Set(profile.postal_code.clone()),
            province: Set(profile.province.clone()),
            locality: Set(profile.locality.clone()),
            country: Set(profile.country.clone()),
            phone: Set(profile.phone.clone()),
            joined_on: Set(profile.joined_on),
            left_on: Set(profile.left_on),
            payment_method: Set(profile.payment_method.clone()),
            fee: Set(profile.fee),
            membership: Set(profile.membership.as_str().to_string()),
            created_at: Set(account.created_at.into()),
            updated_at: Set(account.updated_at.into()),
        }
    }
}
