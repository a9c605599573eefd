//! Domain models shared by the session core, storage and HTTP layers

pub mod account;

pub use account::{Account, MemberProfile, Membership, NewAccount, PublicAccount};
