//! Authentication and authorization
//!
//! - [`password`]: one-way password hashing
//! - [`jwt`]: access/refresh token issuing and verification
//! - [`verification`]: email verification codes
//! - [`session`]: registration, verification, login and refresh
//! - [`guard`]: bearer token gate
//! - [`roles`]: category checks and the route role table

pub mod guard;
pub mod jwt;
pub mod password;
pub mod roles;
pub mod session;
pub mod verification;

pub use guard::{AccessGuard, AuthContext};
pub use jwt::{JwtHandler, TokenPair};
pub use password::{Argon2Hasher, PasswordHasher};
pub use roles::{INSUFFICIENT_ROLE, RoleGuard, RoutePolicy};
pub use session::{Registration, SessionService, VerificationOutcome};
