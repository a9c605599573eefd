//! JWT token handling
//!
//! Access and refresh tokens are signed with distinct secrets and carry the
//! same identity claims (subject id and email).

mod handler;
pub mod types;
mod utils;


pub use types::{Claims, JwtHandler, TokenPair, TokenType};
