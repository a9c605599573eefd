//! HTTP middleware implementations
//!
//! - Access: bearer token and role checks for protected routes
//! - Rate limiting: per-client throttle on the public auth endpoints

mod auth;
mod helpers;
mod rate_limit;


pub use auth::{AccessMiddleware, AccessMiddlewareService};
pub use helpers::{authorization_header, client_key, is_throttled_route, route_pattern};
pub use rate_limit::{RateLimitMiddleware, RateLimitMiddlewareService, Throttle};
