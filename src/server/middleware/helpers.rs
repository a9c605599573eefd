//! Helper functions for middleware

use actix_web::dev::ServiceRequest;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};

/// Raw `Authorization` header value, if it is valid text
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// Client identifier used as the throttle key
///
/// Keyed on the socket peer only; forwarding headers are client-controlled.
pub fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Resource pattern the router resolves the request to, such as `/users/{id}`
///
/// Resolved against the percent-decoded path actix routes on, not the raw URI.
pub fn route_pattern(req: &ServiceRequest) -> Option<String> {
    req.resource_map().match_pattern(req.match_info().as_str())
}

/// Check if a route pattern is subject to the auth throttle
pub fn is_throttled_route(pattern: &str) -> bool {
    const THROTTLED_ROUTES: &[&str] = &[
        "/auth/register",
        "/auth/login",
        "/auth/refresh",
        "/auth/verify-email",
        "/auth/resend-verification",
    ];

    THROTTLED_ROUTES.contains(&pattern)
}
