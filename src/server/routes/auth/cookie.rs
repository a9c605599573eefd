//! Refresh token cookie

use crate::auth::TokenPair;
use actix_web::HttpResponse;
use actix_web::cookie::{Cookie, SameSite, time::Duration};

use super::models::AccessTokenResponse;

/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refresh_token";

/// The cookie is only sent to the refresh endpoint
pub const REFRESH_COOKIE_PATH: &str = "/auth/refresh";

/// Build the refresh cookie for a token
pub fn refresh_cookie(token: String, max_age_secs: u64, secure: bool) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path(REFRESH_COOKIE_PATH)
        .max_age(Duration::seconds(
            i64::try_from(max_age_secs).unwrap_or(i64::MAX),
        ))
        .finish()
}

/// Expired cookie that makes the client drop its refresh token
pub fn clear_refresh_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = refresh_cookie(String::new(), 0, secure);
    cookie.make_removal();
    cookie
}

/// `200 {access_token}` with the refresh token set as a cookie
pub(super) fn session_response(pair: TokenPair, max_age_secs: u64, secure: bool) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(refresh_cookie(pair.refresh_token, max_age_secs, secure))
        .json(AccessTokenResponse {
            access_token: pair.access_token,
        })
}
