//! Token refresh endpoint

use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::cookie::{REFRESH_COOKIE, session_response};

/// Rotate the session using the refresh cookie
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let cookie = req.cookie(REFRESH_COOKIE);
    let token = cookie.as_ref().map(|c| c.value());

    let pair = state.session.refresh_token(token).await?;

    let auth = state.config.auth();
    Ok(session_response(
        pair,
        auth.refresh_token_ttl,
        auth.secure_cookies,
    ))
}
