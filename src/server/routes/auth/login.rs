//! Login endpoint

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::info;

use super::cookie::session_response;
use super::models::LoginRequest;

/// Exchange credentials for an access token and a refresh cookie
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    info!("Login attempt for: {}", request.email);

    let pair = state.session.login(&request.email, &request.password).await?;

    let auth = state.config.auth();
    Ok(session_response(
        pair,
        auth.refresh_token_ttl,
        auth.secure_cookies,
    ))
}
