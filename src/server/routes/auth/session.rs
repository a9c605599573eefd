//! Logout endpoint

use crate::auth::session::messages;
use crate::server::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::info;

use super::cookie::clear_refresh_cookie;
use super::models::MessageResponse;

/// Clear the refresh cookie
///
/// Tokens are not tracked server-side, so an issued access token stays valid
/// until it expires.
pub async fn logout(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    info!("Logout");

    Ok(HttpResponse::Ok()
        .cookie(clear_refresh_cookie(state.config.auth().secure_cookies))
        .json(MessageResponse::new(messages::LOGGED_OUT)))
}
