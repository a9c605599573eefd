//! Member registration endpoint

use crate::server::state::AppState;
use crate::utils::error::AppError;
use crate::utils::is_valid_email;
use actix_web::{HttpResponse, Result as ActixResult, web};

use super::models::{MessageResponse, RegisterRequest};

/// Register a new unverified account
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();

    if !is_valid_email(&request.email) {
        return Err(AppError::validation("Invalid email format").into());
    }

    let message = state.session.register(request.into()).await?;

    Ok(HttpResponse::Created().json(MessageResponse::new(message)))
}
