//! Email verification endpoints

use crate::auth::VerificationOutcome;
use crate::auth::session::messages;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};

use super::cookie::session_response;
use super::models::{MessageResponse, ResendVerificationRequest, VerifyEmailRequest};

/// Verify an email with its code; opens a session on first success
pub async fn verify_email(
    state: web::Data<AppState>,
    request: web::Json<VerifyEmailRequest>,
) -> ActixResult<HttpResponse> {
    match state
        .session
        .verify_email(&request.email, request.code.trim())
        .await?
    {
        VerificationOutcome::AlreadyVerified => {
            Ok(HttpResponse::Ok().json(MessageResponse::new(messages::ALREADY_VERIFIED)))
        }
        VerificationOutcome::Verified(pair) => {
            let auth = state.config.auth();
            Ok(session_response(
                pair,
                auth.refresh_token_ttl,
                auth.secure_cookies,
            ))
        }
    }
}

/// Send a fresh verification code
pub async fn resend_verification(
    state: web::Data<AppState>,
    request: web::Json<ResendVerificationRequest>,
) -> ActixResult<HttpResponse> {
    let message = state
        .session
        .resend_verification_code(&request.email)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}
