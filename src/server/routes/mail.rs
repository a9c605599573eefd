//! Outgoing mail endpoints

use crate::server::middleware::AccessMiddleware;
use crate::server::state::AppState;
use crate::utils::error::AppError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configure mail routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/mail")
            .wrap(AccessMiddleware)
            .route("/send", web::post().to(send_mail))
            .route("/send-all", web::post().to(send_to_members)),
    );
}

/// One address or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    /// Non-blank addresses
    pub fn into_vec(self) -> Vec<String> {
        let all = match self {
            Recipients::One(address) => vec![address],
            Recipients::Many(addresses) => addresses,
        };
        all.into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect()
    }
}

/// Mail to explicit recipients
#[derive(Debug, Deserialize)]
pub struct SendMailRequest {
    pub to: Recipients,
    pub subject: String,
    pub message: String,
}

/// Mail to every member
#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub subject: String,
    pub message: String,
}

/// Delivery result
#[derive(Debug, Serialize, Deserialize)]
pub struct MailResponse {
    pub success: bool,
    pub message: String,
}

/// Send a message to the given recipients
pub async fn send_mail(
    state: web::Data<AppState>,
    request: web::Json<SendMailRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let recipients = request.to.into_vec();
    if recipients.is_empty() {
        return Err(AppError::validation("At least one recipient is required").into());
    }

    state
        .notifier
        .send_mail(&recipients, &request.subject, &request.message)
        .await?;

    info!("Mail sent to {} recipient(s)", recipients.len());
    Ok(HttpResponse::Ok().json(MailResponse {
        success: true,
        message: "Email sent successfully".to_string(),
    }))
}

/// Send a message to every member with an email
pub async fn send_to_members(
    state: web::Data<AppState>,
    request: web::Json<BroadcastRequest>,
) -> ActixResult<HttpResponse> {
    let recipients = state.store.list_member_emails().await?;
    if recipients.is_empty() {
        return Ok(HttpResponse::Ok().json(MailResponse {
            success: false,
            message: "No members with an email address".to_string(),
        }));
    }

    state
        .notifier
        .send_mail(&recipients, &request.subject, &request.message)
        .await?;

    info!("Mail sent to {} members", recipients.len());
    Ok(HttpResponse::Ok().json(MailResponse {
        success: true,
        message: format!("Email sent to {} members", recipients.len()),
    }))
}
