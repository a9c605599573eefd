//! Account administration endpoints
//!
//! Mounted behind the access middleware; the route policy restricts them to
//! administrators.

use crate::auth::AuthContext;
use crate::models::PublicAccount;
use crate::server::middleware::AccessMiddleware;
use crate::server::state::AppState;
use crate::utils::error::AppError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::ApiResponse;
use super::auth::MessageResponse;

/// Configure account administration routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AccessMiddleware)
            .route("", web::get().to(list_users))
            .route("/{id}", web::delete().to(delete_user)),
    );
}

#[derive(Debug, Serialize)]
struct UserList {
    users: Vec<PublicAccount>,
}

/// List every account without password hashes or pending codes
pub async fn list_users(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let users = state
        .store
        .list_accounts()
        .await?
        .iter()
        .map(PublicAccount::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserList { users })))
}

/// Delete an account by id
pub async fn delete_user(
    state: web::Data<AppState>,
    context: web::ReqData<AuthContext>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();

    if !state.store.delete_account(id).await? {
        return Err(AppError::not_found("Account not found").into());
    }

    info!("Account {} deleted by {}", id, context.account.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Account deleted")))
}
