//! Health check endpoint

use crate::BuildInfo;
use crate::server::state::AppState;
use crate::storage::StorageHealthStatus;
use actix_web::{HttpResponse, Result as ActixResult, web};
use std::borrow::Cow;
use tracing::debug;

use super::ApiResponse;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Report liveness plus the state of the account store
///
/// Always answers 200 so load balancers can tell a running process from a
/// dead one; a failing store shows up as `degraded`.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let storage = state.storage.health_check().await;

    let build = BuildInfo::current();
    let status = HealthStatus {
        status: if storage.healthy {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("degraded")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(build.version),
        git_hash: Cow::Borrowed(build.git_hash),
        storage,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

/// Health status body
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    git_hash: Cow<'static, str>,
    storage: StorageHealthStatus,
}
