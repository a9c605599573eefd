//! Current account endpoint

use crate::auth::AuthContext;
use crate::models::PublicAccount;
use actix_web::{HttpResponse, Result as ActixResult, web};

/// Return the authenticated account without its password hash
pub async fn get_current_user(context: web::ReqData<AuthContext>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(PublicAccount::from(&context.account)))
}
