//! Authentication endpoints
//!
//! Everything here is public except `/auth/me`, which sits behind the access
//! middleware. Throttling is applied by the scope.

mod cookie;
mod email;
mod login;
mod models;
mod register;
mod session;
mod token;
mod user;

pub use cookie::{REFRESH_COOKIE, REFRESH_COOKIE_PATH, clear_refresh_cookie, refresh_cookie};
pub use email::{resend_verification, verify_email};
pub use login::login;
pub use models::{
    AccessTokenResponse, LoginRequest, MessageResponse, RegisterRequest, ResendVerificationRequest,
    VerifyEmailRequest,
};
pub use register::register;
pub use session::logout;
pub use token::refresh_token;
pub use user::get_current_user;

use crate::server::middleware::{AccessMiddleware, RateLimitMiddleware, Throttle};
use actix_web::web;
use std::sync::Arc;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, throttle: Arc<Throttle>) {
    cfg.service(
        web::scope("/auth")
            .wrap(RateLimitMiddleware::new(throttle))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/refresh", web::post().to(refresh_token))
            .route("/verify-email", web::post().to(verify_email))
            .route("/resend-verification", web::post().to(resend_verification))
            .service(
                web::resource("/me")
                    .wrap(AccessMiddleware)
                    .route(web::get().to(get_current_user)),
            ),
    );
}
