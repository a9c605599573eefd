//! Access middleware: Access Guard then Role Guard, per request

use crate::auth::{INSUFFICIENT_ROLE, RoleGuard};
use crate::server::AppState;
use crate::server::middleware::helpers::{authorization_header, route_pattern};
use crate::utils::error::AppError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{HttpMessage, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn};

/// Rejects requests without a valid bearer token or the route's required role
///
/// Routes missing from the role table are rejected. On success the resolved [`crate::auth::AuthContext`] is stored in the
/// request extensions for handlers.
pub struct AccessMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AccessMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AccessMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for access middleware
pub struct AccessMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::internal("Application state not configured"))?;

            let header = authorization_header(req.headers()).map(str::to_owned);
            let context = state.access_guard.authenticate(header.as_deref()).await?;

            let pattern = route_pattern(&req);
            let Some(required) = pattern
                .as_deref()
                .and_then(|p| state.route_policy.required_roles(req.method().as_str(), p))
            else {
                warn!(
                    "No role rule for {} {}, denying access",
                    req.method(),
                    req.match_info().as_str()
                );
                return Err(actix_web::Error::from(AppError::forbidden(INSUFFICIENT_ROLE)));
            };
            RoleGuard::check(Some(&context), required)?;

            debug!(
                "Access granted to account {} for {} {}",
                context.account.id,
                req.method(),
                pattern.as_deref().unwrap_or_default()
            );
            req.extensions_mut().insert(context);

            service.call(req).await
        })
    }
}
