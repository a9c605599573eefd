//! Rate limiting middleware

use crate::config::RateLimitConfig;
use crate::server::middleware::helpers::{client_key, is_throttled_route, route_pattern};
use crate::utils::error::AppError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures::future::{Ready, ready};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Per-client request budget
///
/// A client may burst up to `requests` calls and regains one call every
/// `window / requests`.
pub struct Throttle {
    limiter: Option<DefaultKeyedRateLimiter<String>>,
}

impl Throttle {
    /// Build from configuration; a disabled config never throttles
    pub fn new(config: &RateLimitConfig) -> Self {
        let limiter = if config.enabled {
            NonZeroU32::new(config.requests).and_then(|burst| {
                let period = Duration::from_secs(config.window_secs) / burst.get();
                Quota::with_period(period).map(|q| RateLimiter::keyed(q.allow_burst(burst)))
            })
        } else {
            None
        };

        Self { limiter }
    }

    /// Spend one request of `key`'s budget
    pub fn check(&self, key: &str) -> crate::utils::error::Result<()> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        limiter.check_key(&key.to_string()).map_err(|_| {
            warn!("Rate limit exceeded for client {}", key);
            AppError::rate_limit("Too many requests, please try again later")
        })
    }

    /// Drop clients whose budget has fully refilled
    pub fn prune(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }

    /// Whether throttling is active
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

/// Rate limit middleware for Actix-web
pub struct RateLimitMiddleware {
    throttle: Arc<Throttle>,
}

impl RateLimitMiddleware {
    pub fn new(throttle: Arc<Throttle>) -> Self {
        Self { throttle }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            throttle: Arc::clone(&self.throttle),
        }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: S,
    throttle: Arc<Throttle>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let throttled = route_pattern(&req).is_some_and(|pattern| is_throttled_route(&pattern));
        if throttled {
            if let Err(e) = self.throttle.check(&client_key(&req)) {
                return Box::pin(async move { Err(actix_web::Error::from(e)) });
            }
        }

        Box::pin(self.service.call(req))
    }
}
