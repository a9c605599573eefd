//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, CorsConfig, ServerConfig};
use crate::notify::build_dispatcher;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::StorageLayer;
use crate::utils::error::{AppError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    ///
    /// Opens storage, runs migrations and wires the application state.
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let storage = StorageLayer::new(config.storage()).await?;
        storage.migrate().await?;

        let notifier = build_dispatcher(config.mail(), config.auth().verification_code_ttl)?;
        let state = AppState::new(config.clone(), storage, notifier)?;

        Ok(Self {
            config: config.server().clone(),
            state,
        })
    }

    /// Create a server over already wired state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.server().clone(),
            state,
        }
    }

    /// Build CORS middleware from configuration
    fn build_cors(cors_config: &CorsConfig) -> Cors {
        if !cors_config.enabled {
            return Cors::default();
        }

        let mut cors = Cors::default();
        if cors_config.allows_all_origins() {
            cors = cors.allow_any_origin();
        } else {
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        let methods: Vec<actix_web::http::Method> = cors_config
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if !methods.is_empty() {
            cors = cors.allowed_methods(methods);
        }

        cors = cors
            .allowed_headers([
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(cors_config.max_age);

        if cors_config.allow_credentials {
            cors = cors.supports_credentials();
        }
        cors
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors = Self::build_cors(&state.config.server().cors);
        let throttle = Arc::clone(&state.throttle);
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| AppError::bad_request(err.to_string()).into());

        App::new()
            .app_data(state)
            .app_data(json_config)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "sociapp")))
            .configure(move |cfg| routes::configure_routes(cfg, throttle))
    }

    /// Periodically delete registrations whose code expired unused
    fn spawn_purge_task(&self) {
        let Some(secs) = self.state.config.auth().purge_interval_secs else {
            return;
        };

        let session = Arc::clone(&self.state.session);
        info!("Expired registration sweep every {}s", secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                match session.purge_expired_registrations().await {
                    Ok(0) => {}
                    Ok(count) => info!("Purged {} expired registrations", count),
                    Err(e) => error!("Expired registration sweep failed: {}", e),
                }
            }
        });
    }

    /// Periodically forget clients whose throttle budget has refilled
    fn spawn_throttle_prune_task(&self) {
        if !self.state.throttle.is_enabled() {
            return;
        }

        let throttle = Arc::clone(&self.state.throttle);
        let secs = self.state.config.rate_limit().window_secs.max(1);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                throttle.prune();
                debug!("Throttle tracking {} clients", throttle.tracked_clients());
            }
        });
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;

        if self.config.cors.allows_all_origins() {
            warn!("CORS allows every origin");
        }
        self.spawn_purge_task();
        self.spawn_throttle_prune_task();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(self.config.worker_count())
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .shutdown_timeout(30)
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
