//! Application state shared across HTTP handlers

use crate::auth::{AccessGuard, Argon2Hasher, JwtHandler, RoutePolicy, SessionService};
use crate::config::Config;
use crate::notify::NotificationDispatcher;
use crate::server::middleware::Throttle;
use crate::storage::{CredentialStore, StorageLayer};
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Everything is wired explicitly here once at startup; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    /// Configuration (shared read-only)
    pub config: Arc<Config>,
    /// Session lifecycle
    pub session: Arc<SessionService>,
    /// Bearer token gate
    pub access_guard: Arc<AccessGuard>,
    /// Required roles per protected route
    pub route_policy: Arc<RoutePolicy>,
    /// Account store
    pub store: Arc<dyn CredentialStore>,
    /// Storage layer
    pub storage: Arc<StorageLayer>,
    /// Outgoing mail
    pub notifier: Arc<dyn NotificationDispatcher>,
    /// Throttle for the public auth endpoints
    pub throttle: Arc<Throttle>,
}

impl AppState {
    /// Wire services over a storage layer and mail dispatcher
    pub fn new(
        config: Config,
        storage: StorageLayer,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Result<Self> {
        let store = storage.credentials();
        let jwt = Arc::new(JwtHandler::new(config.auth())?);

        let session = SessionService::new(
            Arc::clone(&store),
            Arc::new(Argon2Hasher::new()),
            Arc::clone(&jwt),
            Arc::clone(&notifier),
            config.auth().verification_code_ttl,
        );
        let access_guard = AccessGuard::new(jwt, Arc::clone(&store));
        let throttle = Throttle::new(config.rate_limit());

        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(session),
            access_guard: Arc::new(access_guard),
            route_policy: Arc::new(RoutePolicy::standard()),
            store,
            storage: Arc::new(storage),
            notifier,
            throttle: Arc::new(throttle),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
