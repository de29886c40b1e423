//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::{GatewayConfig, TablesLocation};
use crate::domain::ConnectionRegistry;
use crate::service::CommandDispatcher;
use crate::tables::{
    LocalTableSource, LookupTableCache, LookupTableSource, ModeResolver, RemoteTableSource,
};
use crate::ws::connection::ConnectionSettings;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Command dispatch for the HTTP command endpoints.
    pub dispatcher: Arc<CommandDispatcher>,
    /// Device connections; written only by the WebSocket lifecycle.
    pub registry: Arc<ConnectionRegistry>,
    /// Lookup table cache, flushed by the admin endpoint.
    pub cache: Arc<LookupTableCache>,
    /// Shared secret for the cache flush. `None` disables flushing.
    pub admin_password: Option<Arc<str>>,
    /// Per-connection settings for device sockets.
    pub connection: ConnectionSettings,
}

impl AppState {
    /// Wires registry, cache, resolver, and dispatcher from `config`.
    ///
    /// The cache is created empty here and lives as long as the state.
    ///
    /// # Errors
    ///
    /// Returns a [`reqwest::Error`] if the remote table client cannot be built.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let source = match &config.tables {
            TablesLocation::Local(dir) => LookupTableSource::Local(LocalTableSource::new(dir)),
            TablesLocation::Remote(template) => LookupTableSource::Remote(RemoteTableSource::new(
                template.clone(),
                config.tables_fetch_timeout,
            )?),
        };
        let connection = ConnectionSettings {
            outbound_capacity: config.device_outbound_capacity,
            echo_enabled: config.device_echo_enabled,
            ping_interval: config.ws_ping_interval,
            ping_timeout: config.ws_ping_timeout,
        };
        Ok(Self::new(
            source,
            config.admin_password.as_deref(),
            config.device_send_timeout,
            connection,
        ))
    }

    /// Builds state around an explicit table source.
    #[must_use]
    pub fn new(
        source: LookupTableSource,
        admin_password: Option<&str>,
        send_timeout: std::time::Duration,
        connection: ConnectionSettings,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let cache = Arc::new(LookupTableCache::new());
        let resolver = Arc::new(ModeResolver::new(Arc::clone(&cache), source));
        let dispatcher = Arc::new(CommandDispatcher::new(
            Arc::clone(&registry),
            resolver,
            send_timeout,
        ));
        Self {
            dispatcher,
            registry,
            cache,
            admin_password: admin_password.map(Arc::from),
            connection,
        }
    }
}
