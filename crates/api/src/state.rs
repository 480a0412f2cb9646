use std::sync::Arc;

use fleetwatch_source::SnapshotProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Reconstructs and caches fleet snapshots from the log.
    pub provider: Arc<SnapshotProvider>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let provider = SnapshotProvider::new(config.provider_config());
        Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
        }
    }
}
