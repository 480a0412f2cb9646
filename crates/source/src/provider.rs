//! Snapshot provider: read, reconstruct, cache and serve.
//!
//! The provider holds at most one live [`Snapshot`] together with the instant
//! it was built. A request is served from that cache while it is younger than
//! the configured staleness window; otherwise the log is re-read and the cache
//! entry is replaced as a whole. Reconstructions are serialized behind a
//! single-flight guard so a burst of polls costs one read of the file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use fleetwatch_core::aggregate::reconstruct;
use fleetwatch_core::error::CoreError;
use fleetwatch_core::model::Snapshot;

use crate::read::read_log;

/// Provider settings, fixed at construction.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Location of the log written by the external system.
    pub log_path: PathBuf,
    /// Maximum age of a cached snapshot. Zero disables caching.
    pub max_staleness: Duration,
    /// Serve the last good snapshot (flagged stale) when the source fails.
    pub serve_stale_on_error: bool,
}

impl ProviderConfig {
    /// No caching, stale snapshots served on source failure.
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            max_staleness: Duration::ZERO,
            serve_stale_on_error: true,
        }
    }

    pub fn with_max_staleness(mut self, max_staleness: Duration) -> Self {
        self.max_staleness = max_staleness;
        self
    }

    pub fn with_serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }
}

/// A snapshot handed to a caller.
#[derive(Debug, Clone)]
pub struct ServedSnapshot {
    pub snapshot: Arc<Snapshot>,
    /// Set when the source failed and the last good snapshot was served instead.
    pub stale: bool,
}

struct CachedSnapshot {
    snapshot: Arc<Snapshot>,
    built_at: Instant,
    /// Incremented on every successful reconstruction.
    generation: u64,
}

/// Owns the read-and-reconstruct cycle against one log file.
///
/// Thread-safe; designed to be wrapped in `Arc` and shared by all handlers.
pub struct SnapshotProvider {
    config: ProviderConfig,
    cache: RwLock<Option<CachedSnapshot>>,
    refresh_guard: Mutex<()>,
}

impl SnapshotProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(None),
            refresh_guard: Mutex::new(()),
        }
    }

    /// Return a snapshot no older than the staleness window.
    ///
    /// Fails with [`CoreError::SourceUnavailable`] when the log cannot be read
    /// and no stale snapshot may be served.
    pub async fn get_snapshot(&self) -> Result<ServedSnapshot, CoreError> {
        let seen_generation = {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if self.is_fresh(cached) {
                    return Ok(ServedSnapshot {
                        snapshot: Arc::clone(&cached.snapshot),
                        stale: false,
                    });
                }
            }
            cache.as_ref().map(|c| c.generation)
        };

        let _guard = self.refresh_guard.lock().await;

        // A concurrent caller may have rebuilt while this one waited.
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if Some(cached.generation) != seen_generation || self.is_fresh(cached) {
                    return Ok(ServedSnapshot {
                        snapshot: Arc::clone(&cached.snapshot),
                        stale: false,
                    });
                }
            }
        }

        self.rebuild().await
    }

    /// Reconstruct now, ignoring the age of the cached snapshot.
    pub async fn refresh(&self) -> Result<ServedSnapshot, CoreError> {
        let _guard = self.refresh_guard.lock().await;
        self.rebuild().await
    }

    /// The last successfully built snapshot, without touching the source.
    pub async fn cached(&self) -> Option<Arc<Snapshot>> {
        self.cache
            .read()
            .await
            .as_ref()
            .map(|c| Arc::clone(&c.snapshot))
    }

    /// Number of successful reconstructions since the provider was created.
    pub async fn reconstructions(&self) -> u64 {
        self.cache.read().await.as_ref().map_or(0, |c| c.generation)
    }

    fn is_fresh(&self, cached: &CachedSnapshot) -> bool {
        !self.config.max_staleness.is_zero()
            && cached.built_at.elapsed() <= self.config.max_staleness
    }

    /// Caller must hold `refresh_guard`.
    async fn rebuild(&self) -> Result<ServedSnapshot, CoreError> {
        let started = Instant::now();

        let text = match read_log(&self.config.log_path).await {
            Ok(text) => text,
            Err(err) => return self.fall_back(err).await,
        };
        let bytes = text.len();

        let snapshot = tokio::task::spawn_blocking(move || reconstruct(text))
            .await
            .map_err(|e| CoreError::Internal(format!("Reconstruction task failed: {e}")))?;
        let snapshot = Arc::new(snapshot);

        tracing::debug!(
            path = %self.config.log_path.display(),
            bytes,
            processors = snapshot.processors.len(),
            jobs = snapshot.jobs.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Reconstructed snapshot from log",
        );

        let mut cache = self.cache.write().await;
        let generation = cache.as_ref().map_or(0, |c| c.generation) + 1;
        *cache = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            built_at: Instant::now(),
            generation,
        });

        Ok(ServedSnapshot {
            snapshot,
            stale: false,
        })
    }

    async fn fall_back(&self, err: CoreError) -> Result<ServedSnapshot, CoreError> {
        if !self.config.serve_stale_on_error {
            return Err(err);
        }

        match self.cached().await {
            Some(snapshot) => {
                tracing::warn!(
                    error = %err,
                    generated_at = %snapshot.generated_at,
                    "Log source unavailable, serving stale snapshot",
                );
                Ok(ServedSnapshot {
                    snapshot,
                    stale: true,
                })
            }
            None => Err(err),
        }
    }
}
