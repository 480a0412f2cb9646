use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the log is readable, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the log source could be read just now.
    pub source_available: bool,
    /// Processor count of the freshest available snapshot.
    pub processors: usize,
    /// Job count of the freshest available snapshot.
    pub jobs: usize,
    /// When that snapshot was built, if one exists.
    pub generated_at: Option<String>,
    /// Successful reconstructions since startup.
    pub reconstructions: u64,
}

/// GET /health -- forces a reconstruction and reports source health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (source_available, snapshot) = match state.provider.refresh().await {
        Ok(served) => (!served.stale, Some(served.snapshot)),
        Err(_) => (false, state.provider.cached().await),
    };

    let status = if source_available { "ok" } else { "degraded" };
    let reconstructions = state.provider.reconstructions().await;

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        source_available,
        processors: snapshot.as_ref().map_or(0, |s| s.processors.len()),
        jobs: snapshot.as_ref().map_or(0, |s| s.jobs.len()),
        generated_at: snapshot.map(|s| s.generated_at.to_rfc3339()),
        reconstructions,
    })
}

/// Mount health check routes (root level only).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
