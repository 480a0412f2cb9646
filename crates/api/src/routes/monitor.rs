use axum::routing::get;
use axum::Router;

use crate::handlers::monitor;
use crate::state::AppState;

/// Read-only fleet routes.
///
/// Mounted at the root and again under `/api`, the prefix browser
/// dashboards poll.
///
/// ```text
/// GET /processors -> list_processors
/// GET /jobs       -> list_jobs
/// GET /logs       -> get_raw_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/processors", get(monitor::list_processors))
        .route("/jobs", get(monitor::list_jobs))
        .route("/logs", get(monitor::get_raw_log))
}
