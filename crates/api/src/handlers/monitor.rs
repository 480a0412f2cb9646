//! Read-only query handlers over the current fleet snapshot.
//!
//! Each handler takes exactly one snapshot from the provider and projects a
//! single field of it, so the three endpoints are always consistent with one
//! another for the same source state.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AppResult;
use crate::state::AppState;

/// Response header set when the snapshot was served from cache after a
/// source failure.
pub const SNAPSHOT_STALE_HEADER: &str = "x-snapshot-stale";

fn mark_stale(mut response: Response, stale: bool) -> Response {
    if stale {
        response.headers_mut().insert(
            HeaderName::from_static(SNAPSHOT_STALE_HEADER),
            HeaderValue::from_static("true"),
        );
    }
    response
}

// ---------------------------------------------------------------------------
// GET /processors
// ---------------------------------------------------------------------------

/// List processors in order of first appearance in the log.
pub async fn list_processors(State(state): State<AppState>) -> AppResult<Response> {
    let served = state.provider.get_snapshot().await?;
    let response = Json(&served.snapshot.processors).into_response();
    Ok(mark_stale(response, served.stale))
}

// ---------------------------------------------------------------------------
// GET /jobs
// ---------------------------------------------------------------------------

/// List job assignments in log order, duplicates included.
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Response> {
    let served = state.provider.get_snapshot().await?;
    let response = Json(&served.snapshot.jobs).into_response();
    Ok(mark_stale(response, served.stale))
}

// ---------------------------------------------------------------------------
// GET /logs
// ---------------------------------------------------------------------------

/// Return the raw log text the snapshot was built from.
pub async fn get_raw_log(State(state): State<AppState>) -> AppResult<Response> {
    let served = state.provider.get_snapshot().await?;
    let response = (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        served.snapshot.raw_text.clone(),
    )
        .into_response();
    Ok(mark_stale(response, served.stale))
}
