#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use fleetwatch_api::app::build_app;
use fleetwatch_api::config::ServerConfig;
use fleetwatch_api::state::AppState;

/// The three-line log from the operator runbook: two heartbeats around one
/// round-robin assignment.
pub const SCENARIO_A: &str = "Heartbeat from processor 1\n\
                              Job 5 assigned to processor 1 using round-robin\n\
                              Heartbeat from processor 2\n";

/// Build a test `ServerConfig` reading `log_file_path`.
///
/// No caching, stale serving enabled, any CORS origin.
pub fn test_config(log_file_path: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        log_file_path: log_file_path.to_path_buf(),
        ..ServerConfig::default()
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(config: ServerConfig) -> Router {
    build_app(AppState::new(config))
}

/// Write `content` to `mpi.log` in a fresh temp dir.
pub fn write_log(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mpi.log");
    std::fs::write(&path, content).expect("write log");
    (dir, path)
}

/// Send a GET request with an empty body.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    app.oneshot(request).await.expect("infallible router")
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// Collect a response body into a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}
