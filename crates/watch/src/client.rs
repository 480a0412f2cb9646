//! HTTP client for the monitor API.
//!
//! [`MonitorClient::fetch`] requests `/processors`, `/jobs` and `/logs`
//! concurrently and succeeds only if all three do, so a rendered frame never
//! mixes fresh and failed data.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use fleetwatch_core::model::{JobRecord, ProcessorRecord};
use fleetwatch_core::types::Timestamp;

/// Response header the API sets when it served a stale snapshot.
const SNAPSHOT_STALE_HEADER: &str = "x-snapshot-stale";

/// Errors surfaced by a poll.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
}

/// Error body produced by the API (`{ "error": ..., "code": ... }`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Everything one dashboard frame needs.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub processors: Vec<ProcessorRecord>,
    pub jobs: Vec<JobRecord>,
    pub logs: String,
    /// Any of the three responses was served from a stale snapshot.
    pub stale: bool,
    pub fetched_at: Timestamp,
}

impl DashboardData {
    /// Jobs whose home processor is `processor_id`, in log order.
    pub fn jobs_for(&self, processor_id: u64) -> impl Iterator<Item = &JobRecord> {
        self.jobs
            .iter()
            .filter(move |j| j.processor_id == processor_id)
    }
}

/// Thin wrapper over `reqwest` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: String,
}

impl MonitorClient {
    /// Create a client for `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WatchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WatchError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch processors, jobs and raw log concurrently.
    pub async fn fetch(&self) -> Result<DashboardData, WatchError> {
        let (processors, jobs, logs) =
            tokio::try_join!(self.processors(), self.jobs(), self.logs())?;

        Ok(DashboardData {
            stale: processors.1 || jobs.1 || logs.1,
            processors: processors.0,
            jobs: jobs.0,
            logs: logs.0,
            fetched_at: Utc::now(),
        })
    }

    /// `GET /processors`, with the stale flag.
    pub async fn processors(&self) -> Result<(Vec<ProcessorRecord>, bool), WatchError> {
        self.get_json("/processors").await
    }

    /// `GET /jobs`, with the stale flag.
    pub async fn jobs(&self) -> Result<(Vec<JobRecord>, bool), WatchError> {
        self.get_json("/jobs").await
    }

    /// `GET /logs`, with the stale flag.
    pub async fn logs(&self) -> Result<(String, bool), WatchError> {
        let (response, url) = self.get("/logs").await?;
        let stale = is_stale(&response);
        let text = response
            .text()
            .await
            .map_err(|source| WatchError::Transport { url, source })?;
        Ok((text, stale))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<(T, bool), WatchError> {
        let (response, url) = self.get(path).await?;
        let stale = is_stale(&response);
        let body = response
            .json()
            .await
            .map_err(|source| WatchError::Transport { url, source })?;
        Ok((body, stale))
    }

    /// Send a GET and turn non-success statuses into [`WatchError::Status`].
    async fn get(&self, path: &str) -> Result<(reqwest::Response, String), WatchError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| WatchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok((response, url));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or(text);
        Err(WatchError::Status {
            url,
            status: status.as_u16(),
            message,
        })
    }
}

fn is_stale(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(SNAPSHOT_STALE_HEADER)
        .and_then(|v| v.to_str().ok())
        == Some("true")
}
