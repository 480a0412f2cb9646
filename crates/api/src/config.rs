use std::path::PathBuf;
use std::time::Duration;

use fleetwatch_source::ProviderConfig;

/// Startup configuration failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Invalid CORS origin {0:?}")]
    InvalidOrigin(String),
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to the MPI master in
/// local development. Override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Log written by the external distributed system.
    pub log_file_path: PathBuf,
    /// Snapshot cache window in milliseconds; `0` rebuilds on every request.
    pub max_staleness_ms: u64,
    /// Serve the last good snapshot when the log becomes unreadable.
    pub serve_stale_on_error: bool,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            log_file_path: PathBuf::from("./logs/mpi.log"),
            max_staleness_ms: 0,
            serve_stale_on_error: true,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `HOST`                 | `0.0.0.0`        |
    /// | `PORT`                 | `3000`           |
    /// | `LOG_FILE_PATH`        | `./logs/mpi.log` |
    /// | `MAX_STALENESS_MS`     | `0`              |
    /// | `SERVE_STALE_ON_ERROR` | `true`           |
    /// | `CORS_ORIGINS`         | any origin       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(v) => parse_var("PORT", "a valid u16", v)?,
            None => defaults.port,
        };

        let log_file_path = lookup("LOG_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file_path);

        let max_staleness_ms = match lookup("MAX_STALENESS_MS") {
            Some(v) => parse_var("MAX_STALENESS_MS", "a valid u64", v)?,
            None => defaults.max_staleness_ms,
        };

        let serve_stale_on_error = match lookup("SERVE_STALE_ON_ERROR") {
            Some(v) => parse_bool("SERVE_STALE_ON_ERROR", v)?,
            None => defaults.serve_stale_on_error,
        };

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty() && s != "*")
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| axum::http::HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::InvalidOrigin(bad.clone()));
        }

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => parse_var("REQUEST_TIMEOUT_SECS", "a valid u64", v)?,
            None => defaults.request_timeout_secs,
        };

        Ok(Self {
            host,
            port,
            log_file_path,
            max_staleness_ms,
            serve_stale_on_error,
            cors_origins,
            request_timeout_secs,
        })
    }

    /// Snapshot provider settings derived from this configuration.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(self.log_file_path.clone())
            .with_max_staleness(Duration::from_millis(self.max_staleness_ms))
            .with_serve_stale_on_error(self.serve_stale_on_error)
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value,
    })
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "a boolean",
            value,
        }),
    }
}
