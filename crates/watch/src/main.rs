//! `fleetwatch-watch` -- terminal dashboard for the fleet monitor API.
//!
//! Polls `/processors`, `/jobs` and `/logs` on a fixed interval and redraws
//! a plain-text view. A failed poll shows an error banner and polling
//! continues.
//!
//! # Environment variables
//!
//! | Variable           | Required | Default                 | Description                    |
//! |--------------------|----------|-------------------------|--------------------------------|
//! | `MONITOR_URL`      | no       | `http://localhost:3000` | Base URL of the monitor API    |
//! | `POLL_INTERVAL_MS` | no       | `5000`                  | Milliseconds between polls     |
//! | `LOG_TAIL_LINES`   | no       | `20`                    | Raw log lines shown per frame  |

use std::sync::Arc;
use std::time::Duration;

use fleetwatch_watch::client::{MonitorClient, WatchError};
use fleetwatch_watch::poller::Poller;
use fleetwatch_watch::render;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MONITOR_URL: &str = "http://localhost:3000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
const DEFAULT_LOG_TAIL_LINES: usize = 20;

/// ANSI clear-screen + cursor-home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetwatch_watch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let monitor_url =
        std::env::var("MONITOR_URL").unwrap_or_else(|_| DEFAULT_MONITOR_URL.to_string());

    let poll_interval_ms: u64 = env_or("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);
    if poll_interval_ms == 0 {
        tracing::error!("POLL_INTERVAL_MS must be greater than zero");
        std::process::exit(1);
    }
    let log_tail_lines: usize = env_or("LOG_TAIL_LINES", DEFAULT_LOG_TAIL_LINES);

    let interval = Duration::from_millis(poll_interval_ms);

    let client = match MonitorClient::new(&monitor_url, interval) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create monitor client");
            std::process::exit(1);
        }
    };

    tracing::info!(
        monitor_url = %client.base_url(),
        poll_interval_ms,
        "Starting fleetwatch-watch",
    );

    let handle = Poller::start(interval, move || {
        let client = Arc::clone(&client);
        async move {
            match client.fetch().await {
                Ok(data) => {
                    print!("{CLEAR_SCREEN}{}", render::render(&data, log_tail_lines));
                    Ok(())
                }
                Err(e) => {
                    print!("{CLEAR_SCREEN}{}", render::render_error(&e.to_string()));
                    Err::<(), WatchError>(e)
                }
            }
        }
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
    }

    tracing::info!("Stopping poller");
    handle.stop().await;
}

/// Read and parse an env var, exiting on an unparseable value.
fn env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| {
            tracing::error!(var, value = %v, "Invalid value");
            std::process::exit(1);
        }),
        Err(_) => default,
    }
}
