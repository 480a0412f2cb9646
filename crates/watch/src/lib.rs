//! `fleetwatch-watch` library crate.
//!
//! Terminal counterpart of the fleet dashboard: polls the monitor API on a
//! fixed interval and renders processors, jobs and the log tail. The binary
//! entrypoint lives in `main.rs`.

pub mod client;
pub mod poller;
pub mod render;
