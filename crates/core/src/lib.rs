//! Pure reconstruction logic for the fleet monitor.
//!
//! Turns raw log text into typed [`model::Event`]s and folds them into an
//! immutable [`model::Snapshot`]. Nothing in this crate performs I/O; the
//! `fleetwatch-source` crate owns reading the log and caching snapshots.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod model;
pub mod types;
