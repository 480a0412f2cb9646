//! Log source access and snapshot serving.
//!
//! [`read_log`] performs one scoped read of the log file. [`SnapshotProvider`]
//! turns that text into a [`Snapshot`](fleetwatch_core::model::Snapshot),
//! caches the last good one and serializes concurrent reconstructions.

pub mod provider;
pub mod read;

pub use provider::{ProviderConfig, ServedSnapshot, SnapshotProvider};
pub use read::read_log;
