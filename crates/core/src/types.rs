/// Processor identifier as it appears in the log (`processor <N>`).
pub type ProcessorId = u64;

/// Job identifier as it appears in the log (`Job <J>`).
pub type JobId = u64;

/// Shared timestamp type.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
