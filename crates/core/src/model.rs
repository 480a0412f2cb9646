//! Fleet state types produced by a reconstruction pass.
//!
//! [`Event`]s are transient: they exist only while a pass folds them.
//! [`ProcessorRecord`] and [`JobRecord`] live only inside a [`Snapshot`],
//! which is immutable once built and shared behind an `Arc`.

use serde::{Deserialize, Serialize};

use crate::types::{JobId, ProcessorId, Timestamp};

/// A typed event extracted from one log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `Heartbeat from processor <N>`.
    Heartbeat { processor_id: ProcessorId },
    /// `Job <J> assigned to processor <N> [using <S>]`.
    JobAssignment {
        job_id: JobId,
        processor_id: ProcessorId,
        strategy: Option<String>,
    },
}

/// Liveness and assignments of one processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorRecord {
    pub id: ProcessorId,
    /// True once any heartbeat or assignment for this id was seen in the pass.
    pub alive: bool,
    /// Assigned job ids in log order, duplicates included.
    #[serde(rename = "jobs")]
    pub job_ids: Vec<JobId>,
}

impl ProcessorRecord {
    pub fn new(id: ProcessorId) -> Self {
        Self {
            id,
            alive: true,
            job_ids: Vec::new(),
        }
    }
}

/// Job lifecycle as far as the log reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Assigned,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
        }
    }
}

/// One job assignment line, in log order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub processor_id: ProcessorId,
    pub strategy: Option<String>,
    pub status: JobStatus,
}

/// The complete reconstructed state derived from the log content at one
/// point in time.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Processors in order of first appearance.
    pub processors: Vec<ProcessorRecord>,
    /// Job assignments in log order.
    pub jobs: Vec<JobRecord>,
    /// The exact text the snapshot was built from.
    pub raw_text: String,
    pub generated_at: Timestamp,
}
