//! State aggregation: fold an ordered event sequence into fleet state.
//!
//! Pure logic. The fold is a function of the event sequence alone, so
//! byte-identical log content always yields identical processors and jobs.
//! Each event costs O(1) amortized, keeping a pass linear in log size.

use chrono::Utc;
use indexmap::IndexMap;

use crate::extract::extract_events;
use crate::model::{Event, JobRecord, JobStatus, ProcessorRecord, Snapshot};
use crate::types::ProcessorId;

/// Incremental fold state for one reconstruction pass.
#[derive(Debug, Default)]
pub struct Aggregator {
    processors: IndexMap<ProcessorId, ProcessorRecord>,
    jobs: Vec<JobRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Heartbeat { processor_id } => {
                self.processors
                    .entry(processor_id)
                    .or_insert_with(|| ProcessorRecord::new(processor_id))
                    .alive = true;
            }
            Event::JobAssignment {
                job_id,
                processor_id,
                strategy,
            } => {
                // An assignment proves the processor was reachable.
                self.processors
                    .entry(processor_id)
                    .or_insert_with(|| ProcessorRecord::new(processor_id))
                    .job_ids
                    .push(job_id);
                self.jobs.push(JobRecord {
                    id: job_id,
                    processor_id,
                    strategy,
                    status: JobStatus::Assigned,
                });
            }
        }
    }

    /// Processors in first-insertion order and jobs in log order.
    pub fn finish(self) -> (Vec<ProcessorRecord>, Vec<JobRecord>) {
        (self.processors.into_values().collect(), self.jobs)
    }
}

/// Fold `events` (in log order) into processors and jobs.
pub fn fold_events<I>(events: I) -> (Vec<ProcessorRecord>, Vec<JobRecord>)
where
    I: IntoIterator<Item = Event>,
{
    let mut aggregator = Aggregator::new();
    for event in events {
        aggregator.apply(event);
    }
    aggregator.finish()
}

/// Build a complete [`Snapshot`] from raw log text.
pub fn reconstruct(raw_text: String) -> Snapshot {
    let (processors, jobs) = fold_events(extract_events(&raw_text));
    Snapshot {
        processors,
        jobs,
        raw_text,
        generated_at: Utc::now(),
    }
}
