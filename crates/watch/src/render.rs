//! Plain-text rendering of a dashboard frame.

use std::fmt::Write;

use crate::client::DashboardData;

/// Render processors, the job table and the last `log_tail_lines` log lines.
pub fn render(data: &DashboardData, log_tail_lines: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Distributed System Monitor");
    let _ = writeln!(
        out,
        "Updated {}{}",
        data.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
        if data.stale {
            "  [STALE: log source unavailable]"
        } else {
            ""
        }
    );
    out.push('\n');

    render_processors(&mut out, data);
    out.push('\n');
    render_jobs(&mut out, data);
    out.push('\n');
    render_log_tail(&mut out, &data.logs, log_tail_lines);

    out
}

/// Render the non-fatal banner shown when a poll fails.
pub fn render_error(message: &str) -> String {
    format!("Error: {message}\n(retrying on next poll)\n")
}

fn render_processors(out: &mut String, data: &DashboardData) {
    let _ = writeln!(
        out,
        "Processor Status ({} alive / {} total)",
        data.processors.iter().filter(|p| p.alive).count(),
        data.processors.len()
    );

    if data.processors.is_empty() {
        let _ = writeln!(out, "  No processor data found.");
        return;
    }

    for processor in &data.processors {
        let status = if processor.alive { "Alive" } else { "Dead" };
        let jobs = if processor.job_ids.is_empty() {
            "None".to_string()
        } else {
            processor
                .job_ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            out,
            "  Processor #{:<4} {:<6} Jobs: {jobs}",
            processor.id, status
        );
        for job in data.jobs_for(processor.id) {
            let _ = writeln!(
                out,
                "    Job #{} - Strategy: {} - Status: {}",
                job.id,
                job.strategy.as_deref().unwrap_or("N/A"),
                job.status.as_str()
            );
        }
    }
}

fn render_jobs(out: &mut String, data: &DashboardData) {
    let _ = writeln!(out, "Job Assignments");

    if data.jobs.is_empty() {
        let _ = writeln!(out, "  No jobs found.");
        return;
    }

    let _ = writeln!(
        out,
        "  {:<8} {:<10} {:<20} {}",
        "Job ID", "Processor", "Strategy", "Status"
    );
    for job in &data.jobs {
        let _ = writeln!(
            out,
            "  {:<8} {:<10} {:<20} {}",
            job.id,
            job.processor_id,
            job.strategy.as_deref().unwrap_or("N/A"),
            job.status.as_str()
        );
    }
}

fn render_log_tail(out: &mut String, logs: &str, tail: usize) {
    let _ = writeln!(out, "Raw Logs (last {tail} lines)");

    let lines: Vec<&str> = logs.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        let _ = writeln!(out, "  No logs available");
        return;
    }

    for line in &lines[lines.len().saturating_sub(tail)..] {
        let _ = writeln!(out, "  {line}");
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use fleetwatch_core::model::{JobRecord, JobStatus, ProcessorRecord};

    use super::*;

    fn sample() -> DashboardData {
        DashboardData {
            processors: vec![
                ProcessorRecord {
                    id: 1,
                    alive: true,
                    job_ids: vec![5],
                },
                ProcessorRecord {
                    id: 2,
                    alive: true,
                    job_ids: vec![],
                },
            ],
            jobs: vec![JobRecord {
                id: 5,
                processor_id: 1,
                strategy: Some("round-robin".into()),
                status: JobStatus::Assigned,
            }],
            logs: "Heartbeat from processor 1\n\
                   Job 5 assigned to processor 1 using round-robin\n\
                   Heartbeat from processor 2\n"
                .into(),
            stale: false,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn renders_processor_cards_with_jobs() {
        let text = render(&sample(), 10);

        assert!(text.contains("Processor Status (2 alive / 2 total)"));
        assert!(text.contains("Jobs: 5"));
        assert!(text.contains("Jobs: None"));
        assert!(text.contains("Job #5 - Strategy: round-robin - Status: assigned"));
    }

    #[test]
    fn missing_strategy_renders_as_na() {
        let mut data = sample();
        data.jobs[0].strategy = None;

        let text = render(&data, 10);

        assert!(text.contains("Strategy: N/A"));
    }

    #[test]
    fn empty_frame_renders_placeholders() {
        let data = DashboardData {
            processors: vec![],
            jobs: vec![],
            logs: String::new(),
            stale: false,
            fetched_at: Utc::now(),
        };

        let text = render(&data, 10);

        assert!(text.contains("No processor data found."));
        assert!(text.contains("No jobs found."));
        assert!(text.contains("No logs available"));
    }

    #[test]
    fn log_tail_keeps_last_lines() {
        let text = render(&sample(), 1);

        assert!(text.contains("  Heartbeat from processor 2"));
        assert!(!text.contains("  Heartbeat from processor 1\n"));
    }

    #[test]
    fn stale_frame_is_flagged() {
        let mut data = sample();
        data.stale = true;

        assert!(render(&data, 5).contains("[STALE"));
    }

    #[test]
    fn error_banner_mentions_retry() {
        let banner = render_error("connection refused");
        assert!(banner.starts_with("Error: connection refused"));
        assert!(banner.contains("retrying"));
    }
}
