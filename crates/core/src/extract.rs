//! Event extraction: one raw log line in, at most one [`Event`] out.
//!
//! The extractor is total. Empty lines, binary garbage, lines cut off
//! mid-write and lines from unrelated producers all yield `None`; nothing in
//! here can fail or panic.
//!
//! Grammar (case-insensitive, any whitespace run between tokens, matched
//! anywhere in the line):
//!
//! ```text
//! job <J> assigned to processor <N> [using <S>]
//! heartbeat from processor <N>
//! ```
//!
//! `<J>` and `<N>` are runs of ASCII digits, `<S>` is a run of word
//! characters and hyphens. A line containing both patterns is treated as a
//! job assignment.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Event;

/// Pattern for job assignment lines. Capture groups: job id, processor id,
/// optional strategy.
pub const JOB_ASSIGNMENT_PATTERN: &str =
    r"(?i)job\s+([0-9]+)\s+assigned\s+to\s+processor\s+([0-9]+)(?:\s+using\s+([\w-]+))?";

/// Pattern for heartbeat lines. Capture group: processor id.
pub const HEARTBEAT_PATTERN: &str = r"(?i)heartbeat\s+from\s+processor\s+([0-9]+)";

static JOB_ASSIGNMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(JOB_ASSIGNMENT_PATTERN).expect("valid regex"));

static HEARTBEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HEARTBEAT_PATTERN).expect("valid regex"));

/// Extract the event described by `line`, if any.
///
/// Ids that do not fit in a `u64` make the line unrecognized rather than
/// wrapping or saturating.
pub fn extract_event(line: &str) -> Option<Event> {
    if let Some(caps) = JOB_ASSIGNMENT_RE.captures(line) {
        let job_id = caps.get(1)?.as_str().parse().ok()?;
        let processor_id = caps.get(2)?.as_str().parse().ok()?;
        let strategy = caps.get(3).map(|m| m.as_str().to_string());
        return Some(Event::JobAssignment {
            job_id,
            processor_id,
            strategy,
        });
    }

    let caps = HEARTBEAT_RE.captures(line)?;
    let processor_id = caps.get(1)?.as_str().parse().ok()?;
    Some(Event::Heartbeat { processor_id })
}

/// Extract events from a whole log text, top to bottom.
///
/// Lines are split on `\n`; a trailing `\r` is harmless because it never
/// sits inside a match.
pub fn extract_events(text: &str) -> impl Iterator<Item = Event> + '_ {
    text.split('\n').filter_map(extract_event)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn assignment(job_id: u64, processor_id: u64, strategy: Option<&str>) -> Event {
        Event::JobAssignment {
            job_id,
            processor_id,
            strategy: strategy.map(str::to_string),
        }
    }

    #[test]
    fn heartbeat_line() {
        assert_eq!(
            extract_event("Heartbeat from processor 1"),
            Some(Event::Heartbeat { processor_id: 1 })
        );
    }

    #[test]
    fn assignment_with_strategy() {
        assert_eq!(
            extract_event("Job 5 assigned to processor 1 using round-robin"),
            Some(assignment(5, 1, Some("round-robin")))
        );
    }

    #[test]
    fn assignment_without_strategy() {
        assert_eq!(
            extract_event("Job 9 assigned to processor 3"),
            Some(assignment(9, 3, None))
        );
    }

    #[test]
    fn assignment_with_producer_annotation() {
        assert_eq!(
            extract_event("Job 4 assigned to processor 2 (Least Load: 1)"),
            Some(assignment(4, 2, None))
        );
    }

    #[test]
    fn matching_is_case_insensitive_and_whitespace_tolerant() {
        assert_eq!(
            extract_event("HEARTBEAT   from\tProcessor  12"),
            Some(Event::Heartbeat { processor_id: 12 })
        );
        assert_eq!(
            extract_event("job 7  ASSIGNED to processor 4 Using least_connection"),
            Some(assignment(7, 4, Some("least_connection")))
        );
    }

    #[test]
    fn match_anywhere_in_line() {
        assert_eq!(
            extract_event("Thu Oct  2 10:00:01 2025\n: Heartbeat from processor 3"),
            Some(Event::Heartbeat { processor_id: 3 })
        );
        assert_eq!(
            extract_event("[master] Job 1 assigned to processor 2 using round-robin."),
            Some(assignment(1, 2, Some("round-robin")))
        );
    }

    #[test]
    fn assignment_takes_precedence_over_heartbeat() {
        let line = "Heartbeat from processor 8; Job 2 assigned to processor 9";
        assert_eq!(extract_event(line), Some(assignment(2, 9, None)));
    }

    #[test]
    fn unrelated_lines_yield_nothing() {
        for line in [
            "",
            "Master started",
            "Master: Listening for heartbeats...",
            "--- Round Robin Job Assignment ---",
            "Processor 3: Sent heartbeat.",
            "Master done.",
        ] {
            assert_eq!(extract_event(line), None, "line: {line:?}");
        }
    }

    #[test]
    fn truncated_lines_yield_nothing() {
        for line in [
            "Heartbeat from proc",
            "Heartbeat from processor ",
            "Job 5 assigned to",
            "Job 5 assigned to processor",
        ] {
            assert_eq!(extract_event(line), None, "line: {line:?}");
        }
    }

    #[test]
    fn negative_and_non_numeric_ids_yield_nothing() {
        assert_eq!(extract_event("Heartbeat from processor -1"), None);
        assert_eq!(extract_event("Job x assigned to processor 1"), None);
    }

    #[test]
    fn only_ascii_digits_form_ids() {
        assert_eq!(extract_event("Heartbeat from processor \u{0663}"), None);
        assert_eq!(
            extract_event("Job \u{0661} assigned to processor 2"),
            None
        );
        // The id ends at the first non-ASCII digit.
        assert_eq!(
            extract_event("Heartbeat from processor 7\u{0663}"),
            Some(Event::Heartbeat { processor_id: 7 })
        );
    }

    #[test]
    fn id_overflow_yields_nothing() {
        assert_eq!(
            extract_event("Heartbeat from processor 99999999999999999999999"),
            None
        );
        assert_eq!(
            extract_event("Job 99999999999999999999999 assigned to processor 1"),
            None
        );
    }

    #[test]
    fn dangling_using_keeps_assignment() {
        assert_matches!(
            extract_event("Job 3 assigned to processor 1 using"),
            Some(Event::JobAssignment { strategy: None, .. })
        );
    }

    #[test]
    fn binary_garbage_never_panics() {
        let mut state: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            let mut bytes = Vec::with_capacity(64);
            for _ in 0..64 {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                bytes.push((state & 0xff) as u8);
            }
            let line = String::from_utf8_lossy(&bytes);
            let _ = extract_event(&line);
        }
    }

    #[test]
    fn extract_events_walks_lines_in_order() {
        let text = "Heartbeat from processor 1\r\nnoise\nJob 5 assigned to processor 1 using round-robin\nHeartbeat from processor 2";
        let events: Vec<_> = extract_events(text).collect();

        assert_eq!(
            events,
            vec![
                Event::Heartbeat { processor_id: 1 },
                assignment(5, 1, Some("round-robin")),
                Event::Heartbeat { processor_id: 2 },
            ]
        );
    }
}
