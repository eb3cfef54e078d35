use chrono::DateTime;
use serde::{Deserialize, Serialize};
use syncline_protocol::{Event, SharedStr};

use crate::error::{Error, Result};

/// The parsed log of one job, as produced by the log parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLog {
    pub job_id: SharedStr,
    /// Set when the job's log could not be fetched or parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 timestamp. Entries without one never reach the timeline.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: Option<SharedStr>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub pairing_key: Option<SharedStr>,
    #[serde(default)]
    pub event_name: Option<SharedStr>,
}

/// Flatten job logs into timeline events sorted by timestamp.
///
/// Jobs with an error and entries without a timestamp are skipped.
/// `log_index` is the entry's position within its job's log, so skipped
/// entries still take up an index. The sort is stable: events sharing a
/// timestamp keep job order, then log order.
pub fn timeline_events(logs: &[JobLog]) -> Result<Vec<Event>> {
    let mut events = Vec::new();

    for log in logs {
        if let Some(error) = &log.error {
            tracing::warn!(job_id = %log.job_id, error, "skipping job with errors");
            continue;
        }
        for (index, entry) in log.entries.iter().enumerate() {
            let Some(raw) = entry.timestamp.as_deref() else {
                continue;
            };
            let timestamp =
                DateTime::parse_from_rfc3339(raw).map_err(|source| Error::InvalidTimestamp {
                    job_id: log.job_id.to_string(),
                    index,
                    value: raw.to_string(),
                    source,
                })?;
            events.push(Event {
                job_id: log.job_id.clone(),
                timestamp,
                event_type: entry
                    .event_type
                    .clone()
                    .unwrap_or_else(|| SharedStr::from("unknown")),
                log_index: index as u64,
                message: entry.message.clone(),
                pairing_key: entry.pairing_key.clone(),
                event_name: entry.event_name.clone(),
            });
        }
    }

    events.sort_by_key(|event| event.timestamp);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: Option<&str>, event_type: Option<&str>) -> LogEntry {
        LogEntry {
            timestamp: timestamp.map(String::from),
            event_type: event_type.map(SharedStr::from),
            message: "line".into(),
            ..LogEntry::default()
        }
    }

    #[test]
    fn flattens_and_sorts_across_jobs() {
        let logs = [
            JobLog {
                job_id: "101".into(),
                error: None,
                entries: vec![
                    entry(Some("2025-09-01T10:00:02Z"), Some("mutex")),
                    entry(None, Some("exception")),
                    entry(Some("2025-09-01T10:00:04Z"), None),
                ],
            },
            JobLog {
                job_id: "102".into(),
                error: None,
                entries: vec![entry(Some("2025-09-01T12:00:03+02:00"), Some("barrier"))],
            },
        ];

        let events = timeline_events(&logs).expect("timestamps parse");
        let order: Vec<(&str, u64)> = events
            .iter()
            .map(|e| (e.job_id.as_str(), e.log_index))
            .collect();
        assert_eq!(order, [("101", 0), ("102", 0), ("101", 2)]);
        assert_eq!(events[2].event_type, "unknown");
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let logs = [JobLog {
            job_id: "7".into(),
            error: None,
            entries: vec![
                entry(Some("2025-09-01T10:00:00Z"), Some("a")),
                entry(Some("2025-09-01T10:00:00Z"), Some("b")),
            ],
        }];
        let events = timeline_events(&logs).expect("timestamps parse");
        assert_eq!(events[0].event_type, "a");
        assert_eq!(events[1].event_type, "b");
    }

    #[test]
    fn job_log_needs_only_a_job_id() {
        let logs: Vec<JobLog> =
            serde_json::from_str(r#"[{"job_id": "7"}, {"job_id": "8", "error": "gone"}]"#)
                .expect("minimal job logs parse");
        assert_eq!(logs[0].job_id, "7");
        assert!(logs[0].entries.is_empty());
        assert_eq!(logs[0].error, None);
        assert_eq!(logs[1].error.as_deref(), Some("gone"));

        let json = serde_json::to_string(&logs[0]).expect("serializes");
        assert_eq!(json, r#"{"job_id":"7","entries":[]}"#);
    }

    #[test]
    fn failed_jobs_are_skipped() {
        let logs = [JobLog {
            job_id: "9".into(),
            error: Some("404 Not Found".into()),
            entries: vec![entry(Some("2025-09-01T10:00:00Z"), Some("mutex"))],
        }];
        assert!(timeline_events(&logs).expect("nothing to parse").is_empty());
    }

    #[test]
    fn bad_timestamp_names_job_and_entry() {
        let logs = [JobLog {
            job_id: "5".into(),
            error: None,
            entries: vec![entry(None, None), entry(Some("yesterday"), None)],
        }];
        let err = timeline_events(&logs).expect_err("timestamp is invalid");
        assert!(matches!(
            err,
            Error::InvalidTimestamp { ref job_id, index: 1, ref value, .. }
                if job_id == "5" && value == "yesterday"
        ));
    }
}
