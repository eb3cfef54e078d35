use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;
use syncline_core::analysis::{JobLog, JobNamer, find_pairs, timeline_events};
use syncline_core::timeline::parse_timeline;
use syncline_protocol::{ColorMap, TimelineData};

/// Parsed job logs straight from the log parser, before correlation.
#[derive(Debug, Deserialize)]
struct JobRun {
    logs: Vec<JobLog>,
    /// Full test name per job id, shortened into lane labels.
    #[serde(default)]
    test_names: BTreeMap<String, String>,
    #[serde(default)]
    color_map: ColorMap,
}

pub struct LoadOptions<'a> {
    pub job_logs: bool,
    pub name_patterns: &'a [String],
    pub derive_pairs: bool,
}

pub fn load(path: &Path, options: &LoadOptions<'_>) -> Result<TimelineData> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut data = if options.job_logs {
        from_job_logs(&json, options.name_patterns)
            .with_context(|| format!("failed to correlate job logs in {}", path.display()))?
    } else {
        parse_timeline(&json).with_context(|| format!("failed to parse {}", path.display()))?
    };

    if options.derive_pairs && !options.job_logs {
        let (pairs, considered) = find_pairs(&data.events);
        tracing::info!(pairs = pairs.len(), considered, "re-derived event pairs");
        data.event_pairs = pairs;
    }
    Ok(data)
}

fn from_job_logs(json: &str, name_patterns: &[String]) -> Result<TimelineData> {
    let run: JobRun = serde_json::from_str(json).context("invalid job log document")?;
    let namer = JobNamer::new(name_patterns)?;

    let events = timeline_events(&run.logs)?;
    let (event_pairs, considered) = find_pairs(&events);
    tracing::info!(
        events = events.len(),
        pairs = event_pairs.len(),
        considered,
        "correlated job logs"
    );

    let jobs = run
        .logs
        .iter()
        .filter(|log| log.error.is_none())
        .map(|log| {
            let test_name = run
                .test_names
                .get(log.job_id.as_str())
                .map_or("", String::as_str);
            namer.job(log.job_id.clone(), test_name)
        })
        .collect();

    Ok(TimelineData {
        events,
        jobs,
        color_map: run.color_map,
        event_pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncline_protocol::SharedStr;

    #[test]
    fn job_logs_are_correlated_and_named() {
        let json = r##"{
            "logs": [
                {"job_id": "1", "entries": [
                    {"timestamp": "2025-09-01T10:00:00Z", "type": "mutex",
                     "pairing_key": "ready", "event_name": "mutex_create"}
                ]},
                {"job_id": "2", "entries": [
                    {"timestamp": "2025-09-01T10:00:03Z", "type": "mutex",
                     "pairing_key": "ready", "event_name": "mutex_unlock"}
                ]},
                {"job_id": "3", "error": "log not found"}
            ],
            "test_names": {"1": "mm-support_server", "2": ""},
            "color_map": {"mutex": "#e63946"}
        }"##;
        let data = from_job_logs(json, &[r"^mm-(?P<name>.+)$".to_string()])
            .expect("document correlates");

        assert_eq!(data.events.len(), 2);
        assert_eq!(data.event_pairs.len(), 1);
        let names: Vec<&str> = data.jobs.iter().map(|j| j.short_name.as_str()).collect();
        assert_eq!(names, ["support_server", "Unknown Name"]);
        assert_eq!(data.color_map.get("mutex").map(SharedStr::as_str), Some("#e63946"));
    }
}
