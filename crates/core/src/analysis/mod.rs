//! Turning per-job log entries into the timeline payload.
//!
//! These run before the engine sees any data: [`ingest`] flattens parsed job
//! logs into sorted events, [`pairing`] derives synchronization pairs from
//! them, and [`jobs`] shortens test names into lane labels.

pub mod ingest;
pub mod jobs;
pub mod pairing;

pub use ingest::{JobLog, LogEntry, timeline_events};
pub use jobs::JobNamer;
pub use pairing::find_pairs;
