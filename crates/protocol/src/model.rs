use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// Everything one analysis session hands to the timeline.
///
/// ```text
///   job logs ─▶ Event[] ─┬─▶ SceneBuilder ──┐
///                        └─▶ EventPair[] ─▶ PairRenderer ─▶ Scene ─▶ Adapter
///                                                                    (SVG, JSON)
/// ```
///
/// All of it is treated as immutable once loaded; only the viewport and
/// hover state change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    /// Events sorted ascending by timestamp.
    pub events: Vec<Event>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub color_map: ColorMap,
    #[serde(default)]
    pub event_pairs: Vec<EventPair>,
}

impl TimelineData {
    /// Lane label for a participant: its job short name, or the raw id.
    pub fn participant_label(&self, job_id: &str) -> SharedStr {
        self.jobs
            .iter()
            .find(|job| job.job_id == job_id)
            .map(|job| SharedStr::from(job.short_name.as_str()))
            .unwrap_or_else(|| SharedStr::from(job_id))
    }
}

/// A single timestamped line extracted from one job's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub job_id: SharedStr,
    pub timestamp: DateTime<FixedOffset>,
    /// Category, e.g. `mutex`, `barrier`, `exception`.
    #[serde(rename = "type")]
    pub event_type: SharedStr,
    /// Position of the line within its job's log.
    pub log_index: u64,
    #[serde(default)]
    pub message: String,
    /// Mutex or barrier name this event participates in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairing_key: Option<SharedStr>,
    /// Parser-level event name such as `mutex_create` or `barrier_wait`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<SharedStr>,
}

impl Event {
    pub fn key(&self) -> EventKey {
        EventKey {
            job_id: self.job_id.clone(),
            log_index: self.log_index,
        }
    }

    /// Timestamp as microseconds since the Unix epoch.
    pub fn micros(&self) -> f64 {
        self.timestamp.timestamp_micros() as f64
    }
}

/// Stable composite identity of an event across scene rebuilds.
///
/// External collaborators use the `Display` form (`"{job_id}-{log_index}"`)
/// to locate the originating log row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    pub job_id: SharedStr,
    pub log_index: u64,
}

impl std::fmt::Display for EventKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.job_id, self.log_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: SharedStr,
    pub short_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    /// A mutex created by one job and unlocked (signalled) by another.
    SignalCreateUnlock,
    /// A barrier created by one job and waited on by others.
    BarrierCreateWait,
    /// A lock held between acquire and release.
    LockUnlock,
}

impl PairKind {
    /// Color-map category the pair is drawn with.
    pub fn category(self) -> &'static str {
        match self {
            Self::SignalCreateUnlock | Self::LockUnlock => "mutex",
            Self::BarrierCreateWait => "barrier",
        }
    }
}

impl std::fmt::Display for PairKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignalCreateUnlock => write!(f, "signal_create_unlock"),
            Self::BarrierCreateWait => write!(f, "barrier_create_wait"),
            Self::LockUnlock => write!(f, "lock_unlock"),
        }
    }
}

/// Two events correlated by a shared pairing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPair {
    #[serde(rename = "pair_kind")]
    pub kind: PairKind,
    pub pairing_key: SharedStr,
    pub start_event: Event,
    pub end_event: Event,
}

impl EventPair {
    pub fn crosses_participants(&self) -> bool {
        self.start_event.job_id != self.end_event.job_id
    }
}

/// Event type → color, iterated in the order it was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(IndexMap<SharedStr, SharedStr>);

impl ColorMap {
    pub fn get(&self, event_type: &str) -> Option<&SharedStr> {
        self.0.get(event_type)
    }

    pub fn insert(&mut self, event_type: impl Into<SharedStr>, color: impl Into<SharedStr>) {
        self.0.insert(event_type.into(), color.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SharedStr, &SharedStr)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<SharedStr>, V: Into<SharedStr>> FromIterator<(K, V)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
