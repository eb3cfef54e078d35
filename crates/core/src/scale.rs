use std::collections::{HashMap, HashSet};

use syncline_protocol::{SharedStr, TimelineData};

use crate::config::TimelineConfig;
use crate::viewport::Viewport;

/// Linear time → pixel mapping over one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    viewport: Viewport,
    width: f64,
}

impl TimeScale {
    pub fn new(viewport: Viewport, width: f64) -> Self {
        Self { viewport, width }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Map a timestamp (µs) onto `[0, width]`.
    ///
    /// A zero-length domain maps every timestamp to the middle of the plot.
    pub fn time_to_x(&self, t: f64) -> f64 {
        let duration = self.viewport.duration();
        if duration <= 0.0 {
            return self.width / 2.0;
        }
        (t - self.viewport.start) / duration * self.width
    }

    /// Inverse of [`time_to_x`](Self::time_to_x). A zero-length domain maps
    /// every column back to its single instant.
    pub fn x_to_time(&self, x: f64) -> f64 {
        let duration = self.viewport.duration();
        if duration <= 0.0 || self.width <= 0.0 {
            return self.viewport.start;
        }
        self.viewport.start + x / self.width * duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub participant: SharedStr,
    pub label: SharedStr,
}

/// Participant → lane mapping.
///
/// Built once from every event regardless of the viewport, so lanes never
/// appear, vanish or reorder while zooming.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneScale {
    lanes: Vec<Lane>,
    index: HashMap<SharedStr, usize>,
    pitch: f64,
    top: f64,
}

impl LaneScale {
    pub fn from_data(data: &TimelineData, config: &TimelineConfig) -> Self {
        let mut lanes: Vec<Lane> = Vec::new();
        let mut seen: HashSet<SharedStr> = HashSet::new();
        for event in &data.events {
            if seen.insert(event.job_id.clone()) {
                lanes.push(Lane {
                    participant: event.job_id.clone(),
                    label: data.participant_label(&event.job_id),
                });
            }
        }
        lanes.sort_by(|a, b| {
            a.label
                .cmp(&b.label)
                .then_with(|| a.participant.cmp(&b.participant))
        });

        let index = lanes
            .iter()
            .enumerate()
            .map(|(i, lane)| (lane.participant.clone(), i))
            .collect();

        Self {
            lanes,
            index,
            pitch: config.lane_pitch,
            top: config.top_offset,
        }
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn lane_of(&self, participant: &str) -> Option<usize> {
        self.index.get(participant).copied()
    }

    pub fn lane_y(&self, lane: usize) -> f64 {
        lane as f64 * self.pitch + self.top
    }

    pub fn participant_to_y(&self, participant: &str) -> Option<f64> {
        self.lane_of(participant).map(|lane| self.lane_y(lane))
    }

    pub fn label_of(&self, participant: &str) -> Option<&SharedStr> {
        self.lane_of(participant).map(|lane| &self.lanes[lane].label)
    }
}
