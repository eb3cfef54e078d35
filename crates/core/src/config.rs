use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layout and interaction constants for one timeline.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Container width in pixels; the plot maps time onto `[0, width]`.
    pub width: f64,
    /// Vertical distance between two lanes.
    pub lane_pitch: f64,
    /// Y of the first lane.
    pub top_offset: f64,
    /// Space below the last lane, holding the axis labels.
    pub bottom_margin: f64,
    pub marker_radius: f64,
    /// Height of a critical-section rectangle, centered on its lane.
    pub section_height: f64,
    pub dimmed_opacity: f64,
    pub emphasized_opacity: f64,
    /// Drags shorter than this (in pixels) are treated as clicks.
    pub drag_threshold: f64,
    /// Distance between the pointer and the tooltip's top-left corner.
    pub tooltip_offset: f64,
    pub axis_font_size: f64,
    /// Used for any event type missing from the color map.
    pub neutral_color: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            lane_pitch: 40.0,
            top_offset: 40.0,
            bottom_margin: 30.0,
            marker_radius: 5.0,
            section_height: 24.0,
            dimmed_opacity: 0.2,
            emphasized_opacity: 1.0,
            drag_threshold: 10.0,
            tooltip_offset: 15.0,
            axis_font_size: 11.0,
            neutral_color: "#9e9e9e".to_string(),
        }
    }
}

impl TimelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    /// Total scene height for `lanes` participants.
    pub fn scene_height(&self, lanes: usize) -> f64 {
        self.top_offset + lanes as f64 * self.lane_pitch + self.bottom_margin
    }
}
