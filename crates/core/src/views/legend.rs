use serde::{Deserialize, Serialize};
use syncline_protocol::{ColorMap, EventPair, PairKind, SharedStr};

use crate::config::TimelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Swatch {
    Dot,
    Arrow,
    Rectangle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: SharedStr,
    pub swatch: Swatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    /// One entry per event type, in color-map order.
    pub primary: Vec<LegendEntry>,
    /// One entry per pair kind present. Shown only during a hover trace.
    pub sync: Vec<LegendEntry>,
}

const SYNC_ENTRIES: [(PairKind, &str, Swatch); 3] = [
    (PairKind::SignalCreateUnlock, "Mutex signal", Swatch::Arrow),
    (PairKind::BarrierCreateWait, "Barrier signal", Swatch::Arrow),
    (PairKind::LockUnlock, "Critical section", Swatch::Rectangle),
];

pub fn build_legend(color_map: &ColorMap, pairs: &[EventPair], config: &TimelineConfig) -> Legend {
    let primary = color_map
        .iter()
        .map(|(event_type, color)| LegendEntry {
            label: capitalize(event_type),
            color: color.clone(),
            swatch: Swatch::Dot,
        })
        .collect();

    let sync = SYNC_ENTRIES
        .iter()
        .filter(|(kind, _, _)| pairs.iter().any(|p| p.kind == *kind))
        .map(|(kind, label, swatch)| LegendEntry {
            label: (*label).to_string(),
            color: color_map
                .get(kind.category())
                .cloned()
                .unwrap_or_else(|| SharedStr::from(config.neutral_color.as_str())),
            swatch: *swatch,
        })
        .collect();

    Legend { primary, sync }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
