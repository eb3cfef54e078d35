use serde::{Deserialize, Serialize};

use crate::model::{EventKey, PairKind};
use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, immutable visual primitive.
///
/// The engine rebuilds the complete `Vec<Primitive>` on every viewport or
/// hover change. Adapters consume it in order: later primitives paint over
/// earlier ones and win hit-tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Horizontal guide for one participant, spanning the full plot width.
    Lifeline {
        participant: SharedStr,
        label: SharedStr,
        from: Point,
        to: Point,
    },

    /// One event. `source` indexes the event list the scene was built from.
    Marker {
        key: EventKey,
        source: usize,
        center: Point,
        radius: f64,
        color: SharedStr,
        pairing_key: Option<SharedStr>,
        faded: bool,
    },

    /// Directed signal from one event to its partner.
    Arrow {
        pairing_key: SharedStr,
        kind: PairKind,
        from: Point,
        to: Point,
        color: SharedStr,
        visible: bool,
    },

    /// Critical section: the interval a lock is held, drawn over one lane.
    Section {
        pairing_key: SharedStr,
        rect: Rect,
        color: SharedStr,
        opacity: f64,
    },

    Label {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// What a pointer position resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    Marker { source: usize },
    Section { pairing_key: SharedStr },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn lifeline_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Lifeline { .. }))
            .count()
    }

    pub fn marker_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Marker { .. }))
            .count()
    }

    pub fn has_marker(&self, source: usize) -> bool {
        self.primitives
            .iter()
            .any(|p| matches!(p, Primitive::Marker { source: s, .. } if *s == source))
    }

    /// Whether a hit target from an earlier rebuild still exists in this one.
    pub fn contains(&self, target: &HitTarget) -> bool {
        match target {
            HitTarget::Marker { source } => self.has_marker(*source),
            HitTarget::Section { pairing_key } => self.primitives.iter().any(
                |p| matches!(p, Primitive::Section { pairing_key: k, .. } if k == pairing_key),
            ),
        }
    }

    /// Resolve a point to the topmost marker, else the topmost critical section.
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        let marker = self.primitives.iter().rev().find_map(|p| match p {
            Primitive::Marker {
                source,
                center,
                radius,
                ..
            } if center.distance_to(point) <= *radius => Some(HitTarget::Marker { source: *source }),
            _ => None,
        });
        if marker.is_some() {
            return marker;
        }

        self.primitives.iter().rev().find_map(|p| match p {
            Primitive::Section {
                pairing_key, rect, ..
            } if rect.contains(point) => Some(HitTarget::Section {
                pairing_key: pairing_key.clone(),
            }),
            _ => None,
        })
    }
}
