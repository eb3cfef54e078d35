//! Hover-trace state machine.
//!
//! ```text
//!            enter(marker with key K)
//!   Idle ─────────────────────────────▶ Hovering(K)
//!     ▲                                     │
//!     └──────── leave(marker | section) ────┘
//! ```
//!
//! Entering a section or an unkeyed marker only shows a tooltip. The state is
//! applied to a freshly built scene by [`InteractionController::decorate`];
//! nothing is patched in place between rebuilds.

use chrono::Local;
use serde::{Deserialize, Serialize};
use syncline_protocol::{Event, HitTarget, Point, Primitive, Scene, SharedStr};

use crate::config::TimelineConfig;
use crate::message::clean_message;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering {
        pairing_key: SharedStr,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub lines: Vec<String>,
    /// Top-left corner, already offset from the pointer.
    pub position: Point,
}

/// Callback invoked with the originating event when a marker is clicked.
pub type ClickHandler = Box<dyn FnMut(&Event)>;

pub struct InteractionController {
    state: HoverState,
    hovered: Option<HitTarget>,
    tooltip: Option<Tooltip>,
    tooltip_offset: f64,
    on_click: Option<ClickHandler>,
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("state", &self.state)
            .field("hovered", &self.hovered)
            .field("tooltip", &self.tooltip)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl InteractionController {
    pub fn new(tooltip_offset: f64) -> Self {
        Self {
            state: HoverState::Idle,
            hovered: None,
            tooltip: None,
            tooltip_offset,
            on_click: None,
        }
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn hovered(&self) -> Option<&HitTarget> {
        self.hovered.as_ref()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn sync_legend_visible(&self) -> bool {
        matches!(self.state, HoverState::Hovering { .. })
    }

    /// Install the click callback, dropping any previous one.
    pub fn set_click_handler(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    /// Back to `Idle` with no tooltip. The click handler is kept.
    pub fn clear(&mut self) {
        self.state = HoverState::Idle;
        self.hovered = None;
        self.tooltip = None;
    }

    pub fn pointer_enter_marker(
        &mut self,
        source: usize,
        event: &Event,
        participant: &str,
        at: Point,
    ) {
        if let Some(key) = &event.pairing_key {
            tracing::trace!(pairing_key = %key, "hover trace started");
            self.state = HoverState::Hovering {
                pairing_key: key.clone(),
            };
        }
        self.hovered = Some(HitTarget::Marker { source });
        self.tooltip = Some(Tooltip {
            lines: vec![
                event
                    .timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S%.3f")
                    .to_string(),
                participant.to_string(),
                clean_message(&event.message),
            ],
            position: self.offset(at),
        });
    }

    pub fn pointer_enter_section(&mut self, pairing_key: &SharedStr, at: Point) {
        self.hovered = Some(HitTarget::Section {
            pairing_key: pairing_key.clone(),
        });
        self.tooltip = Some(Tooltip {
            lines: vec![pairing_key.to_string()],
            position: self.offset(at),
        });
    }

    /// Leave the hovered primitive. When `next` is a section the tooltip
    /// stays up until that section's enter replaces it.
    pub fn pointer_leave(&mut self, next: Option<&HitTarget>) {
        if self.state != HoverState::Idle {
            tracing::trace!("hover trace cleared");
        }
        self.state = HoverState::Idle;
        self.hovered = None;
        if !matches!(next, Some(HitTarget::Section { .. })) {
            self.tooltip = None;
        }
    }

    pub fn pointer_move(&mut self, at: Point) {
        let position = self.offset(at);
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.position = position;
        }
    }

    pub fn click(&mut self, event: &Event) {
        if let Some(handler) = &mut self.on_click {
            handler(event);
        }
    }

    /// Drop hover state whose target did not survive a rebuild.
    pub fn retain_present(&mut self, scene: &Scene) {
        if let Some(target) = &self.hovered
            && !scene.contains(target)
        {
            tracing::trace!(?target, "hovered primitive left the scene");
            self.clear();
        }
    }

    /// Apply fade, arrow visibility and section emphasis to a fresh scene.
    pub fn decorate(&self, scene: &mut Scene, config: &TimelineConfig) {
        let active = match &self.state {
            HoverState::Idle => None,
            HoverState::Hovering { pairing_key } => Some(pairing_key),
        };
        let is_active = |key: Option<&SharedStr>| active.is_some() && key == active;

        for primitive in &mut scene.primitives {
            match primitive {
                Primitive::Marker {
                    pairing_key, faded, ..
                } => *faded = active.is_some() && !is_active(pairing_key.as_ref()),
                Primitive::Arrow {
                    pairing_key,
                    visible,
                    ..
                } => *visible = is_active(Some(pairing_key)),
                Primitive::Section {
                    pairing_key,
                    opacity,
                    ..
                } => {
                    *opacity = if is_active(Some(pairing_key)) {
                        config.emphasized_opacity
                    } else {
                        config.dimmed_opacity
                    };
                }
                Primitive::Lifeline { .. } | Primitive::Label { .. } => {}
            }
        }
    }

    fn offset(&self, at: Point) -> Point {
        at.offset(self.tooltip_offset, self.tooltip_offset)
    }
}
