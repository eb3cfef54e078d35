use serde::{Deserialize, Serialize};
use syncline_protocol::{Event, Rect};

use crate::scale::TimeScale;

/// Visible time window, in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub start: f64,
    pub end: f64,
}

impl Viewport {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Intersect with `outer`, keeping `start <= end`.
    pub fn clamp_to(&self, outer: &Viewport) -> Viewport {
        let start = self.start.clamp(outer.start, outer.end);
        let end = self.end.clamp(outer.start, outer.end);
        Viewport::new(start.min(end), start.max(end))
    }
}

/// In-progress drag selection, in plot pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSelection {
    pub start_x: f64,
    pub current_x: f64,
}

impl DragSelection {
    pub fn span(&self) -> f64 {
        (self.current_x - self.start_x).abs()
    }

    /// Overlay rectangle covering the selected columns over the full height.
    pub fn rect(&self, height: f64) -> Rect {
        Rect::spanning(self.start_x, self.current_x, height / 2.0, height)
    }
}

/// Owns the full and current time windows plus the transient drag state.
///
/// `current` only changes on a committed drag, [`zoom_to`](Self::zoom_to) or
/// [`reset`](Self::reset); dragging never touches it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    full: Viewport,
    current: Viewport,
    drag: Option<DragSelection>,
    reset_visible: bool,
    drag_threshold: f64,
}

impl ViewportController {
    /// Derive the full window from the event timestamps. `None` when there
    /// are no events to bound it.
    pub fn init(events: &[Event], drag_threshold: f64) -> Option<Self> {
        if events.is_empty() {
            return None;
        }
        let (start, end) = events
            .iter()
            .map(Event::micros)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(t), hi.max(t))
            });
        let full = Viewport::new(start, end);
        Some(Self {
            full,
            current: full,
            drag: None,
            reset_visible: false,
            drag_threshold,
        })
    }

    pub fn full(&self) -> Viewport {
        self.full
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    pub fn drag(&self) -> Option<DragSelection> {
        self.drag
    }

    pub fn reset_visible(&self) -> bool {
        self.reset_visible
    }

    /// Start a selection. Presses outside `[0, width]` are ignored.
    pub fn begin_drag(&mut self, x: f64, width: f64) -> bool {
        if !(0.0..=width).contains(&x) {
            tracing::debug!(x, width, "drag started outside the plot, ignoring");
            return false;
        }
        self.drag = Some(DragSelection {
            start_x: x,
            current_x: x,
        });
        true
    }

    pub fn update_drag(&mut self, x: f64) {
        if let Some(drag) = &mut self.drag {
            drag.current_x = x;
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Finish a selection and zoom to it. Returns whether `current` changed.
    pub fn end_drag(&mut self, x: f64, scale: &TimeScale) -> bool {
        let Some(mut drag) = self.drag.take() else {
            return false;
        };
        drag.current_x = x;
        if drag.span() < self.drag_threshold {
            tracing::trace!(span = drag.span(), "selection below drag threshold, discarded");
            return false;
        }

        let width = scale.width();
        let left = drag.start_x.min(drag.current_x).clamp(0.0, width);
        let right = drag.start_x.max(drag.current_x).clamp(0.0, width);
        self.zoom_to(scale.x_to_time(left), scale.x_to_time(right))
    }

    /// Zoom to `[start, end]`, clamped to the full window. Empty ranges are
    /// rejected.
    pub fn zoom_to(&mut self, start: f64, end: f64) -> bool {
        let target = Viewport::new(start, end).clamp_to(&self.full);
        if start > end || target.duration() <= 0.0 {
            tracing::debug!(start, end, "rejecting empty zoom range");
            return false;
        }
        tracing::debug!(start = target.start, end = target.end, "zoomed");
        self.current = target;
        self.reset_visible = true;
        true
    }

    pub fn reset(&mut self) {
        self.current = self.full;
        self.drag = None;
        self.reset_visible = false;
    }
}
