use serde::{Deserialize, Serialize};
use syncline_protocol::{Event, HitTarget, Point, Rect, Scene, SharedStr, TimelineData};

use crate::config::TimelineConfig;
use crate::error::{Error, Result};
use crate::interaction::{HoverState, InteractionController, Tooltip};
use crate::scale::{LaneScale, TimeScale};
use crate::viewport::{Viewport, ViewportController};
use crate::views::build_scene;
use crate::views::legend::{Legend, build_legend};

pub use crate::interaction::ClickHandler;

/// Everything an adapter needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedView {
    pub scene: Scene,
    pub legend: Legend,
    pub sync_legend_visible: bool,
    pub reset_visible: bool,
    pub tooltip: Option<Tooltip>,
    /// Drag-selection overlay, while a drag is in progress.
    pub selection: Option<Rect>,
    /// `None` until data with at least one event is loaded.
    pub viewport: Option<Viewport>,
    pub hover: HoverState,
}

impl RenderedView {
    fn empty(config: &TimelineConfig, legend: Legend) -> Self {
        Self {
            scene: Scene::new(config.width, config.scene_height(0)),
            legend,
            sync_legend_visible: false,
            reset_visible: false,
            tooltip: None,
            selection: None,
            viewport: None,
            hover: HoverState::Idle,
        }
    }
}

struct Loaded {
    data: TimelineData,
    lanes: LaneScale,
    legend: Legend,
    viewport: ViewportController,
}

/// The engine facade: owns the loaded data, the viewport and hover state,
/// and the most recently built view.
///
/// Every method is a no-op until [`init`](Self::init) has loaded at least one
/// event.
pub struct Timeline {
    config: TimelineConfig,
    loaded: Option<Loaded>,
    interaction: InteractionController,
    view: RenderedView,
}

impl Timeline {
    pub fn new(config: TimelineConfig) -> Self {
        let interaction = InteractionController::new(config.tooltip_offset);
        let view = RenderedView::empty(&config, Legend::default());
        Self {
            config,
            loaded: None,
            interaction,
            view,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Load a new data set, replacing any previous data, viewport, hover state
    /// and click handler.
    pub fn init(&mut self, data: TimelineData, on_click: Option<ClickHandler>) {
        self.interaction.clear();
        self.interaction.set_click_handler(on_click);

        let legend = build_legend(&data.color_map, &data.event_pairs, &self.config);
        let Some(viewport) = ViewportController::init(&data.events, self.config.drag_threshold)
        else {
            tracing::debug!("timeline loaded without events");
            self.loaded = None;
            self.view = RenderedView::empty(&self.config, legend);
            return;
        };

        let lanes = LaneScale::from_data(&data, &self.config);
        tracing::debug!(
            events = data.events.len(),
            lanes = lanes.len(),
            pairs = data.event_pairs.len(),
            "timeline loaded"
        );
        self.loaded = Some(Loaded {
            data,
            lanes,
            legend,
            viewport,
        });
        self.rebuild();
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    pub fn data(&self) -> Option<&TimelineData> {
        self.loaded.as_ref().map(|l| &l.data)
    }

    pub fn lanes(&self) -> Option<&LaneScale> {
        self.loaded.as_ref().map(|l| &l.lanes)
    }

    pub fn viewport(&self) -> Option<&ViewportController> {
        self.loaded.as_ref().map(|l| &l.viewport)
    }

    pub fn time_scale(&self) -> Option<TimeScale> {
        self.loaded
            .as_ref()
            .map(|l| TimeScale::new(l.viewport.current(), self.config.width))
    }

    pub fn begin_drag(&mut self, x: f64) -> bool {
        let width = self.config.width;
        let Some(loaded) = &mut self.loaded else {
            return false;
        };
        let started = loaded.viewport.begin_drag(x, width);
        self.refresh_selection();
        started
    }

    /// Track the pointer during a drag. Only the selection overlay changes.
    pub fn update_drag(&mut self, x: f64) {
        if let Some(loaded) = &mut self.loaded {
            loaded.viewport.update_drag(x);
            self.refresh_selection();
        }
    }

    /// Commit a drag. Returns whether the viewport changed.
    pub fn end_drag(&mut self, x: f64) -> bool {
        let Some(scale) = self.time_scale() else {
            return false;
        };
        let Some(loaded) = &mut self.loaded else {
            return false;
        };
        if loaded.viewport.end_drag(x, &scale) {
            self.rebuild();
            true
        } else {
            self.refresh_selection();
            false
        }
    }

    pub fn cancel_drag(&mut self) {
        if let Some(loaded) = &mut self.loaded {
            loaded.viewport.cancel_drag();
            self.refresh_selection();
        }
    }

    /// Zoom to `[start, end]` in microseconds since the epoch.
    pub fn zoom_to(&mut self, start: f64, end: f64) -> bool {
        let Some(loaded) = &mut self.loaded else {
            return false;
        };
        if loaded.viewport.zoom_to(start, end) {
            self.rebuild();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        if let Some(loaded) = &mut self.loaded {
            tracing::debug!("viewport reset");
            loaded.viewport.reset();
            self.rebuild();
        }
    }

    pub fn pointer_enter(&mut self, target: &HitTarget, at: Point) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        match target {
            HitTarget::Marker { source } => {
                let Some(event) = loaded.data.events.get(*source) else {
                    tracing::warn!(source, "pointer entered a marker with no event");
                    return;
                };
                let label = loaded
                    .lanes
                    .label_of(&event.job_id)
                    .map_or(event.job_id.as_str(), SharedStr::as_str);
                self.interaction
                    .pointer_enter_marker(*source, event, label, at);
            }
            HitTarget::Section { pairing_key } => {
                self.interaction.pointer_enter_section(pairing_key, at);
            }
        }
        self.rebuild();
    }

    /// Leave the hovered primitive. `next` is what the pointer moved onto,
    /// if anything.
    pub fn pointer_leave(&mut self, next: Option<&HitTarget>) {
        if self.loaded.is_none() {
            return;
        }
        self.interaction.pointer_leave(next);
        self.rebuild();
    }

    pub fn pointer_move(&mut self, at: Point) {
        self.interaction.pointer_move(at);
        self.view.tooltip = self.interaction.tooltip().cloned();
    }

    /// Resolve a raw pointer position against the current scene and drive
    /// the matching enter, leave or move transitions.
    pub fn pointer_at(&mut self, at: Point) {
        let target = self.view.scene.hit_test(at);
        if target.as_ref() == self.interaction.hovered() {
            self.pointer_move(at);
            return;
        }
        if self.interaction.hovered().is_some() {
            self.pointer_leave(target.as_ref());
        }
        match target {
            Some(target) => self.pointer_enter(&target, at),
            None => self.pointer_move(at),
        }
    }

    /// Forward a click on the marker built from `events[source]`.
    pub fn click(&mut self, source: usize) -> bool {
        let Some(loaded) = &self.loaded else {
            return false;
        };
        let Some(event) = loaded.data.events.get(source) else {
            return false;
        };
        if !self.view.scene.has_marker(source) {
            return false;
        }
        self.interaction.click(event);
        true
    }

    /// Click at a raw pointer position. Only markers are clickable.
    pub fn click_at(&mut self, at: Point) -> Option<&Event> {
        let Some(HitTarget::Marker { source }) = self.view.scene.hit_test(at) else {
            return None;
        };
        if !self.click(source) {
            return None;
        }
        self.loaded.as_ref().and_then(|l| l.data.events.get(source))
    }

    fn refresh_selection(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        self.view.selection = loaded
            .viewport
            .drag()
            .map(|drag| drag.rect(self.view.scene.height));
    }

    fn rebuild(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let scale = TimeScale::new(loaded.viewport.current(), self.config.width);
        let mut scene = build_scene(&loaded.data, &loaded.lanes, &scale, &self.config);

        self.interaction.retain_present(&scene);
        self.interaction.decorate(&mut scene, &self.config);

        let selection = loaded.viewport.drag().map(|drag| drag.rect(scene.height));
        self.view = RenderedView {
            scene,
            legend: loaded.legend.clone(),
            sync_legend_visible: self.interaction.sync_legend_visible(),
            reset_visible: loaded.viewport.reset_visible(),
            tooltip: self.interaction.tooltip().cloned(),
            selection,
            viewport: Some(loaded.viewport.current()),
            hover: self.interaction.state().clone(),
        };
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("config", &self.config)
            .field("loaded", &self.loaded.is_some())
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

/// Parse a timeline payload (`events`, `jobs`, `color_map`, `event_pairs`).
pub fn parse_timeline(json: &str) -> Result<TimelineData> {
    serde_json::from_str(json).map_err(Error::Input)
}
