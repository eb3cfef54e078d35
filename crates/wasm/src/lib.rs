use std::cell::RefCell;
use std::rc::Rc;

use syncline_core::highlight::RowHighlight;
use syncline_core::svg::render_svg;
use syncline_core::timeline::parse_timeline;
use syncline_core::{ClickHandler, Timeline, TimelineConfig};
use syncline_protocol::{Event, Point};
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// One timeline instance owned by the page. Each handle carries its own
/// engine and row highlight, so several timelines can live side by side.
#[wasm_bindgen]
pub struct TimelineHandle {
    timeline: Timeline,
    highlight: Rc<RefCell<RowHighlight>>,
}

#[wasm_bindgen]
impl TimelineHandle {
    /// Create a handle from an optional JSON config; missing fields keep
    /// their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<TimelineHandle, JsError> {
        let config = match config_json.as_deref() {
            Some(json) => TimelineConfig::from_json(json).map_err(js_error)?,
            None => TimelineConfig::default(),
        };
        Ok(Self {
            timeline: Timeline::new(config),
            highlight: Rc::default(),
        })
    }

    /// Load a timeline payload. `on_event_click` receives the clicked event
    /// as a JSON string; the clicked row is also remembered as highlighted.
    pub fn init(
        &mut self,
        payload: &str,
        on_event_click: Option<js_sys::Function>,
    ) -> Result<(), JsError> {
        let data = parse_timeline(payload).map_err(js_error)?;
        self.highlight.borrow_mut().clear();
        let handler = click_handler(Rc::clone(&self.highlight), on_event_click);
        self.timeline.init(data, Some(handler));
        Ok(())
    }

    /// The current frame (scene, legend, tooltip, selection) as JSON.
    pub fn view(&self) -> Result<String, JsError> {
        serde_json::to_string(self.timeline.view()).map_err(js_error)
    }

    pub fn svg(&self, dark: bool) -> String {
        render_svg(self.timeline.view(), dark)
    }

    pub fn begin_drag(&mut self, x: f64) -> bool {
        self.timeline.begin_drag(x)
    }

    pub fn update_drag(&mut self, x: f64) {
        self.timeline.update_drag(x);
    }

    pub fn end_drag(&mut self, x: f64) -> bool {
        self.timeline.end_drag(x)
    }

    pub fn cancel_drag(&mut self) {
        self.timeline.cancel_drag();
    }

    pub fn zoom_to(&mut self, start_us: f64, end_us: f64) -> bool {
        self.timeline.zoom_to(start_us, end_us)
    }

    pub fn reset(&mut self) {
        self.timeline.reset();
    }

    pub fn pointer_at(&mut self, x: f64, y: f64) {
        self.timeline.pointer_at(Point::new(x, y));
    }

    /// The pointer left the plot entirely.
    pub fn pointer_leave(&mut self) {
        self.timeline.pointer_leave(None);
    }

    pub fn click_at(&mut self, x: f64, y: f64) -> bool {
        self.timeline.click_at(Point::new(x, y)).is_some()
    }

    /// Key (`"{job_id}-{log_index}"`) of the highlighted log row.
    pub fn highlighted_row(&self) -> Option<String> {
        self.highlight.borrow().current().map(ToString::to_string)
    }
}

fn click_handler(
    highlight: Rc<RefCell<RowHighlight>>,
    callback: Option<js_sys::Function>,
) -> ClickHandler {
    Box::new(move |event: &Event| {
        highlight.borrow_mut().select(event.key());
        let Some(callback) = &callback else {
            return;
        };
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize clicked event");
                return;
            }
        };
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
            tracing::warn!(?err, "event click callback threw");
        }
    })
}
