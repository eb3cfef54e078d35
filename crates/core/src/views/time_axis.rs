use chrono::{DateTime, Local};
use syncline_protocol::{Point, Primitive, SharedStr, TextAlign, ThemeToken};

use crate::scale::TimeScale;

const LABEL_INSET: f64 = 2.0;

/// Axis labels for the viewport's start (left) and end (right), drawn at `y`.
pub fn render_axis_labels(scale: &TimeScale, y: f64, font_size: f64) -> Vec<Primitive> {
    let viewport = scale.viewport();
    vec![
        Primitive::Label {
            position: Point::new(LABEL_INSET, y),
            text: SharedStr::from(format_local_time(viewport.start)),
            color: ThemeToken::AxisText,
            font_size,
            align: TextAlign::Left,
        },
        Primitive::Label {
            position: Point::new(scale.width() - LABEL_INSET, y),
            text: SharedStr::from(format_local_time(viewport.end)),
            color: ThemeToken::AxisText,
            font_size,
            align: TextAlign::Right,
        },
    ]
}

/// Format epoch microseconds as local wall-clock time, `HH:MM:SS.mmm`.
pub fn format_local_time(us: f64) -> String {
    DateTime::from_timestamp_micros(us.round() as i64)
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S%.3f").to_string())
        .unwrap_or_default()
}
