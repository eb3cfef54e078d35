use syncline_protocol::{Point, Primitive, SharedStr, TimelineData};

use crate::config::TimelineConfig;
use crate::scale::{LaneScale, TimeScale};

/// One lifeline per participant, each spanning the full plot width.
pub fn render_lifelines(lanes: &LaneScale, scale: &TimeScale) -> Vec<Primitive> {
    lanes
        .lanes()
        .iter()
        .enumerate()
        .map(|(i, lane)| {
            let y = lanes.lane_y(i);
            Primitive::Lifeline {
                participant: lane.participant.clone(),
                label: lane.label.clone(),
                from: Point::new(0.0, y),
                to: Point::new(scale.width(), y),
            }
        })
        .collect()
}

/// One marker per event inside the scale's viewport.
///
/// Produces nothing for an empty window; the caller decides how to present
/// "no events".
pub fn render_markers(
    data: &TimelineData,
    lanes: &LaneScale,
    scale: &TimeScale,
    config: &TimelineConfig,
) -> Vec<Primitive> {
    let viewport = scale.viewport();
    let neutral = SharedStr::from(config.neutral_color.as_str());
    let mut markers = Vec::new();

    for (source, event) in data.events.iter().enumerate() {
        let t = event.micros();
        if !viewport.contains(t) {
            continue;
        }
        let Some(y) = lanes.participant_to_y(&event.job_id) else {
            tracing::warn!(job_id = %event.job_id, "event has no lane, skipping marker");
            continue;
        };

        let color = data
            .color_map
            .get(&event.event_type)
            .cloned()
            .unwrap_or_else(|| neutral.clone());

        markers.push(Primitive::Marker {
            key: event.key(),
            source,
            center: Point::new(scale.time_to_x(t), y),
            radius: config.marker_radius,
            color,
            pairing_key: event.pairing_key.clone(),
            faded: false,
        });
    }

    markers
}
