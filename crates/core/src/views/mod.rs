//! Scene construction: pure functions from timeline data plus scales to
//! primitives.

pub mod lanes;
pub mod legend;
pub mod pairs;
pub mod time_axis;

use syncline_protocol::{Scene, TimelineData};

use crate::config::TimelineConfig;
use crate::scale::{LaneScale, TimeScale};

/// Build the complete, undecorated scene for one viewport.
///
/// Paint order is lifelines, pair primitives, markers, axis labels, so
/// markers stay on top of critical sections for hit-testing.
pub fn build_scene(
    data: &TimelineData,
    lanes: &LaneScale,
    scale: &TimeScale,
    config: &TimelineConfig,
) -> Scene {
    let height = config.scene_height(lanes.len());
    let mut scene = Scene::new(scale.width(), height);

    scene.primitives.extend(lanes::render_lifelines(lanes, scale));
    scene.primitives.extend(pairs::render_pairs(
        &data.event_pairs,
        lanes,
        scale,
        &data.color_map,
        config,
    ));
    scene
        .primitives
        .extend(lanes::render_markers(data, lanes, scale, config));
    scene.primitives.extend(time_axis::render_axis_labels(
        scale,
        height - config.bottom_margin / 3.0,
        config.axis_font_size,
    ));

    scene
}
