use syncline_protocol::{ColorMap, EventPair, PairKind, Point, Primitive, Rect, SharedStr};

use crate::config::TimelineConfig;
use crate::scale::{LaneScale, TimeScale};

/// Render synchronization pairs.
///
/// `lock_unlock` pairs become critical-section rectangles (two when the lock
/// is released by a different participant than the one that took it); every
/// other kind becomes a hidden arrow. Pairs with an endpoint on an unknown
/// lane or outside the scale's viewport are skipped with a warning.
pub fn render_pairs(
    pairs: &[EventPair],
    lanes: &LaneScale,
    scale: &TimeScale,
    color_map: &ColorMap,
    config: &TimelineConfig,
) -> Vec<Primitive> {
    let viewport = scale.viewport();
    let mut primitives = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let Some(y1) = lanes.participant_to_y(&pair.start_event.job_id) else {
            warn_missing_lane(pair, &pair.start_event.job_id);
            continue;
        };
        let Some(y2) = lanes.participant_to_y(&pair.end_event.job_id) else {
            warn_missing_lane(pair, &pair.end_event.job_id);
            continue;
        };
        let (t1, t2) = (pair.start_event.micros(), pair.end_event.micros());
        if !viewport.contains(t1) || !viewport.contains(t2) {
            tracing::warn!(
                pairing_key = %pair.pairing_key,
                kind = %pair.kind,
                "pair endpoint outside the viewport, skipping pair"
            );
            continue;
        }
        let x1 = scale.time_to_x(t1);
        let x2 = scale.time_to_x(t2);
        let color = color_map
            .get(pair.kind.category())
            .cloned()
            .unwrap_or_else(|| SharedStr::from(config.neutral_color.as_str()));

        match pair.kind {
            PairKind::LockUnlock => {
                primitives.push(Primitive::Section {
                    pairing_key: pair.pairing_key.clone(),
                    rect: Rect::spanning(x1, x2, y1, config.section_height),
                    color: color.clone(),
                    opacity: config.dimmed_opacity,
                });
                if pair.crosses_participants() {
                    primitives.push(Primitive::Section {
                        pairing_key: pair.pairing_key.clone(),
                        rect: Rect::spanning(x1, x2, y2, config.section_height),
                        color,
                        opacity: config.dimmed_opacity,
                    });
                }
            }
            PairKind::SignalCreateUnlock | PairKind::BarrierCreateWait => {
                primitives.push(Primitive::Arrow {
                    pairing_key: pair.pairing_key.clone(),
                    kind: pair.kind,
                    from: Point::new(x1, y1),
                    to: Point::new(x2, y2),
                    color,
                    visible: false,
                });
            }
        }
    }

    primitives
}

fn warn_missing_lane(pair: &EventPair, job_id: &str) {
    tracing::warn!(
        pairing_key = %pair.pairing_key,
        kind = %pair.kind,
        job_id,
        "no lane for pair endpoint, skipping pair"
    );
}
