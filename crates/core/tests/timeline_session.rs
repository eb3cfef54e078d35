//! Integration test: load a three-job multi-machine run into a Timeline and
//! drive it through zoom, hover and click the way a host would.

use std::cell::RefCell;
use std::rc::Rc;

use syncline_core::analysis::{JobLog, JobNamer, LogEntry, find_pairs, timeline_events};
use syncline_core::interaction::HoverState;
use syncline_core::timeline::parse_timeline;
use syncline_core::{Timeline, TimelineConfig};
use syncline_protocol::{
    Event, HitTarget, PairKind, Point, Primitive, Scene, SharedStr, TimelineData,
};

const FIXTURE: &str = include_str!("fixtures/multimachine.json");
const SECOND: f64 = 1e6;

fn fixture() -> TimelineData {
    let mut data = parse_timeline(FIXTURE).expect("fixture parses");
    let (pairs, considered) = find_pairs(&data.events);
    assert_eq!(considered, 8);
    data.event_pairs = pairs;
    data
}

fn config() -> TimelineConfig {
    TimelineConfig {
        width: 1000.0,
        ..TimelineConfig::default()
    }
}

fn loaded() -> Timeline {
    let mut timeline = Timeline::new(config());
    timeline.init(fixture(), None);
    timeline
}

fn start_of(timeline: &Timeline) -> f64 {
    timeline.viewport().expect("data loaded").full().start
}

fn marker_center(scene: &Scene, wanted: usize) -> Point {
    scene
        .primitives
        .iter()
        .find_map(|p| match p {
            Primitive::Marker { source, center, .. } if *source == wanted => Some(*center),
            _ => None,
        })
        .expect("marker is in the scene")
}

fn faded_sources(scene: &Scene) -> Vec<usize> {
    scene
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Marker {
                source,
                faded: true,
                ..
            } => Some(*source),
            _ => None,
        })
        .collect()
}

fn visible_arrows(scene: &Scene) -> Vec<&str> {
    scene
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Arrow {
                pairing_key,
                visible: true,
                ..
            } => Some(pairing_key.as_str()),
            _ => None,
        })
        .collect()
}

fn section_opacities(scene: &Scene, key: &str) -> Vec<f64> {
    scene
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Section {
                pairing_key,
                opacity,
                ..
            } if pairing_key == key => Some(*opacity),
            _ => None,
        })
        .collect()
}

#[test]
fn derives_expected_pairs() {
    let data = fixture();
    let kinds: Vec<(PairKind, &str)> = data
        .event_pairs
        .iter()
        .map(|p| (p.kind, p.pairing_key.as_str()))
        .collect();
    assert_eq!(
        kinds,
        [
            (PairKind::LockUnlock, "support_server"),
            (PairKind::BarrierCreateWait, "setup"),
            (PairKind::SignalCreateUnlock, "ready"),
            (PairKind::LockUnlock, "vnc"),
        ]
    );
}

#[test]
fn one_lifeline_per_participant_and_one_marker_per_event() {
    let timeline = loaded();
    let view = timeline.view();
    assert_eq!(view.scene.lifeline_count(), 3);
    assert_eq!(view.scene.marker_count(), 10);
    assert_eq!(view.scene.width, 1000.0);
    assert_eq!(view.scene.height, 40.0 + 3.0 * 40.0 + 30.0);
    assert!(!view.reset_visible);
    assert!(!view.sync_legend_visible);

    let lanes: Vec<&str> = timeline
        .lanes()
        .expect("data loaded")
        .lanes()
        .iter()
        .map(|l| l.label.as_str())
        .collect();
    assert_eq!(lanes, ["client_a", "client_b", "server"]);

    // Unknown types fall back to the neutral color.
    let console = view.scene.primitives.iter().find_map(|p| match p {
        Primitive::Marker { source: 9, color, .. } => Some(color.as_str()),
        _ => None,
    });
    assert_eq!(console, Some("#9e9e9e"));
}

#[test]
fn cross_participant_lock_spans_both_lanes() {
    let timeline = loaded();
    let scale = timeline.time_scale().expect("data loaded");
    let data = timeline.data().expect("data loaded");
    let pair = data
        .event_pairs
        .iter()
        .find(|p| p.pairing_key == "vnc")
        .expect("vnc pair derived");
    let x1 = scale.time_to_x(pair.start_event.micros());
    let x2 = scale.time_to_x(pair.end_event.micros());

    let rects: Vec<_> = timeline
        .view()
        .scene
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Section {
                pairing_key, rect, ..
            } if pairing_key == "vnc" => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 2);
    for rect in &rects {
        assert!((rect.x - x1).abs() < 1e-9);
        assert!((rect.x + rect.w - x2).abs() < 1e-9);
    }
    assert_ne!(rects[0].y, rects[1].y);
}

#[test]
fn zoom_then_reset_reproduces_the_original_view() {
    let mut timeline = loaded();
    let original = timeline.view().clone();

    assert!(timeline.begin_drag(150.0));
    timeline.update_drag(300.0);
    assert!(timeline.view().selection.is_some());
    assert!(timeline.end_drag(450.0));

    let view = timeline.view();
    assert!(view.selection.is_none());
    assert!(view.reset_visible);
    assert_eq!(view.scene.marker_count(), 2);
    let viewport = view.viewport.expect("zoomed");
    let start = start_of(&timeline);
    assert!((viewport.start - (start + 15.0 * SECOND)).abs() < 1.0);
    assert!((viewport.end - (start + 45.0 * SECOND)).abs() < 1.0);

    // Every pair has an endpoint outside 15s..45s, so none is drawn.
    assert!(section_opacities(&view.scene, "support_server").is_empty());
    assert!(
        !view
            .scene
            .primitives
            .iter()
            .any(|p| matches!(p, Primitive::Section { .. } | Primitive::Arrow { .. }))
    );

    timeline.reset();
    assert_eq!(timeline.view(), &original);
}

#[test]
fn zoom_keeps_only_pairs_inside_the_window() {
    let mut timeline = loaded();
    let start = start_of(&timeline);
    assert!(timeline.zoom_to(start + 5.0 * SECOND, start + 45.0 * SECOND));

    let scene = &timeline.view().scene;
    assert_eq!(section_opacities(scene, "support_server").len(), 1);
    assert!(section_opacities(scene, "vnc").is_empty());
    let arrows: Vec<&str> = scene
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Arrow { pairing_key, .. } => Some(pairing_key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(arrows, ["setup"]);
}

#[test]
fn short_drag_is_discarded() {
    let mut timeline = loaded();
    let before = timeline.view().viewport;
    assert!(timeline.begin_drag(10.0));
    assert!(!timeline.end_drag(15.0));
    assert_eq!(timeline.view().viewport, before);
    assert!(!timeline.view().reset_visible);
    assert!(timeline.view().selection.is_none());
}

#[test]
fn drag_outside_plot_is_ignored() {
    let mut timeline = loaded();
    assert!(!timeline.begin_drag(-5.0));
    assert!(!timeline.begin_drag(1001.0));
    assert!(!timeline.end_drag(500.0));
    assert!(!timeline.view().reset_visible);
}

#[test]
fn hovering_a_key_traces_it_and_leaving_restores() {
    let mut timeline = loaded();
    let config = config();

    timeline.pointer_enter(&HitTarget::Marker { source: 6 }, Point::new(600.0, 80.0));
    let view = timeline.view();
    assert_eq!(
        view.hover,
        HoverState::Hovering {
            pairing_key: "vnc".into()
        }
    );
    assert!(view.sync_legend_visible);
    assert_eq!(faded_sources(&view.scene), [0, 1, 2, 3, 4, 5, 8, 9]);
    assert_eq!(
        section_opacities(&view.scene, "vnc"),
        [config.emphasized_opacity, config.emphasized_opacity]
    );
    assert_eq!(
        section_opacities(&view.scene, "support_server"),
        [config.dimmed_opacity]
    );
    let tooltip = view.tooltip.as_ref().expect("tooltip shown");
    assert_eq!(tooltip.lines[1], "client_b");
    assert_eq!(tooltip.lines[2], "testapi::mutex_lock(name=\"vnc\")");

    timeline.pointer_leave(None);
    let view = timeline.view();
    assert_eq!(view.hover, HoverState::Idle);
    assert!(faded_sources(&view.scene).is_empty());
    assert!(visible_arrows(&view.scene).is_empty());
    assert_eq!(
        section_opacities(&view.scene, "vnc"),
        [config.dimmed_opacity, config.dimmed_opacity]
    );
    assert!(view.tooltip.is_none());
    assert!(!view.sync_legend_visible);
}

#[test]
fn raw_pointer_positions_drive_hover() {
    let mut timeline = loaded();
    let at = marker_center(&timeline.view().scene, 0);

    timeline.pointer_at(at);
    assert_eq!(visible_arrows(&timeline.view().scene), ["ready"]);

    timeline.pointer_at(at.offset(1.0, 1.0));
    let moved = timeline.view().tooltip.as_ref().map(|t| t.position);
    assert_eq!(moved, Some(at.offset(16.0, 16.0)));

    timeline.pointer_at(Point::new(500.0, 5.0));
    assert_eq!(timeline.view().hover, HoverState::Idle);
    assert!(timeline.view().tooltip.is_none());
}

#[test]
fn pointer_onto_a_section_keeps_a_tooltip() {
    let mut timeline = loaded();
    timeline.pointer_at(marker_center(&timeline.view().scene, 6));
    assert!(timeline.view().tooltip.is_some());

    timeline.pointer_at(Point::new(700.0, 80.0));
    let view = timeline.view();
    assert_eq!(view.hover, HoverState::Idle);
    let lines = view.tooltip.as_ref().map(|t| t.lines.clone());
    assert_eq!(lines, Some(vec!["vnc".to_string()]));
}

#[test]
fn click_invokes_callback_once_with_the_event() {
    let clicks: Rc<RefCell<Vec<Event>>> = Rc::default();
    let sink = Rc::clone(&clicks);
    let data = fixture();
    let expected = data.events[8].clone();

    let mut timeline = Timeline::new(config());
    timeline.init(
        data,
        Some(Box::new(move |event: &Event| {
            sink.borrow_mut().push(event.clone());
        })),
    );

    let at = marker_center(&timeline.view().scene, 8);
    let clicked = timeline.click_at(at).cloned();
    assert_eq!(clicked.as_ref(), Some(&expected));
    assert_eq!(clicks.borrow().as_slice(), [expected]);
    assert_eq!(timeline.view().hover, HoverState::Idle);

    assert!(timeline.click_at(Point::new(500.0, 5.0)).is_none());
    assert_eq!(clicks.borrow().len(), 1);
}

#[test]
fn init_replaces_the_click_handler() {
    let first: Rc<RefCell<usize>> = Rc::default();
    let second: Rc<RefCell<usize>> = Rc::default();
    let (a, b) = (Rc::clone(&first), Rc::clone(&second));

    let mut timeline = Timeline::new(config());
    timeline.init(fixture(), Some(Box::new(move |_: &Event| *a.borrow_mut() += 1)));
    timeline.init(fixture(), Some(Box::new(move |_: &Event| *b.borrow_mut() += 1)));
    assert!(timeline.click(0));

    assert_eq!(*first.borrow(), 0);
    assert_eq!(*second.borrow(), 1);
    assert_eq!(Rc::strong_count(&first), 1);
}

#[test]
fn hovered_marker_leaving_the_viewport_returns_to_idle() {
    let mut timeline = loaded();
    timeline.pointer_enter(&HitTarget::Marker { source: 0 }, Point::new(0.0, 120.0));
    assert!(timeline.view().sync_legend_visible);

    let start = start_of(&timeline);
    assert!(timeline.zoom_to(start + 20.0 * SECOND, start + 60.0 * SECOND));
    let view = timeline.view();
    assert!(!view.scene.has_marker(0));
    assert_eq!(view.hover, HoverState::Idle);
    assert!(view.tooltip.is_none());
    assert!(faded_sources(&view.scene).is_empty());
}

#[test]
fn single_event_sits_mid_width() {
    let mut data = fixture();
    data.events.truncate(1);
    data.event_pairs.clear();

    let mut timeline = Timeline::new(config());
    timeline.init(data, None);
    let center = marker_center(&timeline.view().scene, 0);
    assert_eq!(center.x, 500.0);

    assert!(!timeline.zoom_to(0.0, f64::MAX));
    assert!(!timeline.view().reset_visible);
}

#[test]
fn job_logs_feed_the_timeline() {
    let namer = JobNamer::new([r"^(?:[^-]+-){5}(?P<name>[^@]+)@"]).expect("pattern compiles");
    let entry = |ts: &str, name: &str| LogEntry {
        timestamp: Some(ts.to_string()),
        event_type: Some("mutex".into()),
        message: format!("[debug] <<< testapi::{name}(name=\"ready\")"),
        pairing_key: Some("ready".into()),
        event_name: Some(name.into()),
    };
    let logs = [
        JobLog {
            job_id: "20".into(),
            error: None,
            entries: vec![entry("2025-09-01T10:00:00Z", "mutex_create")],
        },
        JobLog {
            job_id: "21".into(),
            error: None,
            entries: vec![
                LogEntry::default(),
                entry("2025-09-01T10:00:07Z", "mutex_unlock"),
            ],
        },
    ];

    let events = timeline_events(&logs).expect("timestamps parse");
    let (event_pairs, _) = find_pairs(&events);
    let data = TimelineData {
        jobs: vec![
            namer.job("20", "sle-16.0-Online-x86_64-Build1.1-nfs_server@64bit"),
            namer.job("21", "sle-16.0-Online-x86_64-Build1.1-nfs_client@64bit"),
        ],
        events,
        event_pairs,
        ..TimelineData::default()
    };

    let mut timeline = Timeline::new(config());
    timeline.init(data, None);
    let view = timeline.view();
    assert_eq!(view.scene.lifeline_count(), 2);
    assert_eq!(view.legend.sync.len(), 1);
    assert_eq!(view.legend.sync[0].label, "Mutex signal");

    let lanes = timeline.lanes().expect("data loaded");
    assert_eq!(lanes.label_of("21").map(SharedStr::as_str), Some("nfs_client"));
    assert_eq!(timeline.data().map(|d| d.events[1].log_index), Some(1));
}
