//! Integration tests: pointer and touch gestures (wfd-editor ↔ wfd-core).
//!
//! Drives a `DesignerHost` loaded from a fixture through raw input events
//! and checks the resulting graph. The canvas sits at the page origin with
//! no pan or zoom, so page coordinates equal model coordinates.
//!
//! Connector centres in the fixture (every activity is 90 wide):
//! start.next (45, 49), review.in (245, 9), review.approved (233, 49),
//! review.rejected (257, 49), publish.in (45, 209), archive.in (345, 209),
//! timer.tick (445, 49).

use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use wfd_core::model::{ActivityDefinition, ConnectionDefinition};
use wfd_core::{Vector, Viewport};
use wfd_editor::{DesignerConfig, DesignerHost, InputEvent};

#[derive(Deserialize)]
struct Fixture {
    activities: Vec<ActivityDefinition>,
    connections: Vec<ConnectionDefinition>,
}

fn host_with(config: DesignerConfig) -> DesignerHost {
    let _ = env_logger::builder().is_test(true).try_init();
    let fixture: Fixture =
        serde_json::from_str(include_str!("fixtures/approval_flow.json")).unwrap();
    let mut host = DesignerHost::new(config);
    host.resize(Viewport::new(Vector::ZERO, Vector::new(800.0, 600.0)));
    host.add_activities(&fixture.activities).unwrap();
    host.add_connections(&fixture.connections).unwrap();
    host
}

fn host() -> DesignerHost {
    host_with(DesignerConfig::default())
}

fn edge(out_activity: &str, out: &str, in_activity: &str, input: &str) -> ConnectionDefinition {
    ConnectionDefinition {
        output_activity_name: out_activity.into(),
        output_name: out.into(),
        input_activity_name: in_activity.into(),
        input_name: input.into(),
    }
}

fn drag(host: &mut DesignerHost, from: (f64, f64), to: (f64, f64)) {
    let from = Vector::new(from.0, from.1);
    let to = Vector::new(to.0, to.1);
    host.handle_input(&InputEvent::MouseDown(from)).unwrap();
    host.handle_input(&InputEvent::MouseMove(from.midpoint(to))).unwrap();
    host.handle_input(&InputEvent::MouseMove(to)).unwrap();
    host.handle_input(&InputEvent::MouseUp(to)).unwrap();
}

fn click(host: &mut DesignerHost, at: (f64, f64)) {
    let at = Vector::new(at.0, at.1);
    host.handle_input(&InputEvent::MouseDown(at)).unwrap();
    host.handle_input(&InputEvent::MouseUp(at)).unwrap();
}

const START_NEXT: (f64, f64) = (45.0, 49.0);
const REVIEW_IN: (f64, f64) = (245.0, 9.0);
const REVIEW_APPROVED: (f64, f64) = (233.0, 49.0);
const PUBLISH_IN: (f64, f64) = (45.0, 209.0);
const ARCHIVE_IN: (f64, f64) = (345.0, 209.0);
const TIMER_TICK: (f64, f64) = (445.0, 49.0);
const REVIEW_BODY: (f64, f64) = (210.0, 30.0);
const EMPTY_CANVAS: (f64, f64) = (600.0, 400.0);

// ─── Rewiring ───────────────────────────────────────────────────────────

#[test]
fn rewire_input_onto_new_output() {
    let mut host = host();
    drag(&mut host, REVIEW_IN, TIMER_TICK);

    assert_eq!(
        host.get_connections().unwrap(),
        vec![
            edge("timer", "tick", "review", "in"),
            edge("review", "approved", "publish", "in"),
        ]
    );
    let start = host.designer().get_activity("start").unwrap();
    assert!(start.outputs[0].connections.is_empty());
}

#[test]
fn cancelled_input_rewire_keeps_the_detach() {
    let mut host = host();
    drag(&mut host, REVIEW_IN, EMPTY_CANVAS);

    // The press on an input severs its connection before the drag, and a
    // dropped drag does not restore it.
    assert_eq!(
        host.get_connections().unwrap(),
        vec![edge("review", "approved", "publish", "in")]
    );
    assert_eq!(host.designer().state.graph.connection_count(), 1);
}

#[test]
fn output_drag_onto_taken_input_replaces_it() {
    let mut host = host();
    drag(&mut host, START_NEXT, PUBLISH_IN);

    assert_eq!(
        host.get_connections().unwrap(),
        vec![
            edge("start", "next", "review", "in"),
            edge("start", "next", "publish", "in"),
        ]
    );
    let review = host.designer().get_activity("review").unwrap();
    assert!(review.outputs[0].connections.is_empty());
}

#[test]
fn output_drag_onto_free_input_adds_connection() {
    let mut host = host();
    drag(&mut host, REVIEW_APPROVED, ARCHIVE_IN);
    assert_eq!(
        host.get_connections().unwrap(),
        vec![
            edge("start", "next", "review", "in"),
            edge("review", "approved", "publish", "in"),
            edge("review", "approved", "archive", "in"),
        ]
    );
}

#[test]
fn invalid_drops_leave_graph_unchanged() {
    let mut host = host();
    let before = host.get_connections().unwrap();

    // Same direction.
    drag(&mut host, START_NEXT, TIMER_TICK);
    // Same activity.
    drag(&mut host, REVIEW_APPROVED, REVIEW_IN);
    // Activity body.
    drag(&mut host, START_NEXT, REVIEW_BODY);
    // Off canvas.
    drag(&mut host, START_NEXT, (1200.0, 50.0));

    assert_eq!(host.get_connections().unwrap(), before);
    assert_eq!(host.designer().state.graph.connection_count(), 2);
}

#[test]
fn half_open_connection_blocks_definitions_mid_drag() {
    let mut host = host();
    host.handle_input(&InputEvent::MouseDown(Vector::new(START_NEXT.0, START_NEXT.1)))
        .unwrap();
    host.handle_input(&InputEvent::MouseMove(Vector::new(500.0, 300.0)))
        .unwrap();
    assert!(host.get_connections().is_err());

    host.handle_input(&InputEvent::MouseUp(Vector::new(500.0, 300.0)))
        .unwrap();
    assert_eq!(host.get_connections().unwrap().len(), 2);
}

#[test]
fn touch_drop_uses_last_touched_target() {
    let mut host = host();
    let archive_in = Vector::new(ARCHIVE_IN.0, ARCHIVE_IN.1);
    host.handle_input(&InputEvent::TouchStart(vec![Vector::new(
        TIMER_TICK.0,
        TIMER_TICK.1,
    )]))
    .unwrap();
    host.handle_input(&InputEvent::TouchMove(vec![archive_in, Vector::ZERO]))
        .unwrap();
    host.handle_input(&InputEvent::TouchEnd(vec![])).unwrap();

    assert!(
        host.get_connections()
            .unwrap()
            .contains(&edge("timer", "tick", "archive", "in"))
    );
}

#[test]
fn host_delete_mid_rewire_cancels_the_drag() {
    let mut host = host();
    host.handle_input(&InputEvent::MouseDown(Vector::new(TIMER_TICK.0, TIMER_TICK.1)))
        .unwrap();
    host.handle_input(&InputEvent::MouseMove(Vector::new(ARCHIVE_IN.0, ARCHIVE_IN.1)))
        .unwrap();
    host.delete_activity("publish").unwrap();

    // Hovering archive.in is not a drop.
    assert!(!host.is_capturing());
    assert_eq!(
        host.get_connections().unwrap(),
        vec![edge("start", "next", "review", "in")]
    );
    assert_eq!(host.designer().state.graph.connection_count(), 1);
    let timer = host.designer().get_activity("timer").unwrap();
    assert!(timer.outputs[0].connections.is_empty());

    // The release that follows finds nothing to finish.
    host.handle_input(&InputEvent::MouseUp(Vector::new(ARCHIVE_IN.0, ARCHIVE_IN.1)))
        .unwrap();
    assert_eq!(host.get_connections().unwrap().len(), 1);
}

#[test]
fn host_clear_mid_rewire_leaves_nothing_behind() {
    let mut host = host();
    host.handle_input(&InputEvent::MouseDown(Vector::new(TIMER_TICK.0, TIMER_TICK.1)))
        .unwrap();
    host.handle_input(&InputEvent::MouseMove(Vector::new(ARCHIVE_IN.0, ARCHIVE_IN.1)))
        .unwrap();
    host.clear().unwrap();

    assert!(!host.is_capturing());
    assert!(host.get_activities().is_empty());
    assert_eq!(host.designer().state.graph.connection_count(), 0);
}

// ─── Moving activities ──────────────────────────────────────────────────

#[test]
fn dragging_activity_moves_it_and_its_connectors() {
    let mut host = host();
    drag(&mut host, REVIEW_BODY, (230.0, 50.0));

    let review = host.get_activity("review").unwrap();
    assert_eq!((review.left, review.top), (220.0, 20.0));

    let graph = &host.designer().state.graph;
    let input = graph
        .find_connector("review", wfd_core::Direction::Input, "in")
        .unwrap();
    assert_eq!(graph.connector_position(input).unwrap(), Vector::new(265.0, 29.0));
    // A drag is not a click.
    assert_eq!(host.try_get_selected_activity_name(), None);
}

#[test]
fn drag_under_zoom_uses_model_units() {
    let mut host = host();
    host.handle_input(&InputEvent::Wheel { delta_y: -1.0 }).unwrap();
    host.handle_input(&InputEvent::Wheel { delta_y: -1.0 }).unwrap();
    host.handle_input(&InputEvent::Wheel { delta_y: -1.0 }).unwrap();
    host.handle_input(&InputEvent::Wheel { delta_y: -1.0 }).unwrap();
    // 1.0 + 4 × 0.15 = 1.6
    let scale = host.designer().state.scale();
    assert!((scale - 1.6).abs() < 1e-9);

    // review body at 1.6× sits at x 320..464, y 14.4..78.4
    drag(&mut host, (330.0, 40.0), (362.0, 56.0));
    let review = host.get_activity("review").unwrap();
    assert_eq!((review.left, review.top), (220.0, 10.0));
}

// ─── Pan and zoom ───────────────────────────────────────────────────────

#[test]
fn pan_offsets_scroll_by_pointer_delta() {
    let mut host = host();
    drag(&mut host, EMPTY_CANVAS, (650.0, 380.0));
    assert_eq!(host.designer().state.scroll(), Vector::new(50.0, -20.0));

    drag(&mut host, (100.0, 500.0), (90.0, 520.0));
    assert_eq!(host.designer().state.scroll(), Vector::new(40.0, 0.0));
}

#[test]
fn wheel_steps_and_clamps_scale() {
    let mut down = host();
    down.handle_input(&InputEvent::Wheel { delta_y: 100.0 }).unwrap();
    assert!((down.designer().state.scale() - 0.85).abs() < 1e-9);

    let mut host = host();
    host.handle_input(&InputEvent::Wheel { delta_y: -3.0 }).unwrap();
    assert!((host.designer().state.scale() - 1.15).abs() < 1e-9);

    for _ in 0..20 {
        host.handle_input(&InputEvent::Wheel { delta_y: 1.0 }).unwrap();
    }
    assert!((host.designer().state.scale() - 0.3).abs() < 1e-9);
    for _ in 0..20 {
        host.handle_input(&InputEvent::Wheel { delta_y: -1.0 }).unwrap();
    }
    assert!((host.designer().state.scale() - 2.0).abs() < 1e-9);
}

#[test]
fn zoom_scales_scroll_with_it() {
    let mut host = host();
    drag(&mut host, EMPTY_CANVAS, (700.0, 500.0));
    assert_eq!(host.designer().state.scroll(), Vector::new(100.0, 100.0));

    host.handle_input(&InputEvent::Wheel { delta_y: 1.0 }).unwrap();
    let scroll = host.designer().state.scroll();
    assert!((scroll.x - 85.0).abs() < 1e-9);
    assert!((scroll.y - 85.0).abs() < 1e-9);
}

// ─── Selection and edit ─────────────────────────────────────────────────

#[test]
fn click_selects_and_canvas_click_clears() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut host = host();
    let log = Rc::clone(&events);
    host.on_selected
        .add_listener(move |name| log.borrow_mut().push(format!("selected {name}")));
    let log = Rc::clone(&events);
    host.on_unselected
        .add_listener(move |name| log.borrow_mut().push(format!("unselected {name}")));

    click(&mut host, REVIEW_BODY);
    assert_eq!(host.try_get_selected_activity_name(), Some("review"));

    click(&mut host, (20.0, 30.0));
    assert_eq!(host.try_get_selected_activity_name(), Some("start"));

    click(&mut host, EMPTY_CANVAS);
    assert_eq!(host.try_get_selected_activity_name(), None);

    assert_eq!(
        *events.borrow(),
        vec![
            "selected review".to_string(),
            "unselected review".to_string(),
            "selected start".to_string(),
            "unselected start".to_string(),
        ]
    );
}

#[test]
fn double_click_requests_edit() {
    let edits = Rc::new(RefCell::new(Vec::new()));
    let mut host = host();
    let log = Rc::clone(&edits);
    host.on_edit_requested
        .add_listener(move |name| log.borrow_mut().push(name.to_string()));

    host.handle_input(&InputEvent::DoubleClick(Vector::new(REVIEW_BODY.0, REVIEW_BODY.1)))
        .unwrap();
    host.handle_input(&InputEvent::DoubleClick(Vector::new(EMPTY_CANVAS.0, EMPTY_CANVAS.1)))
        .unwrap();
    assert_eq!(*edits.borrow(), vec!["review".to_string()]);
}

// ─── Read-only ──────────────────────────────────────────────────────────

#[test]
fn read_only_allows_only_panning() {
    let mut host = host_with(DesignerConfig {
        is_read_only: true,
        ..DesignerConfig::default()
    });
    let edits = Rc::new(RefCell::new(0));
    let log = Rc::clone(&edits);
    host.on_edit_requested.add_listener(move |_| *log.borrow_mut() += 1);

    drag(&mut host, REVIEW_IN, TIMER_TICK);
    drag(&mut host, REVIEW_BODY, (300.0, 300.0));
    host.handle_input(&InputEvent::DoubleClick(Vector::new(REVIEW_BODY.0, REVIEW_BODY.1)))
        .unwrap();
    assert_eq!(host.get_connections().unwrap().len(), 2);
    assert_eq!(host.get_activity("review").unwrap().left, 200.0);
    assert_eq!(*edits.borrow(), 0);

    host.select_activity("review").unwrap();
    click(&mut host, EMPTY_CANVAS);
    assert_eq!(host.try_get_selected_activity_name(), Some("review"));

    drag(&mut host, EMPTY_CANVAS, (610.0, 410.0));
    assert_eq!(host.designer().state.scroll(), Vector::new(10.0, 10.0));
}
