//! Integration tests: loading and saving whole graphs through the session.

use flow_core::{LintSeverity, LintTarget, NodeId, NodeKind, Point, Selection, Size, Snapshot, Vec2};
use flow_editor::{EditorError, EditorSession, InputEvent};
use pretty_assertions::assert_eq;

const VIEWPORT: Size = Size::new(800.0, 600.0);

fn loaded() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut s = EditorSession::new(VIEWPORT);
    s.load_json(include_str!("fixtures/onboarding.json")).unwrap();
    s
}

#[test]
fn fixture_loads_completely() {
    let s = loaded();
    assert_eq!(s.nodes().len(), 5);
    assert_eq!(s.connections().len(), 4);

    let task = s.nodes().get(NodeId::intern("task_1")).unwrap();
    assert_eq!(task.kind, NodeKind::Task);
    assert_eq!(task.description.as_deref(), Some("HR gathers signed forms"));
    assert_eq!(task.properties["slaHours"], serde_json::json!(48));

    let note = s.nodes().get(NodeId::intern("notification_1")).unwrap();
    let style = note.style.as_ref().unwrap();
    assert_eq!(style.background_color.as_deref(), Some("#fff7e6"));
}

#[test]
fn snapshot_round_trips_through_json() {
    let s = loaded();
    let json = s.snapshot().to_json().unwrap();

    let mut other = EditorSession::new(VIEWPORT);
    other.load_json(&json).unwrap();
    assert_eq!(other.snapshot(), s.snapshot());
}

#[test]
fn load_replaces_graph_and_clears_selection() {
    let mut s = loaded();
    s.select(Selection::Node(NodeId::intern("task_1")));
    s.load_snapshot(Snapshot::default()).unwrap();
    assert!(s.nodes().is_empty());
    assert!(s.connections().is_empty());
    assert_eq!(s.selection(), Selection::None);
}

#[test]
fn load_keeps_current_view() {
    let mut s = EditorSession::new(VIEWPORT);
    s.zoom_by(0.5);
    s.pan(Vec2::new(15.0, 25.0));
    let before = s.transform();
    s.load_json(include_str!("fixtures/onboarding.json")).unwrap();
    assert_eq!(s.transform(), before);
}

#[test]
fn load_while_connecting_fails_and_keeps_graph() {
    let mut s = loaded();
    assert!(s.begin_connection(NodeId::intern("start_1")));
    let err = s.load_snapshot(Snapshot::default()).unwrap_err();
    assert!(matches!(err, EditorError::Busy("connecting")));
    assert_eq!(err.to_string(), "cannot replace the graph while connecting is in progress");
    assert_eq!(s.nodes().len(), 5);
}

#[test]
fn malformed_json_is_an_error() {
    let mut s = loaded();
    let err = s.load_json("{\"nodes\": [").unwrap_err();
    assert!(matches!(err, EditorError::Snapshot(_)));
    assert_eq!(s.nodes().len(), 5);
}

#[test]
fn invalid_entries_are_dropped_on_load() {
    let mut s = EditorSession::new(VIEWPORT);
    let json = r#"{
        "nodes": [
            { "id": "a", "type": "start", "position": { "x": -20, "y": 10 }, "size": { "width": 0, "height": 60 }, "label": "A" },
            { "id": "a", "type": "end", "position": { "x": 0, "y": 0 }, "size": { "width": 120, "height": 60 }, "label": "dup" },
            { "id": "b", "type": "end", "position": { "x": 300, "y": 0 }, "size": { "width": 120, "height": 60 }, "label": "B" }
        ],
        "connections": [
            { "id": "ok", "source": "a", "target": "b" },
            { "id": "loop", "source": "b", "target": "b" },
            { "id": "dangling", "source": "a", "target": "ghost" },
            { "id": "ok", "source": "b", "target": "a" }
        ]
    }"#;
    s.load_json(json).unwrap();

    assert_eq!(s.nodes().len(), 2);
    let a = s.nodes().get(NodeId::intern("a")).unwrap();
    assert_eq!(a.label, "A");
    assert_eq!(a.position, Point::new(0.0, 10.0));
    assert_eq!(a.size, NodeKind::Start.default_size());
    assert_eq!(s.connections().len(), 1);
}

#[test]
fn fit_frames_single_square_node() {
    let mut s = EditorSession::new(VIEWPORT);
    s.load_json(
        r#"{"nodes":[{"id":"sq","type":"task","position":{"x":0,"y":0},
            "size":{"width":200,"height":200},"label":"Square"}]}"#,
    )
    .unwrap();
    assert!(s.fit_to_view());
    assert_eq!(s.transform().scale(), 1.0);
    assert_eq!(s.transform().offset(), Vec2::new(300.0, 200.0));
}

#[test]
fn lint_flags_only_the_dangling_notification() {
    let s = loaded();
    let diags = s.lint();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, "dead-end");
    assert_eq!(diags[0].severity, LintSeverity::Info);
    assert_eq!(
        diags[0].target,
        LintTarget::Node(NodeId::intern("notification_1"))
    );
}

#[test]
fn editing_after_load_keeps_ids_unique() {
    let mut s = loaded();
    s.handle(&InputEvent::drop(10.0, 400.0, "task"));
    let id = s.selection().node().unwrap();
    assert_ne!(id, NodeId::intern("task_1"));
    assert_eq!(s.nodes().len(), 6);
}
