//! Property-based invariant tests for the node and connection registries.
//!
//! 1. Positions stay non-negative after any create/move sequence
//! 2. No connection is a self-loop or dangles after any op sequence
//! 3. Deleting a node removes exactly the connections touching it
//! 4. Capture/restore preserves every entry of a valid graph
//! 5. Zoom sequences never leave `[MIN_SCALE, MAX_SCALE]`
//! 6. `to_screen(to_canvas(p)) == p` for any valid transform

use flow_core::geometry::clamp_scale;
use flow_core::snapshot::{capture, restore};
use flow_core::{
    ConnectionRegistry, MAX_SCALE, MIN_SCALE, NodeId, NodeKind, NodeRegistry, Point, Transform,
    Vec2,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// Registry operations. Node references are indices into the list of live
/// IDs, taken modulo its length.
#[derive(Debug, Clone)]
enum Op {
    Create(usize, f64, f64),
    Move(usize, f64, f64),
    Connect(usize, usize),
    Delete(usize),
}

fn coord() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0..NodeKind::ALL.len(), coord(), coord()).prop_map(|(k, x, y)| Op::Create(k, x, y)),
        1 => (any::<usize>(), coord(), coord()).prop_map(|(i, x, y)| Op::Move(i, x, y)),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Connect(a, b)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn assert_invariants(nodes: &NodeRegistry, conns: &ConnectionRegistry) {
    for node in nodes.iter() {
        assert!(node.position.x >= 0.0 && node.position.y >= 0.0, "{node:?}");
    }
    for conn in conns.iter() {
        assert_ne!(conn.source, conn.target, "self-loop {conn:?}");
        assert!(nodes.contains(conn.source), "dangling source {conn:?}");
        assert!(nodes.contains(conn.target), "dangling target {conn:?}");
    }
}

/// Apply `ops`, checking invariants after every step.
fn apply_ops(ops: &[Op]) -> (NodeRegistry, ConnectionRegistry) {
    let mut nodes = NodeRegistry::new();
    let mut conns = ConnectionRegistry::new();
    let mut ids: Vec<NodeId> = Vec::new();

    for op in ops {
        match *op {
            Op::Create(kind, x, y) => {
                ids.push(nodes.create(NodeKind::ALL[kind], Point::new(x, y)).id);
            }
            Op::Move(i, x, y) if !ids.is_empty() => {
                nodes.move_to(ids[i % ids.len()], Point::new(x, y));
            }
            Op::Connect(a, b) if !ids.is_empty() => {
                let _ = conns.connect(&nodes, ids[a % ids.len()], ids[b % ids.len()]);
            }
            Op::Delete(i) if !ids.is_empty() => {
                let id = ids.swap_remove(i % ids.len());
                let before: Vec<_> = conns.iter().map(|c| (c.id, c.touches(id))).collect();
                nodes.remove(id);
                conns.cascade_delete_for_node(id);
                for (cid, touched) in before {
                    assert_eq!(conns.contains(cid), !touched, "{cid} after deleting {id}");
                }
            }
            _ => {}
        }
        assert_invariants(&nodes, &conns);
    }
    (nodes, conns)
}

// ═══════════════════════════════════════════════════════════════════════
// Registries
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn op_sequences_keep_graph_invariants(ops in prop::collection::vec(op_strategy(), 0..300)) {
        apply_ops(&ops);
    }

    #[test]
    fn capture_restore_keeps_valid_graph(ops in prop::collection::vec(op_strategy(), 0..150)) {
        let (nodes, conns) = apply_ops(&ops);
        let (n2, c2) = restore(capture(&nodes, &conns));
        prop_assert_eq!(n2.len(), nodes.len());
        prop_assert_eq!(c2.len(), conns.len());
        prop_assert_eq!(capture(&n2, &c2), capture(&nodes, &conns));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Transform
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zoom_sequences_stay_in_bounds(deltas in prop::collection::vec(-2.0f64..2.0, 1..200)) {
        let mut t = Transform::IDENTITY;
        for delta in deltas {
            t.zoom_by(delta);
            prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&t.scale()));
            prop_assert_eq!(clamp_scale(t.scale()), t.scale());
        }
    }

    #[test]
    fn screen_canvas_roundtrip(
        scale in MIN_SCALE..=MAX_SCALE,
        ox in coord(),
        oy in coord(),
        px in coord(),
        py in coord(),
    ) {
        let t = Transform::new(scale, Vec2::new(ox, oy));
        let p = Point::new(px, py);
        let back = t.to_screen(t.to_canvas(p));
        prop_assert!((back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6, "{p:?} -> {back:?}");
    }
}
