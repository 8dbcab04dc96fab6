//! Hit testing: canvas point → what's under the pointer.
//!
//! Nodes are checked topmost first (last painted wins); for each node its
//! output port beats its body. Connections come after all nodes, then empty
//! canvas. Tolerances are given in canvas units; callers convert screen
//! pixels with the transform.

use crate::path::{connection_path, endpoints};
use flow_core::{ConnectionId, ConnectionRegistry, NodeId, NodeRegistry};
use kurbo::{ParamCurveNearest, Point};

/// Flattening accuracy for nearest-point queries on curved paths.
const NEAREST_ACCURACY: f64 = 0.5;

/// What a pointer position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The connection handle on a node's right edge.
    Port(NodeId),
    Node(NodeId),
    Connection(ConnectionId),
    Canvas,
}

impl Hit {
    /// The node under the pointer, whether body or port.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Hit::Port(id) | Hit::Node(id) => Some(*id),
            _ => None,
        }
    }
}

/// Full-priority hit test.
pub fn hit_test(
    nodes: &NodeRegistry,
    connections: &ConnectionRegistry,
    p: Point,
    port_radius: f64,
    connection_tolerance: f64,
) -> Hit {
    let r2 = port_radius * port_radius;
    for node in nodes.iter().rev() {
        if (node.output_port() - p).hypot2() <= r2 {
            return Hit::Port(node.id);
        }
        if node.bounds().contains(p) {
            return Hit::Node(node.id);
        }
    }
    if let Some(id) = connection_at(nodes, connections, p, connection_tolerance) {
        return Hit::Connection(id);
    }
    Hit::Canvas
}

/// Topmost node whose rectangle contains `p`.
pub fn node_at(nodes: &NodeRegistry, p: Point) -> Option<NodeId> {
    nodes
        .iter()
        .rev()
        .find(|n| n.bounds().contains(p))
        .map(|n| n.id)
}

/// Closest connection whose path passes within `tolerance` of `p`.
pub fn connection_at(
    nodes: &NodeRegistry,
    connections: &ConnectionRegistry,
    p: Point,
    tolerance: f64,
) -> Option<ConnectionId> {
    let limit = tolerance * tolerance;
    let mut best: Option<(f64, ConnectionId)> = None;
    for conn in connections.iter() {
        let Some((from, to)) = endpoints(nodes, conn) else {
            continue;
        };
        let path = connection_path(from, to, conn.kind);
        for seg in path.segments() {
            let d2 = seg.nearest(p, NEAREST_ACCURACY).distance_sq;
            if d2 <= limit && best.is_none_or(|(b, _)| d2 < b) {
                best = Some((d2, conn.id));
            }
        }
    }
    best.map(|(_, id)| id)
}
