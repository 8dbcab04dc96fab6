//! Scene description: everything a renderer needs to paint one frame.
//!
//! A `Scene` is derived from the registries, the transform and a small
//! overlay (selection, hover, connection preview). It is a read-only value;
//! renderers never get a handle that can mutate the editor.
//!
//! Geometry is in canvas space. `transform` (or `affine`) maps it to screen
//! space; `screen_bounds` on nodes is precomputed for DOM overlays such as
//! label editors.

use crate::path::{connection_path, endpoints};
use flow_core::{
    ConnectionId, ConnectionKind, ConnectionRegistry, NodeId, NodeKind, NodeRegistry, NodeStyle,
    Selection, Transform,
};
use kurbo::{Point, Rect};
use serde::Serialize;

/// Transient editor state that affects drawing but not the graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay {
    pub selection: Selection,
    pub hovered: Option<NodeId>,
    /// Source node and current canvas point of an in-progress connection.
    pub preview: Option<(NodeId, Point)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bounds: Rect,
    pub screen_bounds: Rect,
    pub output_port: Point,
    pub input_port: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    pub selected: bool,
    pub hovered: bool,
    /// True while this node is the source of an in-progress connection.
    pub connecting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: ConnectionKind,
    pub from: Point,
    pub to: Point,
    /// SVG path data in canvas space.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub label_position: Point,
    pub selected: bool,
}

/// Temporary edge drawn from the source's center to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviewEdge {
    pub source: NodeId,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub transform: Transform,
    /// Canvas → screen as `[a, b, c, d, e, f]` (CanvasRenderingContext2D order).
    pub affine: [f64; 6],
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewEdge>,
}

impl Scene {
    /// Derive a scene. Edges come first in paint order, nodes on top.
    pub fn build(
        nodes: &NodeRegistry,
        connections: &ConnectionRegistry,
        transform: Transform,
        overlay: &Overlay,
    ) -> Scene {
        let connecting_source = overlay.preview.map(|(source, _)| source);

        let node_views = nodes
            .iter()
            .map(|n| {
                let bounds = n.bounds();
                NodeView {
                    id: n.id,
                    kind: n.kind,
                    label: n.label.clone(),
                    description: n.description.clone(),
                    bounds,
                    screen_bounds: Rect::from_points(
                        transform.to_screen(bounds.origin()),
                        transform.to_screen(Point::new(bounds.x1, bounds.y1)),
                    ),
                    output_port: n.output_port(),
                    input_port: n.input_port(),
                    style: n.style.clone(),
                    selected: overlay.selection == Selection::Node(n.id),
                    hovered: overlay.hovered == Some(n.id),
                    connecting: connecting_source == Some(n.id),
                }
            })
            .collect();

        let edges = connections
            .iter()
            .filter_map(|c| {
                let Some((from, to)) = endpoints(nodes, c) else {
                    log::debug!("scene: skipping {} with missing endpoint", c.id);
                    return None;
                };
                Some(EdgeView {
                    id: c.id,
                    source: c.source,
                    target: c.target,
                    kind: c.kind,
                    from,
                    to,
                    path: connection_path(from, to, c.kind).to_svg(),
                    label: c.label.clone(),
                    label_position: from.midpoint(to),
                    selected: overlay.selection == Selection::Connection(c.id),
                })
            })
            .collect();

        let preview = overlay.preview.and_then(|(source, to)| {
            nodes.get(source).map(|n| PreviewEdge {
                source,
                from: n.center(),
                to,
            })
        });

        Scene {
            transform,
            affine: transform.to_affine().as_coeffs(),
            nodes: node_views,
            edges,
            preview,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: ConnectionId) -> Option<&EdgeView> {
        self.edges.iter().find(|e| e.id == id)
    }
}
