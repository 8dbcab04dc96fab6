//! Process graph data model.
//!
//! A process is a directed graph: typed nodes placed on an unbounded canvas
//! and connections wiring an output of one node to another node. Node
//! `properties` and `style` are carried for the host application and are
//! never interpreted by the editor core.

use crate::geometry::clamp_non_negative;
use crate::id::{ConnectionId, NodeId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The fixed palette of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Task,
    Decision,
    Parallel,
    Timer,
    Notification,
    Process,
    Database,
    Integration,
}

/// Geometry and label a freshly created node receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDefaults {
    pub width: f64,
    pub height: f64,
    pub label: &'static str,
}

impl NodeKind {
    pub const ALL: [NodeKind; 10] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Task,
        NodeKind::Decision,
        NodeKind::Parallel,
        NodeKind::Timer,
        NodeKind::Notification,
        NodeKind::Process,
        NodeKind::Database,
        NodeKind::Integration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Task => "task",
            NodeKind::Decision => "decision",
            NodeKind::Parallel => "parallel",
            NodeKind::Timer => "timer",
            NodeKind::Notification => "notification",
            NodeKind::Process => "process",
            NodeKind::Database => "database",
            NodeKind::Integration => "integration",
        }
    }

    /// Per-kind default size and label.
    pub fn defaults(self) -> NodeDefaults {
        let (width, height, label) = match self {
            NodeKind::Start => (120.0, 60.0, "Start"),
            NodeKind::End => (120.0, 60.0, "End"),
            NodeKind::Task => (180.0, 80.0, "New Task"),
            NodeKind::Decision => (140.0, 100.0, "Decision"),
            NodeKind::Parallel => (160.0, 60.0, "Parallel"),
            NodeKind::Timer => (140.0, 70.0, "Timer"),
            NodeKind::Notification => (180.0, 80.0, "Notification"),
            NodeKind::Process => (180.0, 80.0, "Process"),
            NodeKind::Database => (160.0, 80.0, "Database"),
            NodeKind::Integration => (180.0, 80.0, "Integration"),
        };
        NodeDefaults {
            width,
            height,
            label,
        }
    }

    pub fn default_size(self) -> Size {
        let d = self.defaults();
        Size::new(d.width, d.height)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the palette kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind `{0}`")]
pub struct UnknownNodeKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

// ─── Node ────────────────────────────────────────────────────────────────

/// Opaque, kind-specific key/value data (`priority`, `assignee`, `condition`, ...).
pub type Properties = BTreeMap<String, serde_json::Value>;

/// Visual overrides. A rendering hint only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

/// A placed node. `position` is the canvas-space top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(alias = "type")]
    pub kind: NodeKind,
    pub position: Point,
    pub size: Size,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

impl Node {
    /// A node with the kind's default size and label at a clamped position.
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        let defaults = kind.defaults();
        Self {
            id,
            kind,
            position: clamp_non_negative(position),
            size: Size::new(defaults.width, defaults.height),
            label: defaults.label.to_string(),
            description: None,
            properties: Properties::new(),
            style: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Where outgoing connections attach (right edge, vertical middle).
    pub fn output_port(&self) -> Point {
        let b = self.bounds();
        Point::new(b.x1, b.center().y)
    }

    /// Where incoming connections attach (left edge, vertical middle).
    pub fn input_port(&self) -> Point {
        let b = self.bounds();
        Point::new(b.x0, b.center().y)
    }

    /// Merge a partial update. Identity, kind and geometry are untouched.
    pub fn apply_patch(&mut self, patch: NodePatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(description) = patch.description {
            self.description = (!description.is_empty()).then_some(description);
        }
        if let Some(properties) = patch.properties {
            self.properties.extend(properties);
        }
        if let Some(style) = patch.style {
            self.style = Some(style);
        }
    }
}

/// Partial node data from a property panel. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub label: Option<String>,
    /// An empty string clears the description.
    pub description: Option<String>,
    /// Merged key-wise into the existing properties.
    pub properties: Option<Properties>,
    pub style: Option<NodeStyle>,
}

// ─── Connections ─────────────────────────────────────────────────────────

/// How a connection path is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    #[default]
    Default,
    Smooth,
    Step,
    Straight,
}

/// A directed edge `source → target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, alias = "type")]
    pub kind: ConnectionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Connection {
    pub fn new(id: ConnectionId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            kind: ConnectionKind::Default,
            label: None,
        }
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    pub fn apply_patch(&mut self, patch: ConnectionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(label) = patch.label {
            self.label = (!label.is_empty()).then_some(label);
        }
    }
}

/// Partial connection update. An empty label clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionPatch {
    pub kind: Option<ConnectionKind>,
    pub label: Option<String>,
}

// ─── Selection ───────────────────────────────────────────────────────────

/// What the property panel is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Connection(ConnectionId),
}

impl Selection {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Selection::Node(id) => Some(*id),
            _ => None,
        }
    }
}
