//! Persistence boundary: the `{nodes, connections}` snapshot handed to and
//! received from the process-management backend.
//!
//! Snapshots from outside are untrusted. [`restore`] rebuilds the registries
//! and drops whatever would violate the graph invariants, logging each drop.

use crate::connections::ConnectionRegistry;
use crate::model::{Connection, Node};
use crate::nodes::NodeRegistry;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Serialized graph state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// MessagePack with named fields, so optional fields may be omitted.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// A saved process: the graph plus the input form built next to it.
///
/// `form` belongs to the external form builder and is carried verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub graph: Snapshot,
    #[serde(default)]
    pub form: Vec<serde_json::Value>,
}

impl ProcessDocument {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Capture the registries in paint order.
pub fn capture(nodes: &NodeRegistry, connections: &ConnectionRegistry) -> Snapshot {
    Snapshot {
        nodes: nodes.iter().cloned().collect(),
        connections: connections.iter().cloned().collect(),
    }
}

/// Rebuild registries from an untrusted snapshot.
///
/// - duplicate node IDs: later copies dropped
/// - non-positive or non-finite sizes: replaced by the kind default
/// - negative positions: clamped
/// - self-loops, dangling endpoints, duplicate connection IDs: dropped
pub fn restore(snapshot: Snapshot) -> (NodeRegistry, ConnectionRegistry) {
    let mut nodes = NodeRegistry::new();
    for mut node in snapshot.nodes {
        let size_ok = node.size.width.is_finite()
            && node.size.height.is_finite()
            && node.size.width > 0.0
            && node.size.height > 0.0;
        if !size_ok {
            log::warn!("node {} has invalid size {:?}; using default", node.id, node.size);
            node.size = node.kind.default_size();
        }
        if !node.position.is_finite() {
            log::warn!("node {} has non-finite position; moved to origin", node.id);
            node.position = kurbo::Point::ZERO;
        }
        let id = node.id;
        if !nodes.insert(node) {
            log::warn!("dropping duplicate node id {id}");
        }
    }

    let mut connections = ConnectionRegistry::new();
    for conn in snapshot.connections {
        let id = conn.id;
        if let Err(reason) = connections.insert(&nodes, conn) {
            log::warn!("dropping connection {id}: {reason}");
        }
    }

    (nodes, connections)
}
