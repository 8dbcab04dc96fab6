//! Node registry: the set of placed nodes, in paint order.
//!
//! Later nodes are painted on top and win hit tests. Every operation on an
//! unknown ID is a no-op that reports `false`/`None`; a stale ID arriving from
//! a queued event must never break the editor.

use crate::geometry::clamp_non_negative;
use crate::id::NodeId;
use crate::model::{Node, NodeKind, NodePatch};
use kurbo::Point;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl NodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index.get(&id).map(|&i| &mut self.nodes[i])
    }

    /// Nodes in paint order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// A generated ID not already used by this registry.
    fn fresh_id(&self, kind: NodeKind) -> NodeId {
        loop {
            let id = NodeId::with_prefix(kind.as_str());
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// Create a node of `kind` with default size/label at `position`
    /// (clamped to non-negative).
    pub fn create(&mut self, kind: NodeKind, position: Point) -> &Node {
        let id = self.fresh_id(kind);
        let node = Node::new(id, kind, position);
        log::debug!("create {kind} node {id} at ({:.1}, {:.1})", node.position.x, node.position.y);
        self.push(node)
    }

    /// Insert a fully-formed node (e.g. from a snapshot or a duplicate).
    /// Returns `false` if the ID is already taken.
    pub fn insert(&mut self, mut node: Node) -> bool {
        if self.contains(node.id) {
            return false;
        }
        node.position = clamp_non_negative(node.position);
        self.push(node);
        true
    }

    fn push(&mut self, node: Node) -> &Node {
        let i = self.nodes.len();
        self.index.insert(node.id, i);
        self.nodes.push(node);
        &self.nodes[i]
    }

    /// Clone `id` with a fresh ID at `position`. Size is carried over.
    pub fn duplicate(&mut self, id: NodeId, position: Point) -> Option<NodeId> {
        let mut copy = self.get(id)?.clone();
        copy.id = self.fresh_id(copy.kind);
        copy.position = clamp_non_negative(position);
        let new_id = copy.id;
        self.push(copy);
        Some(new_id)
    }

    /// Move a node's top-left corner; components are clamped to `>= 0`.
    pub fn move_to(&mut self, id: NodeId, position: Point) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.position = clamp_non_negative(position);
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, id: NodeId, patch: NodePatch) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a node. Connections are not touched here; the owner of both
    /// registries is responsible for the cascade.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let i = self.index.remove(&id)?;
        let node = self.nodes.remove(i);
        self.rebuild_index_from(i);
        Some(node)
    }

    fn rebuild_index_from(&mut self, start: usize) {
        for (i, node) in self.nodes.iter().enumerate().skip(start) {
            self.index.insert(node.id, i);
        }
    }
}
