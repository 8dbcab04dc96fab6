//! Connection registry: directed edges between placed nodes.
//!
//! Edges live in a `StableDiGraph` whose vertices are node IDs, so removing a
//! node's vertex drops exactly its incident edges in O(incident). Vertices are
//! created lazily the first time a node takes part in a connection.
//!
//! Parallel edges (same ordered pair) and reverse edges are allowed.

use crate::id::{ConnectionId, NodeId};
use crate::model::{Connection, ConnectionPatch};
use crate::nodes::NodeRegistry;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::{Bfs, EdgeRef};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Why a connection could not be added.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionRejected {
    #[error("connection from `{0}` to itself")]
    SelfLoop(NodeId),

    #[error("source node `{0}` does not exist")]
    UnknownSource(NodeId),

    #[error("target node `{0}` does not exist")]
    UnknownTarget(NodeId),

    #[error("connection id `{0}` is already in use")]
    DuplicateId(ConnectionId),
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    graph: StableDiGraph<NodeId, Connection>,
    vertices: HashMap<NodeId, NodeIndex>,
    edges: HashMap<ConnectionId, EdgeIndex>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.edges.contains_key(&id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.edges
            .get(&id)
            .and_then(|&e| self.graph.edge_weight(e))
    }

    /// All connections, in edge-slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_weight(e))
    }

    fn vertex(&mut self, node: NodeId) -> NodeIndex {
        *self
            .vertices
            .entry(node)
            .or_insert_with(|| self.graph.add_node(node))
    }

    fn validate(
        &self,
        nodes: &NodeRegistry,
        source: NodeId,
        target: NodeId,
    ) -> Result<(), ConnectionRejected> {
        if source == target {
            return Err(ConnectionRejected::SelfLoop(source));
        }
        if !nodes.contains(source) {
            return Err(ConnectionRejected::UnknownSource(source));
        }
        if !nodes.contains(target) {
            return Err(ConnectionRejected::UnknownTarget(target));
        }
        Ok(())
    }

    /// Add `source → target` with a generated ID and default style.
    pub fn connect(
        &mut self,
        nodes: &NodeRegistry,
        source: NodeId,
        target: NodeId,
    ) -> Result<ConnectionId, ConnectionRejected> {
        self.validate(nodes, source, target)?;
        let id = loop {
            let id = ConnectionId::generate();
            if !self.contains(id) {
                break id;
            }
        };
        self.add(Connection::new(id, source, target));
        log::debug!("connect {source} -> {target} as {id}");
        Ok(id)
    }

    /// Insert a fully-formed connection (e.g. from a snapshot).
    pub fn insert(
        &mut self,
        nodes: &NodeRegistry,
        connection: Connection,
    ) -> Result<(), ConnectionRejected> {
        if self.contains(connection.id) {
            return Err(ConnectionRejected::DuplicateId(connection.id));
        }
        self.validate(nodes, connection.source, connection.target)?;
        self.add(connection);
        Ok(())
    }

    fn add(&mut self, connection: Connection) {
        let a = self.vertex(connection.source);
        let b = self.vertex(connection.target);
        let id = connection.id;
        let e = self.graph.add_edge(a, b, connection);
        self.edges.insert(id, e);
    }

    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection> {
        let e = self.edges.remove(&id)?;
        self.graph.remove_edge(e)
    }

    pub fn update(&mut self, id: ConnectionId, patch: ConnectionPatch) -> bool {
        match self
            .edges
            .get(&id)
            .and_then(|&e| self.graph.edge_weight_mut(e))
        {
            Some(connection) => {
                connection.apply_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Remove every connection whose source or target is `node`.
    /// Returns the removed IDs.
    pub fn cascade_delete_for_node(&mut self, node: NodeId) -> SmallVec<[ConnectionId; 4]> {
        let Some(v) = self.vertices.remove(&node) else {
            return SmallVec::new();
        };
        let removed: SmallVec<[ConnectionId; 4]> = self
            .graph
            .edges_directed(v, Direction::Outgoing)
            .chain(self.graph.edges_directed(v, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        for id in &removed {
            self.edges.remove(id);
        }
        self.graph.remove_node(v);
        if !removed.is_empty() {
            log::debug!("cascade removed {} connection(s) of {node}", removed.len());
        }
        removed
    }

    /// Connections leaving `node`.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &Connection> + '_ {
        self.directed(node, Direction::Outgoing)
    }

    /// Connections arriving at `node`.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &Connection> + '_ {
        self.directed(node, Direction::Incoming)
    }

    fn directed(&self, node: NodeId, dir: Direction) -> impl Iterator<Item = &Connection> + '_ {
        self.vertices
            .get(&node)
            .into_iter()
            .flat_map(move |&v| self.graph.edges_directed(v, dir).map(|e| e.weight()))
    }

    /// Every node reachable from `start` by following connections (including `start`).
    pub fn reachable_from(&self, start: NodeId) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        seen.insert(start);
        if let Some(&v) = self.vertices.get(&start) {
            let mut bfs = Bfs::new(&self.graph, v);
            while let Some(ix) = bfs.next(&self.graph) {
                seen.insert(self.graph[ix]);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionKind, NodeKind};
    use kurbo::Point;

    fn three_nodes() -> (NodeRegistry, NodeId, NodeId, NodeId) {
        let mut nodes = NodeRegistry::new();
        let a = nodes.create(NodeKind::Start, Point::new(0.0, 0.0)).id;
        let b = nodes.create(NodeKind::Task, Point::new(200.0, 0.0)).id;
        let c = nodes.create(NodeKind::End, Point::new(400.0, 0.0)).id;
        (nodes, a, b, c)
    }

    #[test]
    fn rejects_self_loop_and_dangling_endpoints() {
        let (nodes, a, _, _) = three_nodes();
        let mut conns = ConnectionRegistry::new();
        let ghost = NodeId::intern("ghost_node");

        assert_eq!(
            conns.connect(&nodes, a, a),
            Err(ConnectionRejected::SelfLoop(a))
        );
        assert_eq!(
            conns.connect(&nodes, ghost, a),
            Err(ConnectionRejected::UnknownSource(ghost))
        );
        assert_eq!(
            conns.connect(&nodes, a, ghost),
            Err(ConnectionRejected::UnknownTarget(ghost))
        );
        assert!(conns.is_empty());
    }

    #[test]
    fn parallel_and_reverse_edges_are_kept() {
        let (nodes, a, b, _) = three_nodes();
        let mut conns = ConnectionRegistry::new();
        let first = conns.connect(&nodes, a, b).unwrap();
        let second = conns.connect(&nodes, a, b).unwrap();
        let back = conns.connect(&nodes, b, a).unwrap();
        assert_ne!(first, second);
        assert_eq!(conns.len(), 3);
        assert_eq!(conns.outgoing(a).count(), 2);
        assert_eq!(conns.incoming(a).count(), 1);
        assert_eq!(conns.get(back).unwrap().target, a);
    }

    #[test]
    fn cascade_removes_only_incident_connections() {
        let (nodes, a, b, c) = three_nodes();
        let mut conns = ConnectionRegistry::new();
        let ab = conns.connect(&nodes, a, b).unwrap();
        let bc = conns.connect(&nodes, b, c).unwrap();
        let ac = conns.connect(&nodes, a, c).unwrap();
        let ca = conns.connect(&nodes, c, a).unwrap();

        let mut removed = conns.cascade_delete_for_node(a).into_vec();
        removed.sort_by_key(|id| id.as_str().to_string());
        let mut expected = vec![ab, ac, ca];
        expected.sort_by_key(|id| id.as_str().to_string());
        assert_eq!(removed, expected);

        assert_eq!(conns.len(), 1);
        assert!(conns.contains(bc));
        assert!(conns.iter().all(|conn| !conn.touches(a)));
    }

    #[test]
    fn cascade_on_unconnected_node_is_noop() {
        let (nodes, a, b, c) = three_nodes();
        let mut conns = ConnectionRegistry::new();
        conns.connect(&nodes, a, b).unwrap();
        assert!(conns.cascade_delete_for_node(c).is_empty());
        assert_eq!(conns.len(), 1);
    }

    #[test]
    fn update_and_remove_by_id() {
        let (nodes, a, b, _) = three_nodes();
        let mut conns = ConnectionRegistry::new();
        let id = conns.connect(&nodes, a, b).unwrap();
        assert!(conns.update(
            id,
            ConnectionPatch {
                kind: Some(ConnectionKind::Step),
                label: Some("approved".into()),
            }
        ));
        let conn = conns.get(id).unwrap();
        assert_eq!(conn.kind, ConnectionKind::Step);
        assert_eq!(conn.label.as_deref(), Some("approved"));

        assert!(conns.remove(id).is_some());
        assert!(conns.remove(id).is_none());
        assert!(!conns.update(id, ConnectionPatch::default()));
    }

    #[test]
    fn reachability_follows_direction() {
        let (nodes, a, b, c) = three_nodes();
        let mut conns = ConnectionRegistry::new();
        conns.connect(&nodes, a, b).unwrap();
        conns.connect(&nodes, c, b).unwrap();
        let reach = conns.reachable_from(a);
        assert!(reach.contains(&a));
        assert!(reach.contains(&b));
        assert!(!reach.contains(&c));
    }

    #[test]
    fn insert_rejects_duplicate_connection_id() {
        let (nodes, a, b, c) = three_nodes();
        let mut conns = ConnectionRegistry::new();
        let id = ConnectionId::intern("e1");
        conns
            .insert(&nodes, Connection::new(id, a, b))
            .unwrap();
        assert_eq!(
            conns.insert(&nodes, Connection::new(id, b, c)),
            Err(ConnectionRejected::DuplicateId(id))
        );
    }
}
