//! The canonical flow graph store
//!
//! Owns the authoritative node and connection sequences and every structural
//! edit applied to them. Single-writer and synchronous: callers mutate it on
//! one logical thread and persistence is layered on top by the application
//! services. Every mutator rebuilds the affected sequence rather than
//! mutating cells in place, so consumers that compare by reference observe a
//! fresh sequence on every change.

use tracing::{debug, warn};

use super::graph::{Connection, Node, NodeChange};

/// The mutable collection of flow nodes and connections
#[derive(Debug, Clone, Default)]
pub struct FlowStore {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl FlowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing sequences, e.g. from a snapshot
    pub fn with_contents(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    /// The current node sequence
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The current connection sequence
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Whether both sequences are empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    /// Look up a node by id
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a connection by id
    pub fn find_connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Replace the entire node sequence wholesale.
    ///
    /// No uniqueness validation is performed here; bulk callers (import,
    /// hydrate) own that responsibility.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        debug!(count = nodes.len(), "replacing node sequence");
        self.nodes = nodes;
    }

    /// Append a node. A duplicate id is rejected as a no-op.
    ///
    /// Returns whether the node was inserted.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.find_node(&node.id).is_some() {
            warn!(node_id = %node.id, "rejected add_node: duplicate id");
            return false;
        }
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        self.nodes = nodes;
        true
    }

    /// Replace the node with a matching id, last write wins.
    ///
    /// Returns whether a node was replaced; a missing id is a no-op.
    pub fn update_node(&mut self, node: Node) -> bool {
        if self.find_node(&node.id).is_none() {
            debug!(node_id = %node.id, "update_node missed: no such node");
            return false;
        }
        self.nodes = self
            .nodes
            .iter()
            .map(|n| if n.id == node.id { node.clone() } else { n.clone() })
            .collect();
        true
    }

    /// Remove a node by id, cascading removal of every connection that
    /// references it as source or target.
    ///
    /// Returns whether a node was removed.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.find_node(id).is_none() {
            return false;
        }
        self.nodes = self.nodes.iter().filter(|n| n.id != id).cloned().collect();

        let before = self.connections.len();
        self.connections = self
            .connections
            .iter()
            .filter(|c| !c.touches(id))
            .cloned()
            .collect();
        let dropped = before - self.connections.len();
        if dropped > 0 {
            debug!(node_id = %id, dropped, "cascaded connection removal");
        }
        true
    }

    /// Fold a batch of canvas-produced deltas into the node sequence,
    /// preserving every field the delta does not touch. Unknown ids are
    /// skipped. Returns whether anything changed.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) -> bool {
        if changes.is_empty() {
            return false;
        }

        let mut changed = false;
        let mut nodes: Vec<Node> = self.nodes.clone();

        for change in changes {
            match change {
                NodeChange::Position {
                    id,
                    position,
                    dragging,
                } => {
                    if let Some(node) = nodes.iter_mut().find(|n| n.id == *id) {
                        if let Some(position) = position {
                            node.position = *position;
                        }
                        if dragging.is_some() {
                            node.dragging = *dragging;
                        }
                        changed = true;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if let Some(node) = nodes.iter_mut().find(|n| n.id == *id) {
                        node.selected = Some(*selected);
                        changed = true;
                    }
                }
                NodeChange::Dimensions { id, dimensions } => {
                    if let Some(node) = nodes.iter_mut().find(|n| n.id == *id) {
                        node.measured = Some(*dimensions);
                        changed = true;
                    }
                }
                NodeChange::Remove { id } => {
                    if nodes.iter().any(|n| n.id == *id) {
                        nodes.retain(|n| n.id != *id);
                        // Removal through the canvas cascades the same way
                        // an explicit remove_node does
                        self.connections = self
                            .connections
                            .iter()
                            .filter(|c| !c.touches(id))
                            .cloned()
                            .collect();
                        changed = true;
                    }
                }
            }
        }

        if changed {
            self.nodes = nodes;
        }
        changed
    }

    /// Append a connection.
    ///
    /// Rejected as a warned no-op when the id already exists or when either
    /// endpoint does not reference an existing node. Returns whether the
    /// connection was inserted.
    pub fn add_connection(&mut self, connection: Connection) -> bool {
        if self.find_connection(&connection.id).is_some() {
            warn!(connection_id = %connection.id, "rejected add_connection: duplicate id");
            return false;
        }
        if self.find_node(&connection.source_id).is_none() {
            warn!(
                connection_id = %connection.id,
                source_id = %connection.source_id,
                "rejected add_connection: missing source node"
            );
            return false;
        }
        if self.find_node(&connection.target_id).is_none() {
            warn!(
                connection_id = %connection.id,
                target_id = %connection.target_id,
                "rejected add_connection: missing target node"
            );
            return false;
        }
        let mut connections = self.connections.clone();
        connections.push(connection);
        self.connections = connections;
        true
    }

    /// Replace the connection with a matching id. Missing id is a no-op.
    ///
    /// Returns whether a connection was replaced.
    pub fn update_connection(&mut self, connection: Connection) -> bool {
        if self.find_connection(&connection.id).is_none() {
            debug!(connection_id = %connection.id, "update_connection missed");
            return false;
        }
        self.connections = self
            .connections
            .iter()
            .map(|c| {
                if c.id == connection.id {
                    connection.clone()
                } else {
                    c.clone()
                }
            })
            .collect();
        true
    }

    /// Remove a connection by id. Returns whether one was removed.
    pub fn remove_connection(&mut self, id: &str) -> bool {
        if self.find_connection(id).is_none() {
            return false;
        }
        self.connections = self
            .connections
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        true
    }

    /// All connections where the node is source or target, in insertion
    /// order. Recomputed per call, never cached.
    pub fn connections_for_node(&self, node_id: &str) -> Vec<Connection> {
        self.connections
            .iter()
            .filter(|c| c.touches(node_id))
            .cloned()
            .collect()
    }

    /// Empty the connection sequence. Used before a bulk import so imported
    /// connections do not accumulate on top of stale ones.
    pub fn clear_connections(&mut self) {
        debug!(count = self.connections.len(), "clearing connections");
        self.connections = Vec::new();
    }
}
