//! Snapshot repository trait
//!
//! This module defines the storage-adapter seam for durable flow snapshots.
//! External crates implement [`SnapshotRepository`] to provide different
//! persistence mechanisms; the engine itself never touches a concrete
//! backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::graph::{Connection, Node};
use crate::FlowError;

/// The durable projection of the store: exactly the node and connection
/// sequences, nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlowSnapshot {
    /// The node sequence
    pub nodes: Vec<Node>,

    /// The connection sequence
    pub connections: Vec<Connection>,
}

impl FlowSnapshot {
    /// Snapshot the given sequences
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    /// Whether the snapshot holds nothing
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }
}

/// Repository for durable flow snapshots, keyed by a named slot
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Load the snapshot stored in `slot`, if any. An absent slot is
    /// `Ok(None)`, not an error.
    async fn load(&self, slot: &str) -> Result<Option<FlowSnapshot>, FlowError>;

    /// Replace the snapshot stored in `slot`
    async fn save(&self, slot: &str, snapshot: &FlowSnapshot) -> Result<(), FlowError>;

    /// Remove any snapshot stored in `slot`
    async fn clear(&self, slot: &str) -> Result<(), FlowError>;
}
