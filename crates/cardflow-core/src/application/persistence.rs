//! Persistence gateway
//!
//! Mirrors the store into a single canonical durable slot and hydrates it
//! back on startup. The legacy secondary node-list slot is gone: consumers
//! that want a bare node array get it derived from the canonical snapshot on
//! read, so the two representations can no longer diverge.

use std::sync::Arc;

use tracing::debug;

use crate::domain::graph::Node;
use crate::domain::repository::{FlowSnapshot, SnapshotRepository};
use crate::domain::store::FlowStore;
use crate::FlowError;

/// The canonical durable slot name
pub const DEFAULT_SLOT: &str = "rcs-storage";

/// Writes the durable projection of the store after every mutation and
/// reads it back on startup.
pub struct PersistenceGateway {
    repository: Arc<dyn SnapshotRepository>,
    slot: String,
}

impl PersistenceGateway {
    /// Create a gateway over the given repository, bound to the canonical
    /// slot
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self::with_slot(repository, DEFAULT_SLOT)
    }

    /// Create a gateway bound to a specific slot name
    pub fn with_slot(repository: Arc<dyn SnapshotRepository>, slot: impl Into<String>) -> Self {
        Self {
            repository,
            slot: slot.into(),
        }
    }

    /// The slot this gateway reads and writes
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Serialize the store's durable projection into the slot, replacing any
    /// prior value
    pub async fn persist(&self, store: &FlowStore) -> Result<(), FlowError> {
        let snapshot = FlowSnapshot::new(store.nodes().to_vec(), store.connections().to_vec());
        debug!(
            slot = %self.slot,
            nodes = snapshot.nodes.len(),
            connections = snapshot.connections.len(),
            "persisting snapshot"
        );
        self.repository.save(&self.slot, &snapshot).await
    }

    /// Read the prior snapshot from the slot. An absent slot yields empty
    /// sequences, not an error.
    pub async fn hydrate(&self) -> Result<FlowSnapshot, FlowError> {
        match self.repository.load(&self.slot).await? {
            Some(snapshot) => {
                debug!(
                    slot = %self.slot,
                    nodes = snapshot.nodes.len(),
                    connections = snapshot.connections.len(),
                    "hydrated snapshot"
                );
                Ok(snapshot)
            }
            None => {
                debug!(slot = %self.slot, "no prior snapshot, starting empty");
                Ok(FlowSnapshot::default())
            }
        }
    }

    /// The bare node sequence, derived from the canonical snapshot on read.
    ///
    /// Replaces the old independently-written node-list slot.
    pub async fn node_cache(&self) -> Result<Vec<Node>, FlowError> {
        Ok(self.hydrate().await?.nodes)
    }

    /// Remove the durable snapshot
    pub async fn reset(&self) -> Result<(), FlowError> {
        self.repository.clear(&self.slot).await
    }
}
