//! In-memory snapshot storage for the Cardflow engine
//!
//! This crate provides an in-memory implementation of the snapshot
//! repository interface defined in the cardflow-core crate. It is primarily
//! useful for development, testing, and deployments where durable
//! persistence is not required.
//!
//! Slots hold serialized JSON documents, the same representation a durable
//! key-value backend would store, so the full encode/decode path is
//! exercised even in memory.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use cardflow_core::{FlowError, FlowSnapshot, SnapshotRepository};

/// In-memory implementation of the snapshot repository
#[derive(Default)]
pub struct InMemorySnapshotRepository {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySnapshotRepository {
    /// Create an empty in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    pub async fn slot_count(&self) -> usize {
        self.slots.read().await.len()
    }

    /// The raw JSON document stored in a slot, if any
    pub async fn raw_slot(&self, slot: &str) -> Option<String> {
        self.slots.read().await.get(slot).cloned()
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn load(&self, slot: &str) -> Result<Option<FlowSnapshot>, FlowError> {
        let slots = self.slots.read().await;
        match slots.get(slot) {
            Some(text) => {
                let snapshot: FlowSnapshot = serde_json::from_str(text)
                    .map_err(|e| FlowError::Storage(format!("corrupt slot '{}': {}", slot, e)))?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, slot: &str, snapshot: &FlowSnapshot) -> Result<(), FlowError> {
        let text = serde_json::to_string(snapshot)
            .map_err(|e| FlowError::Serialization(e.to_string()))?;
        debug!(slot, bytes = text.len(), "saving snapshot");
        self.slots.write().await.insert(slot.to_string(), text);
        Ok(())
    }

    async fn clear(&self, slot: &str) -> Result<(), FlowError> {
        self.slots.write().await.remove(slot);
        Ok(())
    }
}
