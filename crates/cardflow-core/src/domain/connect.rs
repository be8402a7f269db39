//! Connection derivation
//!
//! Turns a canvas edge-creation event plus its two endpoint nodes into a
//! canonical [`Connection`] record. Pure: no store mutation happens here.

use tracing::debug;
use uuid::Uuid;

use super::graph::{Connection, EdgeDescriptor, Node};
use super::store::FlowStore;

/// Derive a canonical connection from its endpoint nodes and the raw canvas
/// edge descriptor.
///
/// The connection gets a fresh id built from the raw edge's own id plus a
/// disambiguating suffix, and position snapshots copied from the endpoints'
/// current positions at call time.
pub fn derive_connection(source: &Node, target: &Node, raw: &EdgeDescriptor) -> Connection {
    Connection {
        id: format!("{}-{}", raw.id, Uuid::new_v4()),
        source_id: source.id.clone(),
        target_id: target.id.clone(),
        source_position: source.position,
        target_position: target.position,
        edge_data: raw.clone(),
    }
}

/// Look up the raw edge's endpoints in the store and derive a connection.
///
/// Returns `None` when either endpoint cannot be found by id; a missing
/// endpoint must be a skip, never a partial write.
pub fn derive_connection_by_ids(store: &FlowStore, raw: &EdgeDescriptor) -> Option<Connection> {
    let source = store.find_node(&raw.source);
    let target = store.find_node(&raw.target);
    match (source, target) {
        (Some(source), Some(target)) => Some(derive_connection(source, target, raw)),
        _ => {
            debug!(
                source = %raw.source,
                target = %raw.target,
                "skipped connection derivation: endpoint not found"
            );
            None
        }
    }
}
