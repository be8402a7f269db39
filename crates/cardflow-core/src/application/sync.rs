//! Canvas synchronizer
//!
//! Bridges the canonical store and the externally-owned canvas
//! representation. The canvas is authoritative for positions, selection and
//! drag flags; the store is authoritative for structure and content. Three
//! triggers keep them consistent:
//!
//! 1. store → canvas on any node-sequence change: full node mirror
//! 2. store → canvas on load: the canvas edge list is rebuilt from scratch
//!    from canonical connections, never merged
//! 3. canvas → store on a user-drawn edge: derive a canonical connection and
//!    append the visual edge, canonical write first
//!
//! All of this runs on one logical writer thread, so trigger 3's canonical
//! write is always visible to a subsequent trigger 2 rebuild.

use tracing::debug;

use crate::domain::connect::derive_connection_by_ids;
use crate::domain::graph::{Connection, EdgeDescriptor, Node, NodeChange};
use crate::domain::store::FlowStore;
use crate::FlowError;

use super::service::FlowService;

/// The transient canvas-side mirror of the graph
#[derive(Debug, Clone, Default)]
pub struct CanvasState {
    /// Canvas node list, a full mirror of the store's nodes
    pub nodes: Vec<Node>,
    /// Canvas edge list, maintained in parallel with canonical connections
    pub edges: Vec<EdgeDescriptor>,
}

impl CanvasState {
    /// An empty canvas
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger 1: mirror the store's node sequence into the canvas, full
    /// replace
    pub fn mirror_nodes(&mut self, store: &FlowStore) {
        self.nodes = store.nodes().to_vec();
    }

    /// Trigger 2: rebuild the canvas edge list from canonical connections.
    ///
    /// Runs only once the store's connections are non-empty and the canvas
    /// nodes are populated (right after an import or initial hydration).
    /// The prior edge list is discarded, never merged. Returns whether a
    /// rebuild happened.
    pub fn rebuild_edges(&mut self, store: &FlowStore) -> bool {
        if store.connections().is_empty() || self.nodes.is_empty() {
            return false;
        }
        self.edges = store.connections().iter().map(edge_from_connection).collect();
        debug!(edges = self.edges.len(), "rebuilt canvas edges from canonical connections");
        true
    }
}

/// Map a canonical connection to the canvas edge that renders it, carrying
/// the stored descriptor's type, animation, style and payload under the
/// connection's current endpoints and handles.
pub fn edge_from_connection(connection: &Connection) -> EdgeDescriptor {
    EdgeDescriptor {
        id: connection.id.clone(),
        source: connection.source_id.clone(),
        target: connection.target_id.clone(),
        source_handle: connection.edge_data.source_handle.clone(),
        target_handle: connection.edge_data.target_handle.clone(),
        edge_type: connection.edge_data.edge_type.clone(),
        animated: connection.edge_data.animated,
        style: connection.edge_data.style.clone(),
        payload: connection.edge_data.payload.clone(),
    }
}

/// Trigger 3: a user drew an edge on the canvas.
///
/// Derives the canonical connection from the raw descriptor, writes it to
/// the store (which persists it), and only then appends the canvas's own
/// edge entry. A missing endpoint or a rejected add leaves both lists
/// untouched. Returns whether the connection landed.
pub async fn connect(
    service: &mut FlowService,
    canvas: &mut CanvasState,
    raw: &EdgeDescriptor,
) -> Result<bool, FlowError> {
    let Some(connection) = derive_connection_by_ids(service.store(), raw) else {
        return Ok(false);
    };
    if !service.add_connection(connection).await? {
        return Ok(false);
    }
    canvas.edges.push(raw.clone());
    Ok(true)
}

/// The canvas's change-delta feed: positions, selection, drag flags and
/// removals flow back into the canonical store, then the canvas nodes are
/// re-mirrored so both sides agree.
pub async fn apply_canvas_changes(
    service: &mut FlowService,
    canvas: &mut CanvasState,
    changes: &[NodeChange],
) -> Result<bool, FlowError> {
    let changed = service.apply_node_changes(changes).await?;
    if changed {
        canvas.mirror_nodes(service.store());
    }
    Ok(changed)
}
