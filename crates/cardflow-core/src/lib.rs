//!
//! Cardflow Core - Flow graph state engine for the Cardflow editor
//!
//! This crate defines the canonical data model for card-based flow nodes
//! and the connections between their ports, the mutation and
//! synchronization contracts that keep that model consistent with an
//! externally-owned canvas, and the persistence and import/export paths
//! that move it in and out of durable storage and JSON files.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - the canonical graph model and its rules
pub mod domain;

/// Application services - persistence, synchronization, file codec
pub mod application;

/// Error types
pub mod error;

// Re-export key types
pub use error::FlowError;

pub use domain::connect::{derive_connection, derive_connection_by_ids};
pub use domain::content::{CardAction, CardContent, CarouselData, NodeDatum};
pub use domain::graph::{
    mint_node_id, Connection, Dimensions, EdgeDescriptor, Node, NodeChange, Position,
};
pub use domain::repository::{FlowSnapshot, SnapshotRepository};
pub use domain::store::FlowStore;

pub use application::codec::{
    export_document, export_json, export_to_file, import_document, import_from_file, load_sample,
    parse_import, EXPORT_FILE_NAME,
};
pub use application::persistence::{PersistenceGateway, DEFAULT_SLOT};
pub use application::service::{FlowService, CAROUSEL_NODE_TYPE, RICH_CARD_NODE_TYPE};
pub use application::sync::{apply_canvas_changes, connect, edge_from_connection, CanvasState};
