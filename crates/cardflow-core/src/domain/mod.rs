//! Domain layer: the canonical flow graph model and its rules

/// Card content value types
pub mod content;

/// Connection derivation
pub mod connect;

/// Graph entities and canvas change deltas
pub mod graph;

/// Snapshot repository trait and durable projection
pub mod repository;

/// The canonical flow graph store
pub mod store;
