//! Application services: persistence, synchronization, and the file codec

/// Import/export codec
pub mod codec;

/// Persistence gateway
pub mod persistence;

/// Flow service wiring store and persistence
pub mod service;

/// Canvas synchronizer
pub mod sync;
