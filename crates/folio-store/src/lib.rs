//! Folio Store - collection persistence
//!
//! Provides:
//! - The `CollectionBackend` trait: load/save one whole collection by key
//! - Backends: SQLite, remote key-value service, local file cache, in-memory,
//!   and a development fallback that mirrors the remote into the file cache
//! - SQLite schema with a checksummed migrations runner
//! - `CollectionStore`, the read-modify-write adapter every route goes through

pub mod backend;
pub mod collection_store;
pub mod db;
pub mod errors;
pub mod migrations;

// Re-export key types
pub use backend::{
    CollectionBackend, FallbackBackend, FallbackMode, FileCacheBackend, MemoryBackend,
    RemoteKvBackend, RemoteKvConfig, SqliteBackend,
};
pub use collection_store::CollectionStore;
pub use errors::Result;
