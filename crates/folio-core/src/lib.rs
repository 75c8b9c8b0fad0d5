//! Folio Core - domain kernel for the portfolio backend
//!
//! This crate provides the storage-agnostic pieces every other crate builds on:
//! - Record and collection models (experiences, education, projects, blogs, users)
//! - Pure in-memory collection operations (`next_id`, `upsert_into`, `remove_from`)
//! - Field-schema validation for each resource type
//! - The canonical error facility (`FolioError` → `ExError`)
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, FolioError, Result};
pub use model::{CollectionName, Comment, IdPolicy, Record, RecordId, Role};

#[doc(hidden)]
pub use folio_core_types as core_types;
