//! Validation rules applied before a record reaches the store

pub mod schema;

pub use schema::{require_fields, schema_for, ResourceSchema};
