//! Pure in-memory operations over a fetched collection
//!
//! The store layer fetches a whole collection, hands the vector to these
//! functions, and writes the result back. Nothing here performs I/O.

pub mod collection_ops;

pub use collection_ops::{
    find, max_numeric_id, next_id, next_id_at, position, remove_from, upsert_into, UpsertOutcome,
};
