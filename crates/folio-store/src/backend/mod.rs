//! Storage backends
//!
//! A backend persists one opaque value per collection key. It knows nothing
//! about ids or schemas; `CollectionStore` layers those on top.

mod fallback;
mod file_cache;
mod memory;
mod remote;
mod sqlite;

pub use fallback::{FallbackBackend, FallbackMode};
pub use file_cache::FileCacheBackend;
pub use memory::MemoryBackend;
pub use remote::{RemoteKvBackend, RemoteKvConfig};
pub use sqlite::SqliteBackend;

use async_trait::async_trait;
use folio_core::model::Record;
use serde_json::Value;

use crate::errors::Result;

/// Whole-collection persistence
///
/// `load` returns `None` when nothing is stored under `key`; absence is
/// normal and never an error. `save` overwrites the stored value in its
/// entirety. Neither operation coordinates with concurrent writers.
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    /// Short backend label used in logs and errors
    fn name(&self) -> &'static str;

    async fn load(&self, key: &str) -> Result<Option<Value>>;

    async fn save(&self, key: &str, records: &[Record]) -> Result<()>;

    /// True once a write has been absorbed by a fallback instead of the
    /// authoritative store
    fn is_degraded(&self) -> bool {
        false
    }
}

/// Interpret a stored value as a record sequence
///
/// Missing values and non-arrays read as empty; array elements that are not
/// JSON objects are dropped.
pub fn records_from_value(key: &str, value: Option<Value>) -> Vec<Record> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let total = items.len();
            let records: Vec<Record> = items.into_iter().filter_map(Record::from_value).collect();
            if records.len() != total {
                tracing::debug!(
                    collection = key,
                    dropped = total - records.len(),
                    "skipped malformed entries in stored collection"
                );
            }
            records
        }
        Some(_) => {
            tracing::debug!(collection = key, "stored collection is not an array, treating as empty");
            Vec::new()
        }
    }
}

pub(crate) fn records_to_value(records: &[Record]) -> Value {
    Value::Array(records.iter().cloned().map(Record::into_value).collect())
}
