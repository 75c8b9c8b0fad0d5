//! Read-modify-write adapter over a collection backend
//!
//! Every mutation fetches the whole collection, changes it in memory and
//! writes the whole collection back. There is no lock, transaction or
//! version stamp spanning the fetch and the write: two writers racing on
//! the same collection can lose an update, the later write winning.
//! Different collections never interfere.

use std::sync::Arc;

use folio_core::errors::FolioError;
use folio_core::model::{CollectionName, Record, RecordId};
use folio_core::ops::{self, UpsertOutcome};
use serde_json::Value;

use crate::backend::{records_from_value, CollectionBackend, MemoryBackend};
use crate::errors::Result;

/// Process-scoped handle to the configured backend
#[derive(Clone)]
pub struct CollectionStore {
    backend: Arc<dyn CollectionBackend>,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn CollectionBackend>) -> Self {
        Self { backend }
    }

    /// Store over a fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// True when writes have landed only in a development fallback cache
    pub fn is_degraded(&self) -> bool {
        self.backend.is_degraded()
    }

    /// Current contents of a collection
    ///
    /// An absent or malformed stored value reads as an empty collection.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` when the backend cannot be reached.
    pub async fn fetch_collection(&self, name: CollectionName) -> Result<Vec<Record>> {
        let value = self.backend.load(name.as_str()).await?;
        let records = records_from_value(name.as_str(), value);
        tracing::debug!(
            collection = name.as_str(),
            backend = self.backend.name(),
            record_count = records.len(),
            "collection fetched"
        );
        Ok(records)
    }

    /// Overwrite a collection in its entirety
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` when the backend cannot be reached. Nothing is
    /// retried.
    pub async fn replace_collection(&self, name: CollectionName, records: &[Record]) -> Result<()> {
        self.backend.save(name.as_str(), records).await?;
        tracing::debug!(
            collection = name.as_str(),
            backend = self.backend.name(),
            record_count = records.len(),
            "collection replaced"
        );
        Ok(())
    }

    /// Next unused id for `records` under the collection's id policy
    pub fn next_id(&self, name: CollectionName, records: &[Record]) -> Value {
        ops::next_id(records, name.id_policy())
    }

    /// Look up one record
    ///
    /// # Errors
    ///
    /// `RecordNotFound` when no record has `id`.
    pub async fn get(&self, name: CollectionName, id: &RecordId) -> Result<Record> {
        let records = self.fetch_collection(name).await?;
        ops::find(&records, id)
            .cloned()
            .ok_or_else(|| FolioError::not_found(name.as_str(), id.as_str()))
    }

    /// Fetch, apply `f` to the collection, and write it back if `f` succeeds
    ///
    /// # Errors
    ///
    /// Whatever `f` returns (the collection is then not written), or a
    /// backend error from the fetch or the write.
    pub async fn modify<T, F>(&self, name: CollectionName, f: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut Vec<Record>) -> Result<T> + Send,
    {
        let mut records = self.fetch_collection(name).await?;
        let out = f(&mut records)?;
        self.replace_collection(name, &records).await?;
        Ok(out)
    }

    /// Replace the record with the same id or append it
    ///
    /// A record without an id is assigned one first. Returns the record as
    /// stored.
    ///
    /// # Errors
    ///
    /// Backend errors from the fetch or the write.
    pub async fn upsert(
        &self,
        name: CollectionName,
        record: Record,
    ) -> Result<(Record, UpsertOutcome)> {
        self.modify(name, move |records| {
            let (id, outcome) = ops::upsert_into(records, record, name.id_policy());
            let stored = ops::find(records, &id)
                .cloned()
                .ok_or_else(|| FolioError::Internal {
                    message: format!("record {} vanished during upsert", id),
                })?;
            Ok((stored, outcome))
        })
        .await
    }

    /// Remove the record with `id`
    ///
    /// # Errors
    ///
    /// `RecordNotFound` when no record has `id`; the collection is then
    /// left untouched and not rewritten.
    pub async fn remove(&self, name: CollectionName, id: &RecordId) -> Result<Record> {
        self.modify(name, |records| {
            ops::remove_from(records, id)
                .ok_or_else(|| FolioError::not_found(name.as_str(), id.as_str()))
        })
        .await
    }
}
