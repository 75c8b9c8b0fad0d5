//! Remote store with a local file mirror
//!
//! Reads come from the remote; when it cannot be reached the mirror is
//! served instead, with a warning. Successful writes are mirrored. Failed
//! writes are absorbed by the mirror only in development; in production
//! they are reported to the caller.
//!
//! A collection written to the mirror alone is pending. Until the remote
//! has a copy, reads of that collection are served from the mirror, and
//! each read first tries to push the mirror's copy to the remote. The
//! backend reports itself degraded while any collection is pending.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_core::errors::FolioError;
use folio_core::model::Record;
use serde_json::Value;

use super::{records_from_value, CollectionBackend, FileCacheBackend};
use crate::errors::Result;

/// Whether write failures may be absorbed by the local mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMode {
    Development,
    Production,
}

pub struct FallbackBackend {
    primary: Arc<dyn CollectionBackend>,
    cache: FileCacheBackend,
    mode: FallbackMode,
    // collection keys whose latest write only reached the mirror
    pending: Mutex<HashSet<String>>,
}

impl FallbackBackend {
    pub fn new(primary: Arc<dyn CollectionBackend>, cache: FileCacheBackend, mode: FallbackMode) -> Self {
        Self {
            primary,
            cache,
            mode,
            pending: Mutex::new(HashSet::new()),
        }
    }

    fn is_unavailable(err: &FolioError) -> bool {
        matches!(err, FolioError::StoreUnavailable { .. })
    }

    fn with_pending<T>(&self, f: impl FnOnce(&mut HashSet<String>) -> T) -> T {
        let mut pending = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut pending)
    }

    fn is_pending(&self, key: &str) -> bool {
        self.with_pending(|p| p.contains(key))
    }

    /// Push the mirror's copy of a pending collection to the remote
    ///
    /// Returns the mirror's copy, or `None` if the mirror no longer holds
    /// the collection and the remote should be read instead.
    async fn reconcile(&self, key: &str) -> Result<Option<Value>> {
        let Some(local) = self.cache.load(key).await? else {
            self.with_pending(|p| p.remove(key));
            return Ok(None);
        };

        let records = records_from_value(key, Some(local.clone()));
        match self.primary.save(key, &records).await {
            Ok(()) => {
                self.with_pending(|p| p.remove(key));
                tracing::warn!(collection = key, "remote store reachable again, pushed local writes");
            }
            Err(err) if Self::is_unavailable(&err) => {
                tracing::debug!(collection = key, error = %err, "remote still unreachable");
            }
            Err(err) => return Err(err),
        }
        Ok(Some(local))
    }
}

#[async_trait]
impl CollectionBackend for FallbackBackend {
    fn name(&self) -> &'static str {
        "remote+cache"
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        if self.is_pending(key) {
            if let Some(local) = self.reconcile(key).await? {
                return Ok(Some(local));
            }
        }

        match self.primary.load(key).await {
            Ok(value) => Ok(value),
            Err(err) if Self::is_unavailable(&err) => {
                tracing::warn!(
                    collection = key,
                    error = %err,
                    "remote store unreachable, serving local cache (may be stale)"
                );
                self.cache.load(key).await
            }
            Err(err) => Err(err),
        }
    }

    async fn save(&self, key: &str, records: &[Record]) -> Result<()> {
        match self.primary.save(key, records).await {
            Ok(()) => {
                self.with_pending(|p| p.remove(key));
                if let Err(err) = self.cache.save(key, records).await {
                    tracing::warn!(collection = key, error = %err, "failed to mirror write to local cache");
                }
                Ok(())
            }
            Err(err) if Self::is_unavailable(&err) && self.mode == FallbackMode::Development => {
                tracing::warn!(
                    collection = key,
                    error = %err,
                    "remote write failed, written to local cache only"
                );
                self.cache.save(key, records).await?;
                self.with_pending(|p| p.insert(key.to_string()));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn is_degraded(&self) -> bool {
        self.with_pending(|p| !p.is_empty())
    }
}
