use std::sync::Arc;

use folio_core_types::Sensitive;
use folio_engine::TokenSigner;
use folio_store::{
    CollectionBackend, CollectionStore, FallbackBackend, FileCacheBackend, MemoryBackend,
    RemoteKvBackend, Result, SqliteBackend,
};

use crate::config::{BackendKind, FolioConfig};

/// Shared by every handler through `Arc<AppState>`
pub struct AppState {
    pub store: CollectionStore,
    pub signer: TokenSigner,
    pub admin_api_key: Option<Sensitive<String>>,
}

impl AppState {
    pub fn new(store: CollectionStore, signer: TokenSigner) -> Self {
        Self {
            store,
            signer,
            admin_api_key: None,
        }
    }

    pub fn with_admin_api_key(mut self, key: Sensitive<String>) -> Self {
        self.admin_api_key = Some(key);
        self
    }

    /// Open the configured backend and build the signer
    ///
    /// # Errors
    ///
    /// `Persistence`/`Io` when the SQLite file cannot be opened or migrated,
    /// `StoreUnavailable` when the remote client cannot be built.
    pub fn from_config(config: &FolioConfig) -> Result<Self> {
        let backend = open_backend(config)?;
        tracing::info!(backend = backend.name(), "store backend ready");

        let signer = TokenSigner::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
        Ok(Self {
            store: CollectionStore::new(backend),
            signer,
            admin_api_key: config.auth.admin_api_key.clone(),
        })
    }
}

fn open_backend(config: &FolioConfig) -> Result<Arc<dyn CollectionBackend>> {
    let backend: Arc<dyn CollectionBackend> = match config.backend {
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
        BackendKind::Sqlite => Arc::new(SqliteBackend::open(&config.sqlite.path)?),
        BackendKind::Remote => {
            let remote_config = config.remote_kv().ok_or_else(|| {
                folio_store::errors::unavailable("remote", "remote.url is not configured")
            })?;
            let remote: Arc<dyn CollectionBackend> = Arc::new(RemoteKvBackend::new(remote_config)?);
            match &config.cache.path {
                Some(path) => Arc::new(FallbackBackend::new(
                    remote,
                    FileCacheBackend::new(path.clone()),
                    config.fallback_mode(),
                )),
                None => remote,
            }
        }
    };
    Ok(backend)
}
