//! Local file mirror of the remote store
//!
//! All collections live in one JSON document `{ "<key>": [ ...records ] }`,
//! rewritten atomically on every save.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_core::model::Record;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::{records_to_value, CollectionBackend};
use crate::errors::{io_error, Result};

pub struct FileCacheBackend {
    path: PathBuf,
    // serializes read-modify-write of the document within this process
    write_lock: Mutex<()>,
}

impl FileCacheBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(io_error("read_cache", e)),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                tracing::debug!(path = %self.path.display(), "cache file is malformed, ignoring it");
                Ok(Map::new())
            }
        }
    }

    /// Store a raw value under `key`
    pub async fn save_value(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        let bytes = serde_json::to_vec_pretty(&Value::Object(document))?;
        self.replace_file(&bytes).await
    }

    /// Write a sibling `.tmp` file, then rename it over the cache
    async fn replace_file(&self, bytes: &[u8]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| io_error("create_cache_dir", e))?;
        }

        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|e| io_error("write_cache_temp", e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| io_error("rename_cache_temp", e))
    }
}

#[async_trait]
impl CollectionBackend for FileCacheBackend {
    fn name(&self) -> &'static str {
        "file_cache"
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    async fn save(&self, key: &str, records: &[Record]) -> Result<()> {
        self.save_value(key, records_to_value(records)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let cache = FileCacheBackend::new(dir.path().join("cache.json"));
        assert!(cache.load("blogs").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_share_one_document() {
        let dir = TempDir::new().unwrap();
        let cache = FileCacheBackend::new(dir.path().join("cache.json"));
        let blog = Record::from_value(json!({"id": "1", "title": "t"})).unwrap();

        cache.save("blogs", &[blog]).await.unwrap();
        cache.save("projects", &[]).await.unwrap();

        let raw: Value =
            serde_json::from_slice(&std::fs::read(cache.path()).unwrap()).unwrap();
        assert_eq!(raw["blogs"], json!([{"id": "1", "title": "t"}]));
        assert_eq!(raw["projects"], json!([]));
    }

    #[tokio::test]
    async fn test_malformed_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"{ truncated").unwrap();
        let cache = FileCacheBackend::new(&path);
        assert!(cache.load("blogs").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_leaves_no_staging_file() {
        let dir = TempDir::new().unwrap();
        let cache = FileCacheBackend::new(dir.path().join("mirror").join("cache.json"));
        cache.save("education", &[]).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path().join("mirror"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cache.json".to_string()]);
    }
}
