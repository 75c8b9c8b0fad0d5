use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use folio_core::model::Record;
use serde_json::Value;

use super::{records_to_value, CollectionBackend};
use crate::errors::{unavailable, Result};

/// Process-local backend, used for tests and `backend = "memory"`
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing record serialization
    pub fn put_raw(&self, key: &str, value: Value) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value);
        }
    }
}

#[async_trait]
impl CollectionBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let values = self
            .values
            .read()
            .map_err(|_| unavailable("memory", "lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, records: &[Record]) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| unavailable("memory", "lock poisoned"))?;
        values.insert(key.to_string(), records_to_value(records));
        Ok(())
    }
}
