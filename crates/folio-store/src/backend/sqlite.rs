//! SQLite backend
//!
//! Each record is one row of `collection_records`, ordered by `position`.
//! A save replaces every row of the collection inside one transaction.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_core::model::Record;
use rusqlite::Connection;
use serde_json::Value;

use super::CollectionBackend;
use crate::db;
use crate::errors::{from_rusqlite, join_error, unavailable, Result};
use crate::migrations::apply_migrations;

#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open (creating if needed) a database file and apply migrations
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(path.as_ref())?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// In-memory database with migrations applied
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| unavailable("sqlite", "connection lock poisoned"))?;
            f(&mut guard)
        })
        .await
        .map_err(join_error)?
    }
}

fn load_rows(conn: &Connection, key: &str) -> Result<Option<Value>> {
    let mut stmt = conn
        .prepare("SELECT body FROM collection_records WHERE collection = ?1 ORDER BY position")
        .map_err(from_rusqlite)?;
    let bodies = stmt
        .query_map([key], |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    if bodies.is_empty() {
        return Ok(None);
    }

    let mut items = Vec::with_capacity(bodies.len());
    for body in bodies {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => items.push(value),
            Err(e) => tracing::debug!(collection = key, error = %e, "skipping unreadable row"),
        }
    }
    Ok(Some(Value::Array(items)))
}

fn replace_rows(conn: &mut Connection, key: &str, bodies: &[(Option<String>, String)]) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute(
        "DELETE FROM collection_records WHERE collection = ?1",
        [key],
    )
    .map_err(from_rusqlite)?;

    {
        let mut insert = tx
            .prepare(
                "INSERT INTO collection_records (collection, position, record_id, body)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(from_rusqlite)?;
        for (position, (record_id, body)) in bodies.iter().enumerate() {
            insert
                .execute(rusqlite::params![key, position as i64, record_id, body])
                .map_err(from_rusqlite)?;
        }
    }

    tx.execute(
        "INSERT INTO collection_meta (collection, record_count, replaced_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(collection) DO UPDATE SET
            record_count = excluded.record_count,
            replaced_at = excluded.replaced_at",
        rusqlite::params![key, bodies.len() as i64, chrono::Utc::now().timestamp()],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;
    Ok(())
}

#[async_trait]
impl CollectionBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let key = key.to_string();
        self.with_conn(move |conn| load_rows(conn, &key)).await
    }

    async fn save(&self, key: &str, records: &[Record]) -> Result<()> {
        let key = key.to_string();
        let bodies = records
            .iter()
            .map(|r| {
                let id = r.id().map(|id| id.as_str().to_string());
                serde_json::to_string(r).map(|body| (id, body))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.with_conn(move |conn| replace_rows(conn, &key, &bodies))
            .await
    }
}
