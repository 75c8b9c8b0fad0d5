//! Checksummed schema migrations for the SQLite backend
//!
//! Every migration that has run is recorded in `schema_version` with the
//! SHA-256 of its SQL. Re-running is a no-op; a recorded checksum that no
//! longer matches the embedded SQL stops the store from opening.

use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::{from_rusqlite, migration_error, Result};

/// Embedded migrations, in application order
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_collection_records",
        include_str!("../migrations/001_collection_records.sql"),
    ),
    (
        "002_collection_meta",
        include_str!("../migrations/002_collection_meta.sql"),
    ),
];

const SCHEMA_VERSION_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT
)";

fn sql_digest(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

/// Run every pending migration
///
/// Returns the ids applied by this call, empty when the schema was current.
///
/// # Errors
///
/// `Persistence` when a migration fails or its recorded checksum drifted,
/// `StoreUnavailable` when SQLite itself reports an error.
pub fn apply_migrations(conn: &mut Connection) -> Result<Vec<&'static str>> {
    conn.execute(SCHEMA_VERSION_DDL, []).map_err(from_rusqlite)?;

    let mut applied = Vec::new();
    for (id, sql) in MIGRATIONS {
        if apply_one(conn, id, sql)? {
            applied.push(*id);
        }
    }
    Ok(applied)
}

/// Ids recorded in `schema_version`, oldest first
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    conn.execute(SCHEMA_VERSION_DDL, []).map_err(from_rusqlite)?;
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(from_rusqlite)
}

/// `Ok(true)` if the migration ran now, `Ok(false)` if it was already recorded
fn apply_one(conn: &mut Connection, id: &str, sql: &str) -> Result<bool> {
    let digest = sql_digest(sql);

    let recorded: Option<Option<String>> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    match recorded {
        Some(Some(previous)) if previous != digest => {
            return Err(migration_error(
                id,
                &format!("checksum mismatch: recorded {}, embedded {}", previous, digest),
            ));
        }
        Some(_) => return Ok(false),
        None => {}
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(sql)
        .map_err(|e| migration_error(id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        params![id, chrono::Utc::now().timestamp(), digest],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    debug!(migration_id = id, "applied migration");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::errors::FolioError;

    #[test]
    fn test_fresh_database_gets_every_migration() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert!(applied_migrations(&conn).unwrap().is_empty());

        let ran = apply_migrations(&mut conn).unwrap();
        assert_eq!(ran, vec!["001_collection_records", "002_collection_meta"]);
        assert_eq!(applied_migrations(&conn).unwrap(), ran);
    }

    #[test]
    fn test_second_run_applies_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert!(apply_migrations(&mut conn).unwrap().is_empty());
        assert_eq!(applied_migrations(&conn).unwrap().len(), MIGRATIONS.len());
    }

    #[test]
    fn test_edited_migration_is_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "UPDATE schema_version SET checksum = 'tampered' WHERE migration_id = '002_collection_meta'",
            [],
        )
        .unwrap();

        let err = apply_migrations(&mut conn).unwrap_err();
        assert!(matches!(err, FolioError::Persistence { .. }));
        assert!(err.to_string().contains("checksum mismatch"));
        assert!(err.to_string().contains("002_collection_meta"));
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = sql_digest("SELECT 1");
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, sql_digest("SELECT 2"));
    }
}
