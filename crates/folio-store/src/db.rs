//! SQLite connections

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, io_error, Result};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a database file, creating it and its directory when missing
///
/// The connection runs in WAL mode so readers are not blocked while a
/// collection is being replaced.
pub fn open(path: &Path) -> Result<Connection> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| io_error("create_db_dir", e))?;
        }
        _ => {}
    }

    let conn = Connection::open(path).map_err(from_rusqlite)?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}
