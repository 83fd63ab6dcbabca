//! SQLite connection helper shared by the stores
//!
//! Each store keeps only the database path and opens a connection per call.

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::error::LarderResult;

pub fn open(db_path: &Path) -> LarderResult<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}
