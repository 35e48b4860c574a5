//! Shared SQLite connection handling for the catalog stores.
//!
//! Every store owns one connection guarded by a mutex. Stores opened on the
//! same file share it through WAL journaling.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::catalog::CatalogError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Open (creating if needed) a database file and run `schema` on it.
    pub(crate) fn open(path: &Path, schema: &str) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        Self::with_schema(conn, schema)
    }

    /// Open a private in-memory database (useful for testing).
    pub(crate) fn open_in_memory(schema: &str) -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        Self::with_schema(conn, schema)
    }

    fn with_schema(conn: Connection, schema: &str) -> Result<Self, CatalogError> {
        conn.execute_batch(schema)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("connection lock poisoned".to_string()))
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
