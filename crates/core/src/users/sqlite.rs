use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{UserProfile, UserRecord, UserStore};
use crate::catalog::CatalogError;
use crate::db::{format_timestamp, parse_timestamp, Db};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY,
        first_name TEXT NOT NULL,
        username TEXT,
        joined_at TEXT NOT NULL
    );
"#;

/// SQLite-backed user registry.
pub struct SqliteUserStore {
    db: Db,
}

impl SqliteUserStore {
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        Ok(Self {
            db: Db::open(path, SCHEMA)?,
        })
    }

    pub fn in_memory() -> Result<Self, CatalogError> {
        Ok(Self {
            db: Db::open_in_memory(SCHEMA)?,
        })
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<UserRecord> {
        let joined_at: String = row.get(3)?;
        Ok(UserRecord {
            user_id: row.get(0)?,
            first_name: row.get(1)?,
            username: row.get(2)?,
            joined_at: parse_timestamp(3, &joined_at)?,
        })
    }
}

impl UserStore for SqliteUserStore {
    fn register(&self, profile: &UserProfile, at: DateTime<Utc>) -> Result<UserRecord, CatalogError> {
        let conn = self.db.lock()?;
        let record = conn.query_row(
            "INSERT INTO users (user_id, first_name, username, joined_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                first_name = excluded.first_name,
                username = excluded.username,
                joined_at = excluded.joined_at
             RETURNING user_id, first_name, username, joined_at",
            params![
                profile.user_id,
                profile.first_name,
                profile.username,
                format_timestamp(at),
            ],
            Self::row_to_user,
        )?;
        Ok(record)
    }

    fn exists(&self, user_id: i64) -> Result<bool, CatalogError> {
        let conn = self.db.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_id = ?)",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn get(&self, user_id: i64) -> Result<Option<UserRecord>, CatalogError> {
        let conn = self.db.lock()?;
        let result = conn.query_row(
            "SELECT user_id, first_name, username, joined_at FROM users WHERE user_id = ?",
            params![user_id],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self) -> Result<u64, CatalogError> {
        let conn = self.db.lock()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}
