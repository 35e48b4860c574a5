use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::FavoritesStore;
use crate::catalog::CatalogError;
use crate::db::{format_timestamp, Db};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS favorites (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        series_name TEXT NOT NULL,
        added_at TEXT NOT NULL,
        UNIQUE(user_id, series_name)
    );
"#;

/// SQLite-backed favorites.
pub struct SqliteFavoritesStore {
    db: Db,
}

impl SqliteFavoritesStore {
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
}

impl FavoritesStore for SqliteFavoritesStore {
    fn add(&self, user_id: i64, series: &str, at: DateTime<Utc>) -> Result<(), CatalogError> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO favorites (user_id, series_name, added_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, series_name) DO UPDATE SET added_at = excluded.added_at",
            params![user_id, series, format_timestamp(at)],
        )?;
        Ok(())
    }

    fn remove(&self, user_id: i64, series: &str) -> Result<(), CatalogError> {
        let conn = self.db.lock()?;
        conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND series_name = ?2",
            params![user_id, series],
        )?;
        Ok(())
    }

    fn is_favorite(&self, user_id: i64, series: &str) -> Result<bool, CatalogError> {
        let conn = self.db.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = ?1 AND series_name = ?2)",
            params![user_id, series],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list(&self, user_id: i64) -> Result<Vec<String>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(
            "SELECT series_name FROM favorites
             WHERE user_id = ?
             ORDER BY added_at ASC, seq ASC",
        )?;
        let names = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}
