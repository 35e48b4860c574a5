use std::path::Path;

use rusqlite::params;

use super::TrendingStore;
use crate::catalog::{CatalogError, SeriesPopularity};
use crate::db::Db;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS trending (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        series_name TEXT NOT NULL UNIQUE,
        view_count INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_trending_views ON trending(view_count DESC);
"#;

/// SQLite-backed popularity counters.
pub struct SqliteTrendingStore {
    db: Db,
}

impl SqliteTrendingStore {
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

impl TrendingStore for SqliteTrendingStore {
    fn bump_view(&self, series: &str) -> Result<u64, CatalogError> {
        let conn = self.db.lock()?;
        let count: u64 = conn.query_row(
            "INSERT INTO trending (series_name, view_count) VALUES (?1, 1)
             ON CONFLICT(series_name) DO UPDATE SET view_count = view_count + 1
             RETURNING view_count",
            params![series],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn top(&self, limit: u32) -> Result<Vec<SeriesPopularity>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(
            "SELECT series_name, view_count FROM trending
             ORDER BY view_count DESC, seq ASC
             LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![limit], |row| {
                Ok(SeriesPopularity {
                    series_name: row.get(0)?,
                    view_count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn view_count(&self, series: &str) -> Result<u64, CatalogError> {
        let conn = self.db.lock()?;
        let result = conn.query_row(
            "SELECT view_count FROM trending WHERE series_name = ?",
            params![series],
            |row| row.get(0),
        );

        match result {
            Ok(count) => Ok(count),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
