//! SQLite-backed episode catalog implementation.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::params;
use rusqlite::types::Type;
use tracing::debug;
use uuid::Uuid;

use super::{
    escape_like, CatalogError, EpisodeCatalog, EpisodeRecord, Locator, SEARCH_RESULT_LIMIT,
};
use crate::db::{format_timestamp, parse_timestamp, Db};
use crate::extractor::{Audio, EpisodeDescriptor, Quality};

const SCHEMA: &str = r#"
    -- One row per (series, season, episode, quality)
    CREATE TABLE IF NOT EXISTS episodes (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        series_name TEXT NOT NULL,
        series_folded TEXT NOT NULL,
        season INTEGER NOT NULL,
        episode INTEGER NOT NULL,
        quality TEXT NOT NULL,
        audio TEXT NOT NULL,
        message_id INTEGER NOT NULL,
        channel_id INTEGER NOT NULL,
        added_at TEXT NOT NULL,
        is_new INTEGER NOT NULL DEFAULT 1,
        UNIQUE(series_name, season, episode, quality)
    );

    CREATE INDEX IF NOT EXISTS idx_episodes_added_at ON episodes(added_at);
    CREATE INDEX IF NOT EXISTS idx_episodes_series_folded ON episodes(series_folded);
"#;

const RECORD_COLUMNS: &str =
    "id, series_name, season, episode, quality, audio, message_id, channel_id, added_at, is_new";

/// Quality priority as a SQL sort key (matches `Quality::rank`).
const QUALITY_RANK: &str =
    "CASE quality WHEN '1080p' THEN 0 WHEN '720p' THEN 1 WHEN '480p' THEN 2 ELSE 3 END";

/// Search key for a series name. SQLite's own `LIKE` only folds ASCII.
fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// SQLite-backed episode catalog.
pub struct SqliteEpisodeCatalog {
    db: Db,
}

impl SqliteEpisodeCatalog {
    /// Create a new SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        Ok(Self {
            db: Db::open(path, SCHEMA)?,
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        Ok(Self {
            db: Db::open_in_memory(SCHEMA)?,
        })
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<EpisodeRecord> {
        let quality: String = row.get(4)?;
        let audio: String = row.get(5)?;
        let added_at: String = row.get(8)?;

        Ok(EpisodeRecord {
            id: row.get(0)?,
            series_name: row.get(1)?,
            season: row.get(2)?,
            episode: row.get(3)?,
            quality: quality
                .parse::<Quality>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
            audio: audio
                .parse::<Audio>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
            locator: Locator {
                message_id: row.get(6)?,
                channel_id: row.get(7)?,
            },
            added_at: parse_timestamp(8, &added_at)?,
            is_new: row.get(9)?,
        })
    }

    /// Normalize a caller-supplied id, or `None` if it can't be one of ours.
    fn parse_id(id: &str) -> Option<String> {
        match Uuid::parse_str(id.trim()) {
            Ok(uuid) => Some(uuid.to_string()),
            Err(e) => {
                debug!(id, error = %e, "malformed episode id");
                None
            }
        }
    }
}

impl EpisodeCatalog for SqliteEpisodeCatalog {
    fn put(
        &self,
        descriptor: &EpisodeDescriptor,
        locator: Locator,
        at: DateTime<Utc>,
    ) -> Result<EpisodeRecord, CatalogError> {
        let conn = self.db.lock()?;
        let new_id = Uuid::new_v4().to_string();

        // Single statement: concurrent writers of one key resolve to the last one.
        let record = conn.query_row(
            &format!(
                "INSERT INTO episodes (id, series_name, series_folded, season, episode, quality, audio, message_id, channel_id, added_at, is_new)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1)
                 ON CONFLICT(series_name, season, episode, quality) DO UPDATE SET
                    audio = excluded.audio,
                    message_id = excluded.message_id,
                    channel_id = excluded.channel_id,
                    added_at = excluded.added_at,
                    is_new = 1
                 RETURNING {RECORD_COLUMNS}"
            ),
            params![
                new_id,
                descriptor.series_name,
                fold_case(&descriptor.series_name),
                descriptor.season,
                descriptor.episode,
                descriptor.quality.as_str(),
                descriptor.audio.as_str(),
                locator.message_id,
                locator.channel_id,
                format_timestamp(at),
            ],
            Self::row_to_record,
        )?;

        Ok(record)
    }

    fn clear(&self) -> Result<(), CatalogError> {
        let conn = self.db.lock()?;
        conn.execute("DELETE FROM episodes", [])?;
        Ok(())
    }

    fn distinct_series(&self) -> Result<Vec<String>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT series_name FROM episodes ORDER BY series_name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn search_series(&self, query: &str) -> Result<Vec<String>, CatalogError> {
        let conn = self.db.lock()?;
        let pattern = format!("%{}%", escape_like(&fold_case(query)));

        let mut stmt = conn.prepare(
            r"SELECT DISTINCT series_name FROM episodes
              WHERE series_folded LIKE ?1 ESCAPE '\'
              ORDER BY series_name
              LIMIT ?2",
        )?;
        let names = stmt
            .query_map(params![pattern, SEARCH_RESULT_LIMIT], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn seasons_of(&self, series: &str) -> Result<Vec<u32>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT season FROM episodes WHERE series_name = ? ORDER BY season",
        )?;
        let seasons = stmt
            .query_map(params![series], |row| row.get(0))?
            .collect::<Result<Vec<u32>, _>>()?;
        Ok(seasons)
    }

    fn episodes_of(&self, series: &str, season: u32) -> Result<Vec<EpisodeRecord>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM episodes
             WHERE series_name = ?1 AND season = ?2
             ORDER BY episode ASC, {QUALITY_RANK} ASC"
        ))?;
        let records = stmt
            .query_map(params![series, season], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn latest(&self, limit: u32) -> Result<Vec<EpisodeRecord>, CatalogError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM episodes
             ORDER BY added_at DESC, seq DESC
             LIMIT ?1"
        ))?;
        let records = stmt
            .query_map(params![limit], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<EpisodeRecord>, CatalogError> {
        let Some(id) = Self::parse_id(id) else {
            return Ok(None);
        };

        let conn = self.db.lock()?;
        let result = conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM episodes WHERE id = ?"),
            params![id],
            Self::row_to_record,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete_by_id(&self, id: &str) -> Result<bool, CatalogError> {
        let Some(id) = Self::parse_id(id) else {
            return Ok(false);
        };

        let conn = self.db.lock()?;
        let rows_affected = conn.execute("DELETE FROM episodes WHERE id = ?", params![id])?;
        Ok(rows_affected > 0)
    }

    fn count(&self) -> Result<u64, CatalogError> {
        let conn = self.db.lock()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM episodes", [], |row| row.get(0))?;
        Ok(count)
    }
}
