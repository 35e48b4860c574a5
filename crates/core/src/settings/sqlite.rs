use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;

use super::SettingsStore;
use crate::catalog::CatalogError;
use crate::db::{format_timestamp, parse_timestamp, Db};

const SCHEMA: &str = r#"
    -- Values are JSON documents
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS ad_cooldowns (
        user_id INTEGER PRIMARY KEY,
        last_shown_at TEXT NOT NULL
    );
"#;

/// SQLite-backed settings and cooldown store.
pub struct SqliteSettingsStore {
    db: Db,
}

impl SqliteSettingsStore {
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

impl SettingsStore for SqliteSettingsStore {
    fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>, CatalogError> {
        let conn = self.db.lock()?;
        let result = conn.query_row(
            "SELECT value FROM settings WHERE key = ?",
            params![key],
            |row| row.get::<_, String>(0),
        );

        let raw = match result {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CatalogError::Internal(format!("setting '{}' is not JSON: {}", key, e)))
    }

    fn set_value(&self, key: &str, value: &serde_json::Value) -> Result<(), CatalogError> {
        let raw = serde_json::to_string(value).map_err(|e| CatalogError::Internal(e.to_string()))?;

        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, raw],
        )?;
        Ok(())
    }

    fn cooldown_elapsed(
        &self,
        user_id: i64,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<bool, CatalogError> {
        let conn = self.db.lock()?;
        let result = conn.query_row(
            "SELECT last_shown_at FROM ad_cooldowns WHERE user_id = ?",
            params![user_id],
            |row| {
                let raw: String = row.get(0)?;
                parse_timestamp(0, &raw)
            },
        );

        match result {
            Ok(last_shown_at) => Ok(now.signed_duration_since(last_shown_at) > window),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn touch_cooldown(&self, user_id: i64, now: DateTime<Utc>) -> Result<(), CatalogError> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO ad_cooldowns (user_id, last_shown_at) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET last_shown_at = excluded.last_shown_at",
            params![user_id, format_timestamp(now)],
        )?;
        Ok(())
    }
}
