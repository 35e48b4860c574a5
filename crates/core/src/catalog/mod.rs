//! Episode catalog - the indexed collection of extracted episodes.
//!
//! Records are keyed by (series, season, episode, quality). Writing an
//! existing key replaces its locator and metadata; nothing is merged.

mod sqlite;
mod types;

pub use sqlite::SqliteEpisodeCatalog;
pub use types::*;

use chrono::{DateTime, Utc};

use crate::extractor::EpisodeDescriptor;

/// Trait for episode catalog storage.
pub trait EpisodeCatalog: Send + Sync {
    /// Insert or replace the record for the descriptor's key.
    ///
    /// Sets `added_at = at` and `is_new = true` unconditionally. The record id
    /// is assigned on first insert and kept on later writes.
    fn put(
        &self,
        descriptor: &EpisodeDescriptor,
        locator: Locator,
        at: DateTime<Utc>,
    ) -> Result<EpisodeRecord, CatalogError>;

    /// Remove every episode record. First step of a bulk re-index.
    fn clear(&self) -> Result<(), CatalogError>;

    /// All series names, sorted.
    fn distinct_series(&self) -> Result<Vec<String>, CatalogError>;

    /// Series whose name contains `query`, case-insensitively.
    ///
    /// `query` is a literal substring; at most [`SEARCH_RESULT_LIMIT`] names.
    fn search_series(&self, query: &str) -> Result<Vec<String>, CatalogError>;

    /// Season numbers of a series, ascending.
    fn seasons_of(&self, series: &str) -> Result<Vec<u32>, CatalogError>;

    /// Episodes of one season, ascending by episode number.
    fn episodes_of(&self, series: &str, season: u32) -> Result<Vec<EpisodeRecord>, CatalogError>;

    /// The `limit` most recently indexed records, newest first.
    fn latest(&self, limit: u32) -> Result<Vec<EpisodeRecord>, CatalogError>;

    /// Look up a record. Unknown and malformed ids both yield `None`.
    fn get_by_id(&self, id: &str) -> Result<Option<EpisodeRecord>, CatalogError>;

    /// Delete a record. Returns whether anything was removed.
    fn delete_by_id(&self, id: &str) -> Result<bool, CatalogError>;

    /// Number of records.
    fn count(&self) -> Result<u64, CatalogError>;
}

/// Escape LIKE wildcards so `input` matches only itself.
///
/// Use with `ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
