//! Types for the episode catalog.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extractor::{Audio, EpisodeDescriptor, Quality};

/// Maximum number of series names returned by a search.
pub const SEARCH_RESULT_LIMIT: u32 = 50;

/// Default age below which an episode counts as recently added.
pub const DEFAULT_RECENT_WINDOW_HOURS: i64 = 24;

/// Opaque reference to the stored payload: a message in a source channel.
///
/// Only meaningful to the delivery layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub message_id: i64,
    pub channel_id: i64,
}

/// One catalog entry per (series, season, episode, quality).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Record id (UUID). Kept when the same key is indexed again.
    pub id: String,
    pub series_name: String,
    pub season: u32,
    pub episode: u32,
    pub quality: Quality,
    pub audio: Audio,
    pub locator: Locator,
    /// Time of the last upsert of this key.
    pub added_at: DateTime<Utc>,
    /// Set on every upsert. Not a display signal, see [`EpisodeRecord::is_recent`].
    pub is_new: bool,
}

impl EpisodeRecord {
    /// Whether the record was (re-)indexed less than `window` before `now`.
    ///
    /// "New" badges are derived from this at read time, never from the stored
    /// `is_new` flag, so one viewer can't clear the badge for everyone.
    pub fn is_recent(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.added_at) < window
    }

    /// Short `S01E02` code.
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode)
    }

    /// The extracted metadata this record was built from.
    pub fn descriptor(&self) -> EpisodeDescriptor {
        EpisodeDescriptor {
            series_name: self.series_name.clone(),
            season: self.season,
            episode: self.episode,
            quality: self.quality,
            audio: self.audio,
        }
    }
}

/// Series popularity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPopularity {
    pub series_name: String,
    pub view_count: u64,
}

/// Admin statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Registered users.
    pub total_users: u64,
    /// Indexed episode records.
    pub total_files: u64,
    /// Distinct series.
    pub total_series: u64,
}

/// Errors for catalog store operations.
///
/// Routine "nothing found" outcomes are not errors: lookups return `None`,
/// deletes return `false`. Only an unusable store surfaces here.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Unavailable(e.to_string())
    }
}
