//! Per-user favorite series.
//!
//! Favorites refer to series by name only. Nothing is cascaded when a series
//! disappears from the catalog, so a favorite may outlive its episodes.

mod sqlite;

pub use sqlite::SqliteFavoritesStore;

use chrono::{DateTime, Utc};

use crate::catalog::CatalogError;

/// Trait for favorites storage.
pub trait FavoritesStore: Send + Sync {
    /// Mark a series as favorite. Adding twice keeps one edge and refreshes
    /// its `added_at`.
    fn add(&self, user_id: i64, series: &str, at: DateTime<Utc>) -> Result<(), CatalogError>;

    /// Unmark a series. A no-op when it was never a favorite.
    fn remove(&self, user_id: i64, series: &str) -> Result<(), CatalogError>;

    fn is_favorite(&self, user_id: i64, series: &str) -> Result<bool, CatalogError>;

    /// Favorite series of a user, oldest first.
    fn list(&self, user_id: i64) -> Result<Vec<String>, CatalogError>;
}
