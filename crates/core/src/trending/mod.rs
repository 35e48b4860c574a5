//! Per-series view counters and the trending ranking built from them.

mod sqlite;

pub use sqlite::SqliteTrendingStore;

use crate::catalog::{CatalogError, SeriesPopularity};

/// Trait for popularity storage.
///
/// Counters are created lazily on first bump and never deleted.
pub trait TrendingStore: Send + Sync {
    /// Atomically create the counter at 1 or increment it.
    fn bump_view(&self, series: &str) -> Result<u64, CatalogError>;

    /// Up to `limit` series by view count descending. Equal counts keep the
    /// order in which the series were first viewed.
    fn top(&self, limit: u32) -> Result<Vec<SeriesPopularity>, CatalogError>;

    /// Current count for a series, 0 if it was never viewed.
    fn view_count(&self, series: &str) -> Result<u64, CatalogError>;
}
