pub mod caption;
pub mod catalog;
pub mod config;
mod db;
pub mod extractor;
pub mod favorites;
pub mod ingest;
pub mod metrics;
pub mod settings;
pub mod trending;
pub mod users;

pub use caption::{render_caption, CaptionMode, CAPTION_MODE_KEY};
pub use catalog::{
    escape_like, CatalogError, CatalogStats, EpisodeCatalog, EpisodeRecord, Locator,
    SeriesPopularity, SqliteEpisodeCatalog, DEFAULT_RECENT_WINDOW_HOURS, SEARCH_RESULT_LIMIT,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use extractor::{extract, Audio, EpisodeDescriptor, Quality};
pub use favorites::{FavoritesStore, SqliteFavoritesStore};
pub use ingest::{IndexOutcome, Indexer, ReindexReport, SourceMessage, REINDEX_PROGRESS_INTERVAL};
pub use settings::{SettingsStore, SettingsStoreExt, SqliteSettingsStore, DEFAULT_AD_COOLDOWN_SECS};
pub use trending::{SqliteTrendingStore, TrendingStore};
pub use users::{SqliteUserStore, UserProfile, UserRecord, UserStore};
