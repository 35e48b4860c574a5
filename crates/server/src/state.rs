use std::sync::Arc;

use animedex_core::{
    CaptionMode, Config, EpisodeCatalog, FavoritesStore, Indexer, SanitizedConfig, SettingsStore,
    SettingsStoreExt, TrendingStore, UserStore, CAPTION_MODE_KEY,
};
use tracing::warn;

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn EpisodeCatalog>,
    trending: Arc<dyn TrendingStore>,
    favorites: Arc<dyn FavoritesStore>,
    settings: Arc<dyn SettingsStore>,
    users: Arc<dyn UserStore>,
    indexer: Arc<Indexer>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn EpisodeCatalog>,
        trending: Arc<dyn TrendingStore>,
        favorites: Arc<dyn FavoritesStore>,
        settings: Arc<dyn SettingsStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        let indexer = Arc::new(Indexer::new(Arc::clone(&catalog)));
        Self {
            config,
            catalog,
            trending,
            favorites,
            settings,
            users,
            indexer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> Arc<dyn EpisodeCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn trending(&self) -> Arc<dyn TrendingStore> {
        Arc::clone(&self.trending)
    }

    pub fn favorites(&self) -> Arc<dyn FavoritesStore> {
        Arc::clone(&self.favorites)
    }

    pub fn settings(&self) -> Arc<dyn SettingsStore> {
        Arc::clone(&self.settings)
    }

    pub fn users(&self) -> Arc<dyn UserStore> {
        Arc::clone(&self.users)
    }

    pub fn indexer(&self) -> Arc<Indexer> {
        Arc::clone(&self.indexer)
    }

    /// Caption mode from config, used until one is stored.
    pub fn default_caption_mode(&self) -> CaptionMode {
        CaptionMode::try_from(self.config.caption.default_mode).unwrap_or_default()
    }

    /// Active caption mode. Blocking: call from a blocking task.
    pub fn caption_mode(&self) -> Result<CaptionMode, animedex_core::CatalogError> {
        let default = self.default_caption_mode();
        let code: u8 = self.settings.get_setting(CAPTION_MODE_KEY, default.code())?;
        Ok(CaptionMode::try_from(code).unwrap_or_else(|e| {
            warn!(error = %e, "stored caption mode is invalid, using default");
            default
        }))
    }
}
