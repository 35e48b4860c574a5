//! Status mapping when a store is unusable.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;

use animedex_core::{
    CatalogError, Config, EpisodeCatalog, EpisodeDescriptor, EpisodeRecord, Locator,
    SqliteFavoritesStore, SqliteSettingsStore, SqliteTrendingStore, SqliteUserStore,
};
use animedex_server::state::AppState;
use common::request_router;

/// Catalog whose backing store is gone.
struct UnavailableCatalog;

fn unavailable<T>() -> Result<T, CatalogError> {
    Err(CatalogError::Unavailable("database is locked".to_string()))
}

impl EpisodeCatalog for UnavailableCatalog {
    fn put(
        &self,
        _descriptor: &EpisodeDescriptor,
        _locator: Locator,
        _at: DateTime<Utc>,
    ) -> Result<EpisodeRecord, CatalogError> {
        unavailable()
    }

    fn clear(&self) -> Result<(), CatalogError> {
        unavailable()
    }

    fn distinct_series(&self) -> Result<Vec<String>, CatalogError> {
        unavailable()
    }

    fn search_series(&self, _query: &str) -> Result<Vec<String>, CatalogError> {
        unavailable()
    }

    fn seasons_of(&self, _series: &str) -> Result<Vec<u32>, CatalogError> {
        unavailable()
    }

    fn episodes_of(&self, _series: &str, _season: u32) -> Result<Vec<EpisodeRecord>, CatalogError> {
        unavailable()
    }

    fn latest(&self, _limit: u32) -> Result<Vec<EpisodeRecord>, CatalogError> {
        unavailable()
    }

    fn get_by_id(&self, _id: &str) -> Result<Option<EpisodeRecord>, CatalogError> {
        unavailable()
    }

    fn delete_by_id(&self, _id: &str) -> Result<bool, CatalogError> {
        unavailable()
    }

    fn count(&self) -> Result<u64, CatalogError> {
        unavailable()
    }
}

fn broken_router() -> axum::Router {
    let state = Arc::new(AppState::new(
        Config::default(),
        Arc::new(UnavailableCatalog),
        Arc::new(SqliteTrendingStore::in_memory().unwrap()),
        Arc::new(SqliteFavoritesStore::in_memory().unwrap()),
        Arc::new(SqliteSettingsStore::in_memory().unwrap()),
        Arc::new(SqliteUserStore::in_memory().unwrap()),
    ));
    animedex_server::api::create_router(state)
}

#[tokio::test]
async fn test_store_failure_maps_to_503() {
    let router = broken_router();

    for path in [
        "/api/v1/series",
        "/api/v1/series/search?q=x",
        "/api/v1/series/Show/seasons",
        "/api/v1/series/Show/seasons/1/episodes",
        "/api/v1/episodes/latest",
        "/api/v1/episodes/00000000-0000-4000-8000-000000000000",
        "/api/v1/stats",
    ] {
        let response = request_router(&router, "GET", path, None).await;
        assert_eq!(
            response.status,
            StatusCode::SERVICE_UNAVAILABLE,
            "unexpected status for {}",
            path
        );
        assert!(response.body["error"].is_string());
    }
}

#[tokio::test]
async fn test_ingest_failure_maps_to_503() {
    let router = broken_router();
    let response = request_router(
        &router,
        "POST",
        "/api/v1/ingest",
        Some(json!({"message_id": 1, "channel_id": -1, "file_name": "Show.S01E01.mkv"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_skipped_ingest_never_touches_store() {
    let router = broken_router();
    let response = request_router(
        &router,
        "POST",
        "/api/v1/ingest",
        Some(json!({"message_id": 1, "channel_id": -1, "file_name": "readme.txt"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"skipped": true}));
}

#[tokio::test]
async fn test_other_stores_keep_working() {
    let router = broken_router();
    let response = request_router(&router, "POST", "/api/v1/series/Show/view", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["view_count"], 1);
}
