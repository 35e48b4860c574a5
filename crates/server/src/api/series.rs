//! Series browsing API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use animedex_core::{EpisodeRecord, SeriesPopularity};

use super::error::{run_blocking, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SeriesListResponse {
    pub series: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub series_name: String,
    pub seasons: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct EpisodesResponse {
    pub series_name: String,
    pub season: u32,
    pub episodes: Vec<EpisodeView>,
}

/// Episode record with its read-time recency flag.
#[derive(Debug, Serialize)]
pub struct EpisodeView {
    #[serde(flatten)]
    pub record: EpisodeRecord,
    pub recent: bool,
}

impl EpisodeView {
    pub fn new(record: EpisodeRecord, now: DateTime<Utc>, window: Duration) -> Self {
        let recent = record.is_recent(now, window);
        Self { record, recent }
    }

    pub fn from_records(records: Vec<EpisodeRecord>, window: Duration) -> Vec<Self> {
        let now = Utc::now();
        records
            .into_iter()
            .map(|record| Self::new(record, now, window))
            .collect()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/series
pub async fn list_series(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeriesListResponse>, ApiError> {
    let catalog = state.catalog();
    let series = run_blocking(move || catalog.distinct_series()).await?;
    let total = series.len();
    Ok(Json(SeriesListResponse { series, total }))
}

/// GET /api/v1/series/search?q=
///
/// Case-insensitive literal substring search over series names.
pub async fn search_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SeriesListResponse>, ApiError> {
    let catalog = state.catalog();
    let series = run_blocking(move || catalog.search_series(&params.q)).await?;
    let total = series.len();
    Ok(Json(SeriesListResponse { series, total }))
}

/// GET /api/v1/series/{name}/seasons
pub async fn list_seasons(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SeasonsResponse>, ApiError> {
    let catalog = state.catalog();
    let series_name = name.clone();
    let seasons = run_blocking(move || catalog.seasons_of(&name)).await?;
    Ok(Json(SeasonsResponse {
        series_name,
        seasons,
    }))
}

/// GET /api/v1/series/{name}/seasons/{season}/episodes
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    Path((name, season)): Path<(String, u32)>,
) -> Result<Json<EpisodesResponse>, ApiError> {
    let catalog = state.catalog();
    let window = state.config().catalog.recent_window();
    let series_name = name.clone();
    let records = run_blocking(move || catalog.episodes_of(&name, season)).await?;

    Ok(Json(EpisodesResponse {
        series_name,
        season,
        episodes: EpisodeView::from_records(records, window),
    }))
}

/// POST /api/v1/series/{name}/view
///
/// Count one view of a series (a delivered download).
pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SeriesPopularity>, ApiError> {
    let trending = state.trending();
    let series_name = name.clone();
    let view_count = run_blocking(move || trending.bump_view(&name)).await?;
    Ok(Json(SeriesPopularity {
        series_name,
        view_count,
    }))
}

/// GET /api/v1/series/{name}/views
pub async fn view_count(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SeriesPopularity>, ApiError> {
    let trending = state.trending();
    let series_name = name.clone();
    let view_count = run_blocking(move || trending.view_count(&name)).await?;
    Ok(Json(SeriesPopularity {
        series_name,
        view_count,
    }))
}
