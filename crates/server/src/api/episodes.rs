//! Episode lookup, recently-added and trending API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use animedex_core::config::MAX_LIST_LIMIT;
use animedex_core::{render_caption, CaptionMode, SeriesPopularity};

use super::error::{run_blocking, ApiError};
use super::series::EpisodeView;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

impl LimitParams {
    /// Requested limit capped at the largest list size, or `default`.
    fn resolve(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).min(MAX_LIST_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub episodes: Vec<EpisodeView>,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub series: Vec<SeriesPopularity>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub mode: CaptionMode,
    /// `None` keeps the source caption.
    pub caption: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/episodes/latest?limit=
pub async fn latest_episodes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<LatestResponse>, ApiError> {
    let limit = params.resolve(state.config().catalog.latest_limit);
    let window = state.config().catalog.recent_window();
    let catalog = state.catalog();
    let records = run_blocking(move || catalog.latest(limit)).await?;

    Ok(Json(LatestResponse {
        episodes: EpisodeView::from_records(records, window),
    }))
}

/// GET /api/v1/episodes/{id}
pub async fn get_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EpisodeView>, ApiError> {
    let window = state.config().catalog.recent_window();
    let catalog = state.catalog();
    let lookup_id = id.clone();

    match run_blocking(move || catalog.get_by_id(&lookup_id)).await? {
        Some(record) => Ok(Json(EpisodeView::new(record, Utc::now(), window))),
        None => Err(ApiError::not_found(format!("Episode not found: {}", id))),
    }
}

/// DELETE /api/v1/episodes/{id}
///
/// Deleting an unknown id is a no-op reported as `deleted: false`.
pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let catalog = state.catalog();
    let deleted = run_blocking(move || catalog.delete_by_id(&id)).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// GET /api/v1/episodes/{id}/caption
///
/// Caption to deliver the episode with under the active caption mode.
pub async fn episode_caption(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let lookup_id = id.clone();
    let found = run_blocking(move || {
        let record = state.catalog().get_by_id(&lookup_id)?;
        match record {
            Some(record) => Ok(Some((state.caption_mode()?, record))),
            None => Ok(None),
        }
    })
    .await?;

    let Some((mode, record)) = found else {
        return Err(ApiError::not_found(format!("Episode not found: {}", id)));
    };

    Ok(Json(CaptionResponse {
        mode,
        caption: render_caption(mode, &record),
    }))
}

/// GET /api/v1/trending?limit=
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let limit = params.resolve(state.config().catalog.trending_limit);
    let store = state.trending();
    let series = run_blocking(move || store.top(limit)).await?;
    Ok(Json(TrendingResponse { series }))
}
