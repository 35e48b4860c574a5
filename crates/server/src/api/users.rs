//! User registration, favorites and ad cooldown API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use animedex_core::{UserProfile, UserRecord};

use super::error::{run_blocking, ApiError};
use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub user_id: i64,
    pub series: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub user_id: i64,
    pub series_name: String,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct CooldownStatus {
    pub user_id: i64,
    pub elapsed: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/users
///
/// Register a user or refresh a known one. `201` only for first contact.
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<UserProfile>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    let users = state.users();
    let (known, record) = run_blocking(move || {
        let known = users.exists(profile.user_id)?;
        let record = users.register(&profile, Utc::now())?;
        Ok((known, record))
    })
    .await?;

    if known {
        Ok((StatusCode::OK, Json(record)))
    } else {
        info!(user_id = record.user_id, "new user registered");
        Ok((StatusCode::CREATED, Json(record)))
    }
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserRecord>, ApiError> {
    let users = state.users();
    run_blocking(move || users.get(user_id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", user_id)))
}

/// GET /api/v1/users/{id}/favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let favorites = state.favorites();
    let series = run_blocking(move || favorites.list(user_id)).await?;
    Ok(Json(FavoritesResponse { user_id, series }))
}

/// GET /api/v1/users/{id}/favorites/{series}
pub async fn favorite_status(
    State(state): State<Arc<AppState>>,
    Path((user_id, series_name)): Path<(i64, String)>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let favorites = state.favorites();
    let series = series_name.clone();
    let favorite = run_blocking(move || favorites.is_favorite(user_id, &series)).await?;
    Ok(Json(FavoriteStatus {
        user_id,
        series_name,
        favorite,
    }))
}

/// PUT /api/v1/users/{id}/favorites/{series}
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, series_name)): Path<(i64, String)>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let favorites = state.favorites();
    let series = series_name.clone();
    run_blocking(move || favorites.add(user_id, &series, Utc::now())).await?;
    Ok(Json(FavoriteStatus {
        user_id,
        series_name,
        favorite: true,
    }))
}

/// DELETE /api/v1/users/{id}/favorites/{series}
///
/// Removing a series that is not a favorite succeeds.
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, series_name)): Path<(i64, String)>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let favorites = state.favorites();
    let series = series_name.clone();
    run_blocking(move || favorites.remove(user_id, &series)).await?;
    Ok(Json(FavoriteStatus {
        user_id,
        series_name,
        favorite: false,
    }))
}

/// GET /api/v1/users/{id}/cooldown
///
/// Whether the configured ad cooldown has passed for the user.
pub async fn cooldown_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<CooldownStatus>, ApiError> {
    let window = state.config().ads.cooldown_window();
    let settings = state.settings();
    let elapsed =
        run_blocking(move || settings.cooldown_elapsed(user_id, window, Utc::now())).await?;
    Ok(Json(CooldownStatus { user_id, elapsed }))
}

/// POST /api/v1/users/{id}/cooldown
///
/// Record that an ad was just shown to the user.
pub async fn touch_cooldown(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<CooldownStatus>, ApiError> {
    let settings = state.settings();
    run_blocking(move || settings.touch_cooldown(user_id, Utc::now())).await?;
    Ok(Json(CooldownStatus {
        user_id,
        elapsed: false,
    }))
}
