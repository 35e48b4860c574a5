//! Settings and caption mode API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use animedex_core::{CaptionMode, SettingsStoreExt, CAPTION_MODE_KEY};

use super::error::{run_blocking, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct CaptionModeResponse {
    pub mode: CaptionMode,
    pub name: &'static str,
}

impl From<CaptionMode> for CaptionModeResponse {
    fn from(mode: CaptionMode) -> Self {
        Self {
            mode,
            name: mode.as_str(),
        }
    }
}

/// GET /api/v1/settings/{key}
pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<SettingResponse>, ApiError> {
    let settings = state.settings();
    let lookup_key = key.clone();

    match run_blocking(move || settings.get_value(&lookup_key)).await? {
        Some(value) => Ok(Json(SettingResponse { key, value })),
        None => Err(ApiError::not_found(format!("Setting not found: {}", key))),
    }
}

/// PUT /api/v1/settings/{key}
///
/// The request body is the raw JSON value to store.
pub async fn put_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<SettingResponse>, ApiError> {
    let settings = state.settings();
    let (store_key, store_value) = (key.clone(), value.clone());
    run_blocking(move || settings.set_value(&store_key, &store_value)).await?;
    Ok(Json(SettingResponse { key, value }))
}

/// GET /api/v1/caption-mode
pub async fn get_caption_mode(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CaptionModeResponse>, ApiError> {
    let mode = run_blocking(move || state.caption_mode()).await?;
    Ok(Json(mode.into()))
}

/// POST /api/v1/caption-mode/next
///
/// Advance the caption mode one step in its cycle.
pub async fn next_caption_mode(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CaptionModeResponse>, ApiError> {
    let mode = run_blocking(move || {
        let next = state.caption_mode()?.next();
        state.settings().set_setting(CAPTION_MODE_KEY, &next.code())?;
        Ok(next)
    })
    .await?;

    info!(mode = %mode, "caption mode changed");
    Ok(Json(mode.into()))
}
