use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use animedex_core::{CatalogStats, SanitizedConfig};

use super::error::{run_blocking, ApiError};
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /api/v1/stats
///
/// Admin statistics: registered users, indexed files, distinct series.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogStats>, ApiError> {
    let stats = run_blocking(move || {
        Ok(CatalogStats {
            total_users: state.users().count()?,
            total_files: state.catalog().count()?,
            total_series: state.catalog().distinct_series()?.len() as u64,
        })
    })
    .await?;

    Ok(Json(stats))
}

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let collected = tokio::task::spawn_blocking(move || collect_dynamic_metrics(&state)).await;
    if let Err(e) = collected {
        tracing::warn!(error = %e, "failed to collect dynamic metrics");
    }

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
