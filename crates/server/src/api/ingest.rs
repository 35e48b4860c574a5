//! Ingestion API handlers: extraction, single-message indexing, re-index.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use animedex_core::{extract, EpisodeDescriptor, IndexOutcome, ReindexReport, SourceMessage};

use super::error::{run_blocking, ApiError};
use super::series::EpisodeView;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<EpisodeView>,
}

#[derive(Debug, Deserialize)]
pub struct ReindexRequest {
    #[serde(default)]
    pub messages: Vec<SourceMessage>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/extract
///
/// Run the extractor only. 422 when the text describes no episode.
pub async fn extract_descriptor(
    Json(request): Json<ExtractRequest>,
) -> Result<Json<EpisodeDescriptor>, ApiError> {
    extract(&request.filename, &request.caption)
        .map(Json)
        .ok_or_else(|| ApiError::unprocessable("No season/episode marker found"))
}

/// POST /api/v1/ingest
///
/// Index one source message.
pub async fn ingest_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<SourceMessage>,
) -> Result<Json<IngestResponse>, ApiError> {
    let window = state.config().catalog.recent_window();
    let indexer = state.indexer();
    let outcome = run_blocking(move || indexer.index_message(&message, Utc::now())).await?;

    let response = match outcome {
        IndexOutcome::Indexed(record) => IngestResponse {
            skipped: false,
            record: Some(EpisodeView::new(record, Utc::now(), window)),
        },
        IndexOutcome::Skipped => IngestResponse {
            skipped: true,
            record: None,
        },
    };

    Ok(Json(response))
}

/// POST /api/v1/reindex
///
/// Clear the catalog and replay the given history in order.
pub async fn reindex(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReindexRequest>,
) -> Result<Json<ReindexReport>, ApiError> {
    let indexer = state.indexer();
    let total = request.messages.len();
    info!(messages = total, "starting re-index");

    let report = run_blocking(move || {
        indexer.reindex(&request.messages, |progress| {
            info!(
                indexed = progress.indexed,
                scanned = progress.scanned,
                total,
                "re-index progress"
            );
        })
    })
    .await?;

    Ok(Json(report))
}
