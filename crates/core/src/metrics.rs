//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingestion (indexed episodes, skipped messages)
//! - Bulk re-index runs

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter};

// =============================================================================
// Ingestion Metrics
// =============================================================================

/// Episodes written to the catalog (new keys and replacements).
pub static EPISODES_INDEXED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "animedex_episodes_indexed_total",
        "Total episode records written to the catalog",
    )
    .unwrap()
});

/// Messages whose text carried no season/episode marker.
pub static MESSAGES_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "animedex_messages_skipped_total",
        "Total source messages skipped as not parseable",
    )
    .unwrap()
});

// =============================================================================
// Re-index Metrics
// =============================================================================

/// Completed bulk re-index runs.
pub static REINDEX_RUNS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("animedex_reindex_runs_total", "Total completed re-index runs").unwrap()
});

/// Re-index duration in seconds.
pub static REINDEX_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "animedex_reindex_duration_seconds",
            "Duration of bulk re-index runs",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 900.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Ingestion
        Box::new(EPISODES_INDEXED.clone()),
        Box::new(MESSAGES_SKIPPED.clone()),
        // Re-index
        Box::new(REINDEX_RUNS.clone()),
        Box::new(REINDEX_DURATION.clone()),
    ]
}
