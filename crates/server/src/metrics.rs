//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the animedex server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog size (collected on scrape)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "animedex_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("animedex_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "animedex_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Episode records in the catalog.
pub static CATALOG_EPISODES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "animedex_catalog_episodes",
        "Number of episode records in the catalog",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_EPISODES.clone()))
        .unwrap();

    // Core metrics (ingestion, re-index)
    for metric in animedex_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
///
/// Blocking: reads the catalog store.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.catalog().count() {
        Ok(count) => CATALOG_EPISODES.set(i64::try_from(count).unwrap_or(i64::MAX)),
        Err(e) => warn!(error = %e, "failed to count catalog episodes"),
    }
}

/// Path segments that carry ids (numeric user ids, record UUIDs).
static ID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:-?\d+|[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})$",
    )
    .unwrap()
});

/// Normalize a path for metric labels (replace ids and free-form names with
/// placeholders).
pub fn normalize_path(path: &str) -> String {
    let mut previous = "";
    let segments: Vec<&str> = path
        .split('/')
        .map(|segment| {
            let normalized = match previous {
                "series" if segment != "search" && !segment.is_empty() => "{name}",
                "favorites" if !segment.is_empty() => "{series}",
                "settings" if !segment.is_empty() => "{key}",
                _ if ID_SEGMENT.is_match(segment) => "{id}",
                _ => segment,
            };
            previous = segment;
            normalized
        })
        .collect();
    segments.join("/")
}
