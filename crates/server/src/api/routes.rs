use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{episodes, handlers, ingest, middleware::metrics_middleware, series, settings, users};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and admin
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/stats", get(handlers::get_stats))
        // Ingestion
        .route("/extract", post(ingest::extract_descriptor))
        .route("/ingest", post(ingest::ingest_message))
        .route("/reindex", post(ingest::reindex))
        // Series
        .route("/series", get(series::list_series))
        .route("/series/search", get(series::search_series))
        .route("/series/{name}/seasons", get(series::list_seasons))
        .route(
            "/series/{name}/seasons/{season}/episodes",
            get(series::list_episodes),
        )
        .route("/series/{name}/view", post(series::record_view))
        .route("/series/{name}/views", get(series::view_count))
        // Episodes
        .route("/episodes/latest", get(episodes::latest_episodes))
        .route(
            "/episodes/{id}",
            get(episodes::get_episode).delete(episodes::delete_episode),
        )
        .route("/episodes/{id}/caption", get(episodes::episode_caption))
        .route("/trending", get(episodes::trending))
        // Users
        .route("/users", post(users::register_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/favorites", get(users::list_favorites))
        .route(
            "/users/{id}/favorites/{series}",
            get(users::favorite_status)
                .put(users::add_favorite)
                .delete(users::remove_favorite),
        )
        .route(
            "/users/{id}/cooldown",
            get(users::cooldown_status).post(users::touch_cooldown),
        )
        // Settings
        .route(
            "/settings/{key}",
            get(settings::get_setting).put(settings::put_setting),
        )
        .route("/caption-mode", get(settings::get_caption_mode))
        .route("/caption-mode/next", post(settings::next_caption_mode))
        .with_state(state.clone());

    Router::new()
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
