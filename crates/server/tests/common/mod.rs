//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the real router over
//! SQLite stores in a temporary directory, so requests exercise the full
//! stack without a listening socket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use animedex_core::{
    config::DatabaseConfig, Config, EpisodeCatalog, FavoritesStore, SettingsStore, SqliteEpisodeCatalog,
    SqliteFavoritesStore, SqliteSettingsStore, SqliteTrendingStore, SqliteUserStore,
    TrendingStore, UserStore,
};
use animedex_server::state::AppState;

/// Test fixture for API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_ingest() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/ingest", json!({
///         "message_id": 1, "channel_id": -100, "file_name": "Show.S01E01.mkv"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Direct handle on the catalog, for seeding and assertions
    pub catalog: Arc<SqliteEpisodeCatalog>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a fixture with custom configuration. The database path is
    /// always replaced by one inside the fixture's temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        config.database = DatabaseConfig {
            path: db_path.clone(),
        };

        let catalog =
            Arc::new(SqliteEpisodeCatalog::new(&db_path).expect("Failed to create catalog"));
        let trending: Arc<dyn TrendingStore> = Arc::new(
            SqliteTrendingStore::new(&db_path).expect("Failed to create trending store"),
        );
        let favorites: Arc<dyn FavoritesStore> = Arc::new(
            SqliteFavoritesStore::new(&db_path).expect("Failed to create favorites store"),
        );
        let settings: Arc<dyn SettingsStore> = Arc::new(
            SqliteSettingsStore::new(&db_path).expect("Failed to create settings store"),
        );
        let users: Arc<dyn UserStore> =
            Arc::new(SqliteUserStore::new(&db_path).expect("Failed to create user store"));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn EpisodeCatalog>,
            trending,
            favorites,
            settings,
            users,
        ));

        let router = animedex_server::api::create_router(state);

        Self {
            router,
            catalog,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a PUT request without a body.
    pub async fn put_empty(&self, path: &str) -> TestResponse {
        self.request("PUT", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw body text (non-JSON endpoints).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&self.router, request).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        request_router(&self.router, method, path, body).await
    }
}

/// Send a JSON request to any router.
pub async fn request_router(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> TestResponse {
    let mut request_builder = Request::builder().method(method).uri(path);

    let body = if let Some(json_body) = body {
        request_builder = request_builder.header("Content-Type", "application/json");
        Body::from(serde_json::to_vec(&json_body).unwrap())
    } else {
        Body::empty()
    };

    let request = request_builder.body(body).unwrap();
    let (status, body_bytes) = send(router, request).await;

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    TestResponse { status, body }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();

    (status, body_bytes.to_vec())
}

/// Percent-encode a path segment.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
