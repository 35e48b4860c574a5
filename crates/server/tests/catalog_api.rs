//! Ingestion, browsing and ranking through the HTTP API.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use animedex_core::{Audio, EpisodeCatalog, EpisodeDescriptor, Locator, Quality};
use common::{segment, TestFixture};

fn file_message(message_id: i64, file_name: &str) -> Value {
    json!({
        "message_id": message_id,
        "channel_id": -1001234,
        "file_name": file_name,
    })
}

async fn ingest(fixture: &TestFixture, message_id: i64, file_name: &str) -> Value {
    let response = fixture
        .post("/api/v1/ingest", file_message(message_id, file_name))
        .await;
    assert_status!(response, StatusCode::OK);
    response.body
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "status", json!("ok"));
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["database"]["file_name"], "test.db");
    assert_eq!(response.body["catalog"]["recent_window_hours"], 24);
    let raw = response.body.to_string();
    let temp_path = fixture.temp_dir.path().to_string_lossy().into_owned();
    assert!(!raw.contains(&temp_path));
}

#[tokio::test]
async fn test_extract_scene_filename() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/extract",
            json!({"filename": "[Group] Some.Show.S01E02.1080p.mkv"}),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "series_name": "Some Show",
            "season": 1,
            "episode": 2,
            "quality": "1080p",
            "audio": "original",
        })
    );
}

#[tokio::test]
async fn test_extract_caption_wins() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/extract",
            json!({
                "filename": "ignored.S09E09.mkv",
                "caption": "Another Show - S2E10 [Dual Audio] [720p]",
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "series_name", json!("Another Show"));
    assert_json_path!(response.body, "quality", json!("720p"));
    assert_json_path!(response.body, "audio", json!("dual"));
}

#[tokio::test]
async fn test_extract_not_parseable_is_422() {
    let fixture = TestFixture::new();
    let response = fixture
        .post("/api/v1/extract", json!({"filename": "Some.Movie.2020.mkv"}))
        .await;

    assert_status!(response, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_ingest_indexes_and_flags_recent() {
    let fixture = TestFixture::new();
    let body = ingest(&fixture, 10, "Some.Show.S01E02.720p.mkv").await;

    assert_eq!(body["skipped"], false);
    assert_eq!(body["record"]["series_name"], "Some Show");
    assert_eq!(body["record"]["locator"]["message_id"], 10);
    assert_eq!(body["record"]["recent"], true);
    assert_eq!(fixture.catalog.count().unwrap(), 1);
}

#[tokio::test]
async fn test_ingest_skips_unparseable() {
    let fixture = TestFixture::new();
    let body = ingest(&fixture, 11, "notes.pdf").await;

    assert_eq!(body, json!({"skipped": true}));
    assert_eq!(fixture.catalog.count().unwrap(), 0);
}

#[tokio::test]
async fn test_ingest_same_key_twice_keeps_one_record() {
    let fixture = TestFixture::new();
    let first = ingest(&fixture, 1, "Show.S01E01.720p.mkv").await;
    let second = ingest(&fixture, 2, "Show.S01E01.720p.mkv").await;

    assert_eq!(first["record"]["id"], second["record"]["id"]);
    assert_eq!(second["record"]["locator"]["message_id"], 2);
    assert_eq!(fixture.catalog.count().unwrap(), 1);
}

#[tokio::test]
async fn test_reindex_replaces_catalog() {
    let fixture = TestFixture::new();
    ingest(&fixture, 1, "Stale.Show.S01E01.mkv").await;

    let response = fixture
        .post(
            "/api/v1/reindex",
            json!({
                "messages": [
                    file_message(20, "Show.S01E01.mkv"),
                    file_message(21, "readme.txt"),
                    {"message_id": 22, "channel_id": -1, "caption": "Show - S01E02 [480p]"},
                ]
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"scanned": 3, "indexed": 2, "skipped": 1})
    );

    let series = fixture.get("/api/v1/series").await;
    assert_eq!(series.body["series"], json!(["Show"]));
    assert_eq!(series.body["total"], 1);
}

#[tokio::test]
async fn test_browse_seasons_and_episodes() {
    let fixture = TestFixture::new();
    ingest(&fixture, 1, "One.Piece.S02E03.480p.mkv").await;
    ingest(&fixture, 2, "One.Piece.S02E01.720p.mkv").await;
    ingest(&fixture, 3, "One.Piece.S02E03.1080p.mkv").await;
    ingest(&fixture, 4, "One.Piece.S01E01.mkv").await;

    let name = segment("One Piece");
    let seasons = fixture
        .get(&format!("/api/v1/series/{}/seasons", name))
        .await;
    assert_status!(seasons, StatusCode::OK);
    assert_eq!(seasons.body["series_name"], "One Piece");
    assert_eq!(seasons.body["seasons"], json!([1, 2]));

    let episodes = fixture
        .get(&format!("/api/v1/series/{}/seasons/2/episodes", name))
        .await;
    assert_status!(episodes, StatusCode::OK);
    let keys: Vec<(u64, String)> = episodes.body["episodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["episode"].as_u64().unwrap(),
                e["quality"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (1, "720p".to_string()),
            (3, "1080p".to_string()),
            (3, "480p".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unknown_series_has_no_seasons() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/series/Nothing/seasons").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["seasons"], json!([]));
}

#[tokio::test]
async fn test_search_is_literal() {
    let fixture = TestFixture::new();
    ingest(&fixture, 1, "Show (Part 1) S01E01.mkv").await;
    ingest(&fixture, 2, "Other.Show.S01E01.mkv").await;

    let response = fixture
        .get(&format!("/api/v1/series/search?q={}", segment("Part 1)")))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["series"], json!(["Show (Part 1)"]));

    let response = fixture.get("/api/v1/series/search?q=SHOW").await;
    assert_eq!(response.body["total"], 2);

    let response = fixture.get("/api/v1/series/search?q=%25").await;
    assert_eq!(response.body["series"], json!([]));
}

#[tokio::test]
async fn test_latest_orders_newest_first_with_recent_flag() {
    let fixture = TestFixture::new();
    let old = Utc::now() - Duration::hours(30);
    fixture
        .catalog
        .put(
            &EpisodeDescriptor {
                series_name: "Old Show".to_string(),
                season: 1,
                episode: 1,
                quality: Quality::P720,
                audio: Audio::Original,
            },
            Locator {
                message_id: 1,
                channel_id: -1,
            },
            old,
        )
        .unwrap();
    ingest(&fixture, 2, "New.Show.S01E01.mkv").await;

    let response = fixture.get("/api/v1/episodes/latest").await;
    assert_status!(response, StatusCode::OK);
    let episodes = response.body["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["series_name"], "New Show");
    assert_eq!(episodes[0]["recent"], true);
    assert_eq!(episodes[1]["series_name"], "Old Show");
    // Stored flag is still set; the read-time flag is what counts
    assert_eq!(episodes[1]["is_new"], true);
    assert_eq!(episodes[1]["recent"], false);

    let limited = fixture.get("/api/v1/episodes/latest?limit=1").await;
    assert_eq!(limited.body["episodes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_and_delete_episode() {
    let fixture = TestFixture::new();
    let body = ingest(&fixture, 5, "Show.S01E05.mkv").await;
    let id = body["record"]["id"].as_str().unwrap().to_string();

    let response = fixture.get(&format!("/api/v1/episodes/{}", id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["episode"], 5);

    let response = fixture.delete(&format!("/api/v1/episodes/{}", id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["deleted"], true);

    let response = fixture.get(&format!("/api/v1/episodes/{}", id)).await;
    assert_status!(response, StatusCode::NOT_FOUND);

    // Deleting again is a no-op
    let response = fixture.delete(&format!("/api/v1/episodes/{}", id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["deleted"], false);
}

#[tokio::test]
async fn test_delete_unknown_episode_is_noop() {
    let fixture = TestFixture::new();
    ingest(&fixture, 1, "Show.S01E01.mkv").await;

    let response = fixture
        .delete("/api/v1/episodes/00000000-0000-4000-8000-000000000000")
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["deleted"], false);

    let response = fixture.delete("/api/v1/episodes/not-a-real-id").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["deleted"], false);

    let response = fixture.get("/api/v1/series").await;
    assert_eq!(response.body["total"], 1);
}

#[tokio::test]
async fn test_malformed_episode_id_is_404() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/episodes/not-a-real-id").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trending_ranking() {
    let fixture = TestFixture::new();
    for name in ["B", "A", "A"] {
        let response = fixture
            .post_empty(&format!("/api/v1/series/{}/view", name))
            .await;
        assert_status!(response, StatusCode::OK);
    }

    let response = fixture.get("/api/v1/trending").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.body["series"],
        json!([
            {"series_name": "A", "view_count": 2},
            {"series_name": "B", "view_count": 1},
        ])
    );

    let response = fixture.get("/api/v1/trending?limit=1").await;
    assert_eq!(response.body["series"].as_array().unwrap().len(), 1);

    let response = fixture.get("/api/v1/series/A/views").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!({"series_name": "A", "view_count": 2}));

    // Never viewed reads as zero
    let response = fixture.get("/api/v1/series/C/views").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["view_count"], 0);
}

#[tokio::test]
async fn test_stats() {
    let fixture = TestFixture::new();
    ingest(&fixture, 1, "A.S01E01.mkv").await;
    ingest(&fixture, 2, "A.S01E02.mkv").await;
    ingest(&fixture, 3, "B.S01E01.mkv").await;
    fixture
        .post("/api/v1/users", json!({"user_id": 9, "first_name": "Nine"}))
        .await;

    let response = fixture.get("/api/v1/stats").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"total_users": 1, "total_files": 3, "total_series": 2})
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    ingest(&fixture, 1, "A.S01E01.mkv").await;

    let (status, text) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("animedex_catalog_episodes"));
    assert!(text.contains("animedex_http_requests_total"));
    assert!(text.contains("animedex_episodes_indexed_total"));
}
