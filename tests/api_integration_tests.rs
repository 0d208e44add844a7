//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use lru_ttl_cache::{api::create_router, AppState, CacheSettings, LruTtlCache};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_app_with_capacity(100)
}

fn create_app_with_capacity(capacity: usize) -> Router {
    let state = AppState::with_settings(CacheSettings::new(capacity, Duration::from_secs(60)), 300);
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key":"test_key","value":"test_value"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_set_and_get_structured_value() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"user","value":{"id":7,"roles":["admin"]},"ttl":60}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, "GET", "/get/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "user");
    assert_eq!(json["value"]["id"], 7);
    assert_eq!(json["value"]["roles"][0], "admin");
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/get/nonexistent_key", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

// == LRU Eviction via API ==

#[tokio::test]
async fn test_lru_eviction_via_api() {
    let app = create_app_with_capacity(3);

    for key in ["k1", "k2", "k3"] {
        let body = format!(r#"{{"key":"{key}","value":"{key}"}}"#);
        send(&app, "PUT", "/set", Some(&body)).await;
    }

    // Reading k1 makes k2 the eviction candidate
    let (status, _) = send(&app, "GET", "/get/k1", None).await;
    assert_eq!(status, StatusCode::OK);

    send(&app, "PUT", "/set", Some(r#"{"key":"k4","value":"k4"}"#)).await;

    let (status, _) = send(&app, "GET", "/get/k2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/get/k1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["evictions"].as_u64().unwrap(), 1);
    assert_eq!(stats["total_entries"].as_u64().unwrap(), 3);
}

// == GET ALL Endpoint Tests ==

#[tokio::test]
async fn test_get_all_excludes_expired() {
    let app = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"live","value":1}"#)).await;
    send(&app, "PUT", "/set", Some(r#"{"key":"stale","value":2,"ttl":0}"#)).await;

    let (status, json) = send(&app, "GET", "/all", None).await;

    assert_eq!(status, StatusCode::OK);
    let items = json["items"].as_object().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items["live"], 1);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"delete_key","value":"v"}"#)).await;

    let (status, _) = send(&app, "DELETE", "/del/delete_key", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/get/delete_key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_not_found() {
    let app = create_test_app();

    let (status, _) = send(&app, "DELETE", "/del/nonexistent_key", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_all_twice() {
    let app = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"a","value":"1"}"#)).await;
    send(&app, "PUT", "/set", Some(r#"{"key":"b","value":"2"}"#)).await;

    let (status, _) = send(&app, "DELETE", "/all", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, "DELETE", "/all", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No keys found");

    let (_, json) = send(&app, "GET", "/all", None).await;
    assert!(json["items"].as_object().unwrap().is_empty());
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"stats_key","value":"v"}"#)).await;
    send(&app, "GET", "/get/stats_key", None).await;
    send(&app, "GET", "/get/nonexistent", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["total_entries"].as_u64().unwrap(), 1);
    assert!(json.get("hit_rate").is_some());
    assert!(json.get("expirations").is_some());
    assert_eq!(json["dropped_flags"].as_u64().unwrap(), 0);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/set", Some(r#"{"invalid json"#)).await;

    // Axum returns 400 or 422 for JSON parsing errors
    assert!(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let (status, json) = send(&app, "PUT", "/set", Some(r#"{"key":"","value":"test"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"ttl_test","value":"expires_soon","ttl":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, _) = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Sweeper via public API ==

#[tokio::test]
async fn test_spawned_cache_sweeps_and_shuts_down() {
    let token = CancellationToken::new();
    let cache: LruTtlCache<String> =
        LruTtlCache::spawn(CacheSettings::new(10, Duration::from_millis(25)), token.clone());

    cache.set("short", "v".to_string(), Duration::from_millis(10));
    cache.set("long", "v".to_string(), Duration::from_secs(60));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(cache.len(), 1);
    assert!(cache.has_sweeper());

    cache.shutdown().await;
    assert!(!cache.has_sweeper());
    assert!(!token.is_cancelled(), "Shutdown only cancels the cache's own token");
}
