//! Integration tests for host event endpoints
//!
//! Requires PostgreSQL; skipped when the database is not available.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use tower::ServiceExt;

macro_rules! require_db {
    ($pool_var:ident) => {
        let $pool_var = match try_create_test_pool().await {
            Some(p) => p,
            None => {
                eprintln!("Skipping test: database not available");
                return;
            }
        };
    };
}

#[tokio::test]
async fn test_create_host_event() {
    require_db!(pool);
    let app = bare_router(pool.clone());

    let host_id = create_user(&app, &unique_email(), None).await;

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/host-events",
            &json!({
                "title": "  Rooftop Jazz  ",
                "hostUserId": host_id,
                "type": "jazz",
                "location": "Boston Harbor",
                "start": "2030-06-01T19:00:00Z",
                "currencyCode": "usd",
                "amount": 15.0,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Rooftop Jazz");
    assert_eq!(body["type"], "Music");
    assert_eq!(body["source"], "Host");
    assert_eq!(body["currencyCode"], "USD");
    assert_eq!(body["hostUserId"], host_id);

    let event_id = body["eventId"].as_i64().unwrap();
    let response = app
        .oneshot(get(&format!("/api/host-events/{}", event_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["location"], "Boston Harbor");

    cleanup_user(&pool, host_id).await;
}

#[tokio::test]
async fn test_create_for_unknown_host() {
    require_db!(pool);
    let app = bare_router(pool);

    let response = app
        .oneshot(json_post(
            "/api/host-events",
            &json!({ "title": "Orphan", "hostUserId": 2147483647 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_error_code!(body, "NOT_FOUND");
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    require_db!(pool);
    let app = bare_router(pool.clone());

    let host_id = create_user(&app, &unique_email(), None).await;

    for body in [
        json!({ "title": " ", "hostUserId": host_id }),
        json!({ "title": "Free Money", "hostUserId": host_id, "amount": -1.0 }),
    ] {
        let response = app
            .clone()
            .oneshot(json_post("/api/host-events", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }

    cleanup_user(&pool, host_id).await;
}

#[tokio::test]
async fn test_list_filters_by_host() {
    require_db!(pool);
    let app = bare_router(pool.clone());

    let first = create_user(&app, &unique_email(), None).await;
    let second = create_user(&app, &unique_email(), None).await;

    for (host, title) in [(first, "First Show"), (first, "Second Show"), (second, "Other Show")] {
        let response = app
            .clone()
            .oneshot(json_post(
                "/api/host-events",
                &json!({ "title": title, "hostUserId": host }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/host-events?hostUserId={}", first)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["hostUserId"] == first));
    assert!(events.iter().all(|e| e["type"] == "Other"));

    let all = body_json(app.oneshot(get("/api/host-events")).await.unwrap()).await;
    assert!(all.as_array().unwrap().len() >= 3);

    cleanup_user(&pool, first).await;
    cleanup_user(&pool, second).await;
}

#[tokio::test]
async fn test_get_missing_event() {
    require_db!(pool);
    let app = bare_router(pool);

    let response = app
        .oneshot(get("/api/host-events/2147483647"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_without_title_is_json_validation_error() {
    let app = bare_router(unreachable_pool());

    let response = app
        .oneshot(json_post("/api/host-events", &json!({ "hostUserId": 1 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_error_code!(body, "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_non_numeric_event_id_is_json_validation_error() {
    let app = bare_router(unreachable_pool());

    let response = app.oneshot(get("/api/host-events/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_error_code!(body, "VALIDATION_ERROR");
}
