//! API tests exercising the router end to end against a temp database

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use prompt_registry::SqliteStore;
use prompt_registry_server::{AppState, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app() -> (tempfile::TempDir, Router) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite:{}/test.db", temp_dir.path().display());
    let store = Arc::new(SqliteStore::new(&db_url).await.unwrap());
    let app = create_router(AppState::new(store));
    (temp_dir, app)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_and_fetch_prompt() {
    let (_dir, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/prompts",
            json!({"title": "My Test Prompt", "content": "Hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["slug"], "my-test-prompt");
    assert_eq!(body["current_version"]["version_number"], 1);

    let response = app
        .oneshot(get("/api/prompts/my-test-prompt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "My Test Prompt");
    assert_eq!(body["current_version"]["content"], "Hello");
}

#[tokio::test]
async fn validation_failures_map_to_400() {
    let (_dir, app) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/prompts",
            json!({"title": "   ", "content": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json(
            "/api/prompts",
            json!({"title": "Valid", "content": "  "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_slug_maps_to_409() {
    let (_dir, app) = test_app().await;

    let first = app
        .clone()
        .oneshot(post_json(
            "/api/prompts",
            json!({"slug": "duplicate-slug", "title": "Test Prompt 1", "content": "a"}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json(
            "/api/prompts",
            json!({"slug": "duplicate-slug", "title": "Test Prompt 2", "content": "b"}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn unknown_resources_map_to_404() {
    let (_dir, app) = test_app().await;

    for uri in [
        "/api/prompts/ghost",
        "/api/prompts/ghost/versions",
        "/api/prompts/ghost/versions/1",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {}", uri);
    }

    let response = app
        .oneshot(post_json(
            "/api/prompts/ghost/versions",
            json!({"content": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn version_lifecycle_over_http() {
    let (_dir, app) = test_app().await;

    app.clone()
        .oneshot(post_json(
            "/api/prompts",
            json!({"title": "Lifecycle", "content": "v1"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/prompts/lifecycle/versions",
            json!({"content": "v2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["current_version"]["version_number"], 2);

    let response = app
        .clone()
        .oneshot(get("/api/prompts/lifecycle/versions"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["version_number"], 1);
    assert_eq!(body[1]["version_number"], 2);

    let response = app
        .oneshot(get("/api/prompts/lifecycle/versions/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["content"], "v1");
}

#[tokio::test]
async fn list_prompts_pages_over_http() {
    let (_dir, app) = test_app().await;

    for n in 1..=5 {
        app.clone()
            .oneshot(post_json(
                "/api/prompts",
                json!({"slug": format!("p-{}", n), "title": format!("P {}", n), "content": "c"}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get("/api/prompts?limit=2&offset=2"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["slug"], "p-3");
    assert_eq!(body[1]["slug"], "p-2");
}

#[tokio::test]
async fn health_and_metrics_endpoints() {
    let (_dir, app) = test_app().await;

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["database"], "connected");

    app.clone()
        .oneshot(post_json(
            "/api/prompts",
            json!({"title": "Counted", "content": "c"}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("prompts_created_total 1"));
    assert!(text.contains("prompt_versions_created_total 1"));
    assert!(text.contains("http_requests_total"));
}
