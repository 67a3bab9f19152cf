//! HTTP API server for the prompt registry
//!
//! Thin REST surface over [`prompt_registry::PromptStore`]: request parsing,
//! typed-error to status-code mapping, and process-wide counters. All
//! versioning invariants live in the store.

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use prompt_registry::PromptStore;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;

use metrics::Metrics;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PromptStore>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn PromptStore>) -> Self {
        Self {
            store,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(export_metrics))
        .nest("/api/prompts", routes::prompts::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_requests,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Count every request, and every 4xx/5xx response as an error.
async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.incr_http_requests();
    let response = next.run(request).await;
    if response.status().is_client_error() || response.status().is_server_error() {
        state.metrics.incr_http_errors();
    }
    response
}

/// Health check endpoint; verifies the store is reachable.
async fn health_check(State(state): State<AppState>) -> Response {
    match state.store.stats().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({"status": "healthy", "database": "connected"})),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "unhealthy", "database": "error"})),
            )
                .into_response()
        }
    }
}

/// Prometheus text exposition of the process counters.
async fn export_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render_prometheus(),
    )
}
