//! Prompt management routes

use crate::{AppState, error::Result, models::PaginationQuery};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use prompt_registry::{CreatePromptInput, CreateVersionInput};
use tracing::info;

/// Create prompt routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_prompts).post(create_prompt))
        .route("/{slug}", get(get_prompt))
        .route("/{slug}/versions", get(list_versions).post(create_version))
        .route("/{slug}/versions/{version}", get(get_version))
}

/// Create a new prompt with its first version
async fn create_prompt(
    State(state): State<AppState>,
    Json(input): Json<CreatePromptInput>,
) -> Result<impl IntoResponse> {
    info!(title = %input.title, "creating prompt");

    let created = state.store.create_prompt(input).await?;

    state.metrics.incr_prompts_created();
    state.metrics.incr_versions_created();
    Ok((StatusCode::CREATED, Json(created)))
}

/// List prompts, most recently created first
async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let prompts = state.store.list_prompts(query.limit, query.offset).await?;
    Ok(Json(prompts))
}

/// Get a prompt with its current version
async fn get_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let prompt = state.store.get_prompt(&slug).await?;
    Ok(Json(prompt))
}

/// List all versions of a prompt
async fn list_versions(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let versions = state.store.list_versions(&slug).await?;
    Ok(Json(versions))
}

/// Append a new version to an existing prompt
async fn create_version(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<CreateVersionInput>,
) -> Result<impl IntoResponse> {
    info!(slug = %slug, "creating version");

    let updated = state.store.create_version(&slug, input).await?;

    state.metrics.incr_versions_created();
    Ok((StatusCode::CREATED, Json(updated)))
}

/// Get one specific version of a prompt
async fn get_version(
    State(state): State<AppState>,
    Path((slug, version)): Path<(String, i64)>,
) -> Result<impl IntoResponse> {
    let found = state.store.get_version(&slug, version).await?;
    Ok(Json(found))
}
