//! Backfill Routes - Compute missing embeddings
//!
//! Each call handles one bounded page; callers repeat until the
//! reported count drops to zero.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};

use super::error_response;
use crate::AppState;

/// Embed one page of pending items
#[utoipa::path(
    post,
    path = "/recompute",
    responses(
        (status = 200, description = "Count of items updated", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure")
    ),
    tag = "Catalog"
)]
pub async fn recompute(
    State(state): State<AppState>,
) -> Result<String, (axum::http::StatusCode, String)> {
    let updated = state
        .backfill_service
        .backfill()
        .await
        .map_err(error_response)?;

    Ok(format!("Updated {} items", updated))
}

/// Embed one page of pending items (GET form)
#[utoipa::path(
    get,
    path = "/recompute",
    responses(
        (status = 200, description = "Count of items updated", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure")
    ),
    tag = "Catalog"
)]
pub async fn recompute_get(
    state: State<AppState>,
) -> Result<String, (axum::http::StatusCode, String)> {
    recompute(state).await
}

/// Same as `/recompute`
#[utoipa::path(
    post,
    path = "/backfill",
    responses(
        (status = 200, description = "Count of items updated", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure")
    ),
    tag = "Catalog"
)]
pub async fn backfill(
    state: State<AppState>,
) -> Result<String, (axum::http::StatusCode, String)> {
    recompute(state).await
}

/// Same as `/recompute` (GET form)
#[utoipa::path(
    get,
    path = "/backfill",
    responses(
        (status = 200, description = "Count of items updated", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure")
    ),
    tag = "Catalog"
)]
pub async fn backfill_get(
    state: State<AppState>,
) -> Result<String, (axum::http::StatusCode, String)> {
    recompute(state).await
}

/// Embed one specific item
#[utoipa::path(
    post,
    path = "/recompute/{id}",
    params(("id" = String, Path, description = "Catalog item id")),
    responses(
        (status = 200, description = "1 if the item was embedded, 0 if it already was", body = String, content_type = "text/plain"),
        (status = 404, description = "Item not found"),
        (status = 500, description = "Provider or store failure")
    ),
    tag = "Catalog"
)]
pub async fn recompute_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<String, (axum::http::StatusCode, String)> {
    let updated = state
        .backfill_service
        .embed_item(&id)
        .await
        .map_err(error_response)?;

    Ok(format!("Updated {} items", usize::from(updated)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recompute", get(recompute_get).post(recompute))
        .route("/backfill", get(backfill_get).post(backfill))
        .route("/recompute/:id", post(recompute_item))
}
