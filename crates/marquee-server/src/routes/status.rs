//! Status Routes - Embedding progress

use axum::{extract::State, routing::get, Json, Router};

use super::error_response;
use crate::models::StatusResponse;
use crate::AppState;

/// Count items by embedding state
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Catalog progress", body = StatusResponse),
        (status = 500, description = "Store failure")
    ),
    tag = "Catalog"
)]
pub async fn status(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, (axum::http::StatusCode, String)> {
    let stats = state
        .backfill_service
        .progress()
        .await
        .map_err(error_response)?;

    Ok(Json(stats.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(status))
}
