//! Import Routes - Bulk load the catalog source

use axum::{extract::State, routing::get, Router};

use super::error_response;
use crate::AppState;

/// Import the configured catalog source
#[utoipa::path(
    post,
    path = "/import",
    responses(
        (status = 200, description = "Count of items written", body = String, content_type = "text/plain"),
        (status = 500, description = "Source unreadable or store failure")
    ),
    tag = "Catalog"
)]
pub async fn import_catalog(
    State(state): State<AppState>,
) -> Result<String, (axum::http::StatusCode, String)> {
    let report = state
        .ingest_service
        .ingest()
        .await
        .map_err(error_response)?;

    Ok(format!("Imported {} items", report.written))
}

/// Import the configured catalog source (GET form)
#[utoipa::path(
    get,
    path = "/import",
    responses(
        (status = 200, description = "Count of items written", body = String, content_type = "text/plain"),
        (status = 500, description = "Source unreadable or store failure")
    ),
    tag = "Catalog"
)]
pub async fn import_catalog_get(
    state: State<AppState>,
) -> Result<String, (axum::http::StatusCode, String)> {
    import_catalog(state).await
}

pub fn router() -> Router<AppState> {
    Router::new().route("/import", get(import_catalog_get).post(import_catalog))
}
