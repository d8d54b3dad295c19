//! Search Routes - Nearest-neighbor text search

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use marquee::SearchQuery;

use super::error_response;
use crate::models::{SearchMatchResponse, SearchParams};
use crate::AppState;

/// Search embedded items by meaning
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matches ordered best first", body = Vec<SearchMatchResponse>),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 500, description = "Provider or store failure")
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchMatchResponse>>, (axum::http::StatusCode, String)> {
    let query = SearchQuery::parse(
        params.query.as_deref(),
        params.distance.as_deref(),
        params.threshold.as_deref(),
        params.limit.as_deref(),
    )
    .map_err(error_response)?;

    let matches = state
        .search_service
        .search(&query)
        .await
        .map_err(error_response)?;

    Ok(Json(matches.into_iter().map(SearchMatchResponse::from).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}
