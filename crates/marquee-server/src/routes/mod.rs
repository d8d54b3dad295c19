//! Marquee API Routes
//!
//! - /import - Load the catalog source into the store
//! - /recompute, /backfill - Embed one page of pending items
//! - /recompute/:id - Embed a single item
//! - /search - Nearest-neighbor search
//! - /status - Embedding progress

pub mod backfill;
pub mod import;
pub mod search;
pub mod status;
pub mod swagger;

use axum::http::StatusCode;
use marquee::DomainError;

/// Map a domain error to an HTTP response.
///
/// Client errors carry their message; everything else is logged and
/// answered with an opaque body.
pub fn error_response(err: DomainError) -> (StatusCode, String) {
    match err {
        DomainError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        err @ DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        err => {
            tracing::error!("Request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::io::Write;
    use std::sync::Arc;
    use tower::ServiceExt;

    use marquee::CatalogRepository;

    use crate::adapters::embedding::StubEmbedding;
    use crate::adapters::{CsvCatalogSource, InMemoryCatalogRepository};
    use crate::application::{BackfillConfig, BackfillService, IngestService, SearchService};
    use crate::{build_router, AppState};

    const CATALOG: &str = "\
title,genre,summary,cast
Night Train,\"thriller, mystery\",A detective boards a train,\"Ann Lee, Bo Park\"
Sunny Fields,comedy,Two friends open a farm,Cy Moss
,drama,No title here,Nobody
";

    fn test_state(csv: &tempfile::NamedTempFile) -> (AppState, Arc<InMemoryCatalogRepository>) {
        let repo = Arc::new(InMemoryCatalogRepository::new());
        let dyn_repo: Arc<dyn CatalogRepository> = repo.clone();
        let embedder = Arc::new(StubEmbedding::new(16));
        let source = Arc::new(CsvCatalogSource::new(csv.path()));

        let state = AppState::new(
            IngestService::new(dyn_repo.clone(), source, 500),
            BackfillService::new(
                dyn_repo.clone(),
                embedder.clone(),
                BackfillConfig {
                    page_limit: 3,
                    expected_dimension: Some(16),
                    invocation_budget: std::time::Duration::from_secs(30),
                    provider_timeout: std::time::Duration::from_secs(5),
                },
            ),
            SearchService::new(dyn_repo, embedder, Some(16)),
        );
        (state, repo)
    }

    fn catalog_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        file
    }

    async fn send(state: AppState, method: &str, uri: &str) -> (StatusCode, String) {
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_error_response_mapping() {
        let (status, body) = error_response(DomainError::Validation("bad limit".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "bad limit");

        let (status, _) = error_response(DomainError::not_found("CatalogItem", "abc"));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = error_response(DomainError::StoreWrite("disk full".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("disk full"));
    }

    #[test]
    fn test_openapi_documents_get_and_post_forms() {
        use utoipa::OpenApi;

        let doc = serde_json::to_value(swagger::ApiDoc::openapi()).unwrap();
        for path in ["/import", "/recompute", "/backfill"] {
            assert!(doc["paths"][path]["get"].is_object(), "GET {}", path);
            assert!(doc["paths"][path]["post"].is_object(), "POST {}", path);
        }
    }

    #[tokio::test]
    async fn test_import_reports_written_count() {
        let csv = catalog_file();
        let (state, repo) = test_state(&csv);

        let (status, body) = send(state.clone(), "POST", "/import").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Imported 2 items");
        assert_eq!(repo.len().await, 2);

        // GET is accepted too and stays idempotent
        let (status, body) = send(state, "GET", "/import").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Imported 2 items");
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_recompute_then_status() {
        let csv = catalog_file();
        let (state, _repo) = test_state(&csv);

        send(state.clone(), "POST", "/import").await;

        let (status, body) = send(state.clone(), "GET", "/status").await;
        assert_eq!(status, StatusCode::OK);
        let stats: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(stats["pending"], 2);

        let (_, body) = send(state.clone(), "POST", "/recompute").await;
        assert_eq!(body, "Updated 2 items");

        let (_, body) = send(state.clone(), "GET", "/backfill").await;
        assert_eq!(body, "Updated 0 items");

        let (_, body) = send(state, "GET", "/status").await;
        let stats: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["embedded"], 2);
        assert_eq!(stats["pending"], 0);
    }

    #[tokio::test]
    async fn test_recompute_unknown_item_is_not_found() {
        let csv = catalog_file();
        let (state, _repo) = test_state(&csv);

        let (status, _) = send(state, "POST", "/recompute/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_returns_json_matches() {
        let csv = catalog_file();
        let (state, _repo) = test_state(&csv);

        send(state.clone(), "POST", "/import").await;
        send(state.clone(), "POST", "/recompute").await;

        let (status, body) = send(
            state,
            "GET",
            "/search?query=Night%20Train&distance=COSINE&limit=5",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let matches: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0]["vector_distance"].as_f64().unwrap() <= matches[1]["vector_distance"].as_f64().unwrap());
        assert!(matches[0]["title"].is_string());
        assert!(matches[0].get("embedding").is_none());
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_parameters() {
        let csv = catalog_file();
        let (state, _repo) = test_state(&csv);

        let (status, _) = send(state.clone(), "GET", "/search?distance=COSINE&limit=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(state.clone(), "GET", "/search?query=x&distance=MANHATTAN&limit=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(state, "GET", "/search?query=x&distance=COSINE&limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
