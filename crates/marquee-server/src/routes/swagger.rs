//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{SearchMatchResponse, StatusResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Catalog endpoints
        super::import::import_catalog,
        super::import::import_catalog_get,
        super::backfill::recompute,
        super::backfill::recompute_get,
        super::backfill::backfill,
        super::backfill::backfill_get,
        super::backfill::recompute_item,
        super::status::status,
        // Search endpoints
        super::search::search,
    ),
    components(schemas(SearchMatchResponse, StatusResponse)),
    tags(
        (name = "Catalog", description = "Import and embedding backfill"),
        (name = "Search", description = "Nearest-neighbor search")
    ),
    info(
        title = "Marquee API",
        description = "Film catalog with embedding backfill and vector search"
    )
)]
pub struct ApiDoc;
