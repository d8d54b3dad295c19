//! Catalog request/response models

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use marquee::{CatalogStats, ScoredItem};

/// Raw search query parameters.
///
/// Kept as strings so every validation failure produces the same
/// client-error shape instead of an extractor rejection.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query (required)
    pub query: Option<String>,
    /// EUCLIDEAN, COSINE or DOT_PRODUCT (required)
    pub distance: Option<String>,
    /// Drop matches weaker than this score
    pub threshold: Option<String>,
    /// Maximum number of matches, 1..=1000 (required)
    pub limit: Option<String>,
}

/// One search match
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct SearchMatchResponse {
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
    pub summary: String,
    pub cast: Vec<String>,
    /// Distance (EUCLIDEAN, COSINE) or dot product (DOT_PRODUCT)
    pub vector_distance: f32,
}

impl From<ScoredItem> for SearchMatchResponse {
    fn from(item: ScoredItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            genres: item.genres,
            summary: item.summary,
            cast: item.cast,
            vector_distance: item.vector_distance,
        }
    }
}

/// Embedding progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct StatusResponse {
    pub total: u64,
    pub embedded: u64,
    pub pending: u64,
}

impl From<CatalogStats> for StatusResponse {
    fn from(stats: CatalogStats) -> Self {
        Self {
            total: stats.total,
            embedded: stats.embedded,
            pending: stats.pending(),
        }
    }
}
