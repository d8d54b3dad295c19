//! Search - Validated nearest-neighbor queries and their results

use serde::{Deserialize, Serialize};

use crate::domain::entities::CatalogItem;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::DistanceMetric;

/// Upper bound on `limit` for one search
pub const MAX_SEARCH_LIMIT: usize = 1000;

/// A validated search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Case-folded, trimmed query text
    pub text: String,
    pub metric: DistanceMetric,
    pub threshold: Option<f32>,
    pub limit: usize,
}

impl SearchQuery {
    /// Validate raw request parameters. Every rule is checked here so a bad
    /// request is refused before touching the store or the provider.
    pub fn parse(
        query: Option<&str>,
        distance: Option<&str>,
        threshold: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, DomainError> {
        let text = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| DomainError::Validation("query is required".to_string()))?;

        let metric = distance
            .ok_or_else(|| DomainError::Validation("distance is required".to_string()))?
            .parse::<DistanceMetric>()
            .map_err(DomainError::Validation)?;

        let threshold = match threshold.map(str::trim).filter(|t| !t.is_empty()) {
            None => None,
            Some(raw) => {
                let value = raw.parse::<f32>().map_err(|_| {
                    DomainError::Validation(format!("threshold must be a number, got {}", raw))
                })?;
                if !value.is_finite() {
                    return Err(DomainError::Validation(
                        "threshold must be finite".to_string(),
                    ));
                }
                Some(value)
            }
        };

        let raw_limit = limit
            .map(str::trim)
            .ok_or_else(|| DomainError::Validation("limit is required".to_string()))?;
        let limit = raw_limit.parse::<usize>().map_err(|_| {
            DomainError::Validation(format!("limit must be a positive integer, got {}", raw_limit))
        })?;
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(DomainError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }

        Ok(Self {
            text,
            metric,
            threshold,
            limit,
        })
    }
}

/// What the store needs to run a nearest-neighbor lookup
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub metric: DistanceMetric,
    pub threshold: Option<f32>,
    pub limit: usize,
}

/// Public projection of a matched item plus its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
    pub summary: String,
    pub cast: Vec<String>,
    pub vector_distance: f32,
}

impl ScoredItem {
    pub fn from_item(item: &CatalogItem, vector_distance: f32) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            genres: item.genres.clone(),
            summary: item.summary.clone(),
            cast: item.cast.clone(),
            vector_distance,
        }
    }
}

/// Embedding progress across the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: u64,
    pub embedded: u64,
}

impl CatalogStats {
    pub fn pending(&self) -> u64 {
        self.total.saturating_sub(self.embedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_folds_case_and_reads_fields() {
        let q = SearchQuery::parse(
            Some("  Space Adventure "),
            Some("cosine"),
            Some("0.5"),
            Some("5"),
        )
        .unwrap();

        assert_eq!(q.text, "space adventure");
        assert_eq!(q.metric, DistanceMetric::Cosine);
        assert_eq!(q.threshold, Some(0.5));
        assert_eq!(q.limit, 5);
    }

    #[test]
    fn test_threshold_is_optional() {
        let q = SearchQuery::parse(Some("x"), Some("EUCLIDEAN"), Some(""), Some("1")).unwrap();
        assert_eq!(q.threshold, None);
    }

    #[test]
    fn test_missing_or_invalid_fields_are_validation_errors() {
        let cases = [
            (None, Some("COSINE"), None, Some("5")),
            (Some("   "), Some("COSINE"), None, Some("5")),
            (Some("x"), None, None, Some("5")),
            (Some("x"), Some("HAMMING"), None, Some("5")),
            (Some("x"), Some("COSINE"), Some("abc"), Some("5")),
            (Some("x"), Some("COSINE"), Some("NaN"), Some("5")),
            (Some("x"), Some("COSINE"), None, None),
            (Some("x"), Some("COSINE"), None, Some("0")),
            (Some("x"), Some("COSINE"), None, Some("-3")),
            (Some("x"), Some("COSINE"), None, Some("1001")),
        ];

        for (query, distance, threshold, limit) in cases {
            let result = SearchQuery::parse(query, distance, threshold, limit);
            assert!(
                matches!(result, Err(DomainError::Validation(_))),
                "expected validation error for {:?}",
                (query, distance, threshold, limit)
            );
        }
    }

    #[test]
    fn test_pending_count() {
        let stats = CatalogStats {
            total: 10,
            embedded: 7,
        };
        assert_eq!(stats.pending(), 3);
    }
}
