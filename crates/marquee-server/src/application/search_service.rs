//! Search Application Service (Use Case)
//!
//! Embeds query text and asks the store for the nearest embedded items.

use std::sync::Arc;

use marquee::{CatalogRepository, DomainError, EmbeddingService, ScoredItem, SearchQuery, VectorQuery};

/// Application service for nearest-neighbor search
pub struct SearchService<R: CatalogRepository + ?Sized> {
    repo: Arc<R>,
    embedder: Arc<dyn EmbeddingService>,
    expected_dimension: Option<usize>,
}

impl<R: CatalogRepository + ?Sized> SearchService<R> {
    pub fn new(
        repo: Arc<R>,
        embedder: Arc<dyn EmbeddingService>,
        expected_dimension: Option<usize>,
    ) -> Self {
        Self {
            repo,
            embedder,
            expected_dimension,
        }
    }

    /// Run a validated query. Zero matches is a normal, empty result.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ScoredItem>, DomainError> {
        tracing::info!(
            "Query \"{}\" using distance {} and threshold {:?} limited to {}",
            query.text,
            query.metric,
            query.threshold,
            query.limit
        );

        let vector = self.embedder.embed(&query.text).await?;
        if vector.is_empty() {
            return Err(DomainError::Provider(
                "Empty embedding returned for query".to_string(),
            ));
        }
        if let Some(expected) = self.expected_dimension {
            if vector.len() != expected {
                return Err(DomainError::Provider(format!(
                    "Query embedding has {} dimensions, expected {}",
                    vector.len(),
                    expected
                )));
            }
        }

        let matches = self
            .repo
            .find_nearest(&VectorQuery {
                vector,
                metric: query.metric,
                threshold: query.threshold,
                limit: query.limit,
            })
            .await?;

        tracing::info!("Found {} matches", matches.len());
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee::{CatalogItem, DistanceMetric, ItemAttributes, MockEmbeddingService};

    use crate::adapters::embedding::StubEmbedding;
    use crate::adapters::InMemoryCatalogRepository;

    fn embedded(id: &str, vector: Vec<f32>) -> CatalogItem {
        CatalogItem::new(ItemAttributes {
            id: id.to_string(),
            title: format!("Film {}", id),
            genres: vec![],
            summary: String::new(),
            cast: vec![],
        })
        .with_embedding(vector)
        .unwrap()
    }

    fn query(text: &str, metric: DistanceMetric, threshold: Option<f32>, limit: usize) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            metric,
            threshold,
            limit,
        }
    }

    /// Ten items embedded by the stub, plus two still pending
    async fn stub_catalog() -> (Arc<InMemoryCatalogRepository>, Arc<dyn EmbeddingService>) {
        let stub = StubEmbedding::new(16);
        let mut items = Vec::new();
        for i in 0..10 {
            let text = format!("film number {}", i);
            let vector = stub.embed(&text).await.unwrap();
            items.push(embedded(&format!("{:02}", i), vector));
        }
        items.push(CatalogItem::new(ItemAttributes {
            id: "pending-1".to_string(),
            title: "Pending".to_string(),
            genres: vec![],
            summary: String::new(),
            cast: vec![],
        }));

        (
            Arc::new(InMemoryCatalogRepository::with_items(items)),
            Arc::new(stub),
        )
    }

    #[tokio::test]
    async fn test_cosine_limit_five_is_sorted() {
        let (repo, embedder) = stub_catalog().await;
        let service = SearchService::new(repo, embedder, None);

        let results = service
            .search(&query("space adventure", DistanceMetric::Cosine, None, 5))
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
        assert!(results
            .windows(2)
            .all(|w| w[0].vector_distance <= w[1].vector_distance));
        assert!(results.iter().all(|r| r.id != "pending-1"));
    }

    #[tokio::test]
    async fn test_repeated_queries_are_deterministic() {
        let (repo, embedder) = stub_catalog().await;
        let service = SearchService::new(repo, embedder, None);
        let q = query("heist thriller", DistanceMetric::Euclidean, None, 10);

        let first = service.search(&q).await.unwrap();
        let second = service.search(&q).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_threshold_is_respected_for_every_metric() {
        let (repo, embedder) = stub_catalog().await;
        let service = SearchService::new(repo, embedder, None);

        for (metric, threshold) in [
            (DistanceMetric::Euclidean, 1.2),
            (DistanceMetric::Cosine, 0.8),
            (DistanceMetric::DotProduct, 0.1),
        ] {
            let results = service
                .search(&query("space adventure", metric, Some(threshold), 10))
                .await
                .unwrap();
            assert!(results
                .iter()
                .all(|r| metric.within_threshold(r.vector_distance, threshold)));
        }
    }

    #[tokio::test]
    async fn test_no_matches_is_ok() {
        let repo = Arc::new(InMemoryCatalogRepository::new());
        let service = SearchService::new(repo, Arc::new(StubEmbedding::new(8)), None);

        let results = service
            .search(&query("anything", DistanceMetric::Cosine, None, 5))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_is_an_error() {
        let mut embedder = MockEmbeddingService::new();
        embedder
            .expect_embed()
            .returning(|_| Err(DomainError::Provider("quota exceeded".to_string())));

        let repo = Arc::new(InMemoryCatalogRepository::with_items(vec![embedded("1", vec![1.0])]));
        let service = SearchService::new(repo, Arc::new(embedder), None);

        assert!(matches!(
            service.search(&query("x", DistanceMetric::Cosine, None, 5)).await,
            Err(DomainError::Provider(_))
        ));
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_is_an_error() {
        let repo = Arc::new(InMemoryCatalogRepository::new());
        let service = SearchService::new(repo, Arc::new(StubEmbedding::new(8)), Some(768));

        assert!(service
            .search(&query("x", DistanceMetric::Cosine, None, 5))
            .await
            .is_err());
    }
}
