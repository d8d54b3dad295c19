//! In-memory implementation of CatalogRepository
//!
//! Backs emulated runs and tests. Has no vector index, so nearest-neighbor
//! lookups fall back to `marquee::domain::services::nearest`.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use marquee::domain::services::nearest;
use marquee::{
    CatalogItem, CatalogRepository, CatalogStats, DomainError, ItemMutation, ScoredItem,
    VectorQuery, WriteBatch,
};

/// Catalog held in a sorted map keyed by id
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    items: RwLock<BTreeMap<String, CatalogItem>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing items (tests, fixtures)
    pub fn with_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().map(|i| (i.id.clone(), i)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Every stored item, ordered by id
    pub async fn snapshot(&self) -> Vec<CatalogItem> {
        self.items.read().await.values().cloned().collect()
    }
}

/// Apply one mutation to a working copy. Returns whether a document was written.
fn apply(items: &mut BTreeMap<String, CatalogItem>, mutation: &ItemMutation) -> Result<bool, DomainError> {
    match mutation {
        ItemMutation::Upsert(attributes) => {
            match items.get_mut(&attributes.id) {
                Some(existing) => existing.merge(attributes.clone()),
                None => {
                    items.insert(attributes.id.clone(), CatalogItem::new(attributes.clone()));
                }
            }
            Ok(true)
        }
        ItemMutation::SetEmbedding { id, embedding } => {
            let Some(existing) = items.get_mut(id) else {
                return Ok(false);
            };
            let updated = existing.clone().with_embedding(embedding.clone())?;
            *existing = updated;
            Ok(true)
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn get(&self, id: &str) -> Result<Option<CatalogItem>, DomainError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn find_unembedded(&self, limit: usize) -> Result<Vec<CatalogItem>, DomainError> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|item| !item.embedded)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn commit(&self, batch: &WriteBatch) -> Result<usize, DomainError> {
        let mut guard = self.items.write().await;

        // Work on a copy so a failing mutation leaves the store untouched
        let mut working = guard.clone();
        let mut written = 0;
        for mutation in batch.mutations() {
            if apply(&mut working, mutation)
                .map_err(|e| DomainError::StoreWrite(e.to_string()))?
            {
                written += 1;
            }
        }

        *guard = working;
        Ok(written)
    }

    async fn find_nearest(&self, query: &VectorQuery) -> Result<Vec<ScoredItem>, DomainError> {
        let items = self.items.read().await;
        Ok(nearest(items.values(), query))
    }

    async fn stats(&self) -> Result<CatalogStats, DomainError> {
        let items = self.items.read().await;
        Ok(CatalogStats {
            total: items.len() as u64,
            embedded: items.values().filter(|i| i.embedded).count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee::{DistanceMetric, ItemAttributes};

    fn attrs(id: &str) -> ItemAttributes {
        ItemAttributes {
            id: id.to_string(),
            title: format!("Title {}", id),
            genres: vec!["drama".to_string()],
            summary: "summary".to_string(),
            cast: vec![],
        }
    }

    #[tokio::test]
    async fn test_upsert_merges_without_clearing_embedding() {
        let repo = InMemoryCatalogRepository::new();

        let mut batch = WriteBatch::new();
        batch.upsert(attrs("1")).unwrap();
        assert_eq!(repo.commit(&batch).await.unwrap(), 1);

        let mut embed = WriteBatch::new();
        embed.set_embedding("1".to_string(), vec![0.5, 0.5]).unwrap();
        assert_eq!(repo.commit(&embed).await.unwrap(), 1);

        let mut reimport = WriteBatch::new();
        reimport
            .upsert(ItemAttributes {
                summary: "updated".to_string(),
                ..attrs("1")
            })
            .unwrap();
        repo.commit(&reimport).await.unwrap();

        let item = repo.get("1").await.unwrap().unwrap();
        assert_eq!(item.summary, "updated");
        assert!(item.embedded);
        assert_eq!(item.embedding, Some(vec![0.5, 0.5]));
    }

    #[tokio::test]
    async fn test_failing_mutation_discards_whole_batch() {
        let repo = InMemoryCatalogRepository::with_items(vec![CatalogItem::new(attrs("b"))]);

        let mut batch = WriteBatch::new();
        batch.upsert(attrs("a")).unwrap();
        batch
            .upsert(ItemAttributes {
                summary: "changed".to_string(),
                ..attrs("b")
            })
            .unwrap();
        // Accepted by the batch, refused by the store when applied
        batch
            .set_embedding("b".to_string(), vec![f32::NAN, 1.0])
            .unwrap();

        assert!(matches!(
            repo.commit(&batch).await,
            Err(DomainError::StoreWrite(_))
        ));

        let items = repo.snapshot().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "b");
        assert_eq!(items[0].summary, "summary");
        assert!(!items[0].embedded);
    }

    #[tokio::test]
    async fn test_set_embedding_on_missing_item_writes_nothing() {
        let repo = InMemoryCatalogRepository::new();
        let mut batch = WriteBatch::new();
        batch.set_embedding("ghost".to_string(), vec![1.0]).unwrap();

        assert_eq!(repo.commit(&batch).await.unwrap(), 0);
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_find_unembedded_is_bounded_and_ordered() {
        let repo = InMemoryCatalogRepository::with_items(vec![
            CatalogItem::new(attrs("c")),
            CatalogItem::new(attrs("a")),
            CatalogItem::new(attrs("b")).with_embedding(vec![1.0]).unwrap(),
        ]);

        let page = repo.find_unembedded(1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "a");

        let all = repo.find_unembedded(10).await.unwrap();
        assert_eq!(all.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.embedded, 1);
    }

    #[tokio::test]
    async fn test_find_nearest_uses_linear_scan() {
        let repo = InMemoryCatalogRepository::with_items(vec![
            CatalogItem::new(attrs("x")).with_embedding(vec![1.0, 0.0]).unwrap(),
            CatalogItem::new(attrs("y")).with_embedding(vec![0.0, 1.0]).unwrap(),
            CatalogItem::new(attrs("z")),
        ]);

        let results = repo
            .find_nearest(&VectorQuery {
                vector: vec![1.0, 0.1],
                metric: DistanceMetric::Cosine,
                threshold: None,
                limit: 5,
            })
            .await
            .unwrap();

        assert_eq!(results.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
