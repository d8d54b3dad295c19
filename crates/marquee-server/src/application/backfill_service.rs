//! Backfill Application Service (Use Case)
//!
//! Computes embeddings for items that lack one, a bounded page per call.
//! Callers re-invoke until no pending items remain.

use std::sync::Arc;
use std::time::{Duration, Instant};

use marquee::domain::services::embedding_text;
use marquee::{
    CatalogItem, CatalogRepository, CatalogStats, DomainError, EmbeddingService, WriteBatch,
    MAX_BATCH_WRITES,
};

use crate::config::AppConfig;

/// Limits applied to one backfill invocation
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub page_limit: usize,
    /// Reject provider vectors of any other length
    pub expected_dimension: Option<usize>,
    pub invocation_budget: Duration,
    pub provider_timeout: Duration,
}

impl From<&AppConfig> for BackfillConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_limit: config.page_limit,
            expected_dimension: config.embedding_dimension,
            invocation_budget: config.invocation_budget,
            provider_timeout: config.provider_timeout,
        }
    }
}

/// Application service for embedding backfill
pub struct BackfillService<R: CatalogRepository + ?Sized> {
    repo: Arc<R>,
    embedder: Arc<dyn EmbeddingService>,
    config: BackfillConfig,
}

impl<R: CatalogRepository + ?Sized> BackfillService<R> {
    pub fn new(
        repo: Arc<R>,
        embedder: Arc<dyn EmbeddingService>,
        mut config: BackfillConfig,
    ) -> Self {
        config.page_limit = config.page_limit.clamp(1, MAX_BATCH_WRITES);
        Self {
            repo,
            embedder,
            config,
        }
    }

    /// Backfill one page using the configured page limit
    pub async fn backfill(&self) -> Result<usize, DomainError> {
        self.backfill_page(self.config.page_limit).await
    }

    /// Embed up to `page_limit` pending items and commit them atomically.
    ///
    /// Returns the number of documents written. Items whose embedding
    /// fails stay pending for a later invocation. A page never exceeds
    /// what one commit can carry.
    pub async fn backfill_page(&self, page_limit: usize) -> Result<usize, DomainError> {
        let started = Instant::now();
        let page_limit = page_limit.clamp(1, MAX_BATCH_WRITES);
        let page = self.repo.find_unembedded(page_limit).await?;

        if page.is_empty() {
            tracing::info!("No items pending embedding");
            return Ok(0);
        }

        let mut batch = WriteBatch::new();
        let mut failed = 0;

        for item in &page {
            let remaining = self.config.invocation_budget.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                tracing::warn!(
                    "Invocation budget exhausted after {} of {} items; committing what is staged",
                    batch.len() + failed,
                    page.len()
                );
                break;
            }

            match self.compute_embedding(item, remaining).await {
                Ok(embedding) => batch.set_embedding(item.id.clone(), embedding)?,
                Err(e) => {
                    tracing::warn!("Error calculating embedding for {}: {}", item.id, e);
                    failed += 1;
                }
            }
        }

        if batch.is_empty() {
            tracing::info!("Updated 0 items ({} failed)", failed);
            return Ok(0);
        }

        let written = self.repo.commit(&batch).await?;
        tracing::info!("Updated {} items ({} failed)", written, failed);

        Ok(written)
    }

    /// Embed a single item on demand, through the same path as `backfill`.
    ///
    /// Returns `false` when the item already has an embedding.
    pub async fn embed_item(&self, id: &str) -> Result<bool, DomainError> {
        let item = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("CatalogItem", id))?;

        if item.embedded {
            tracing::info!("Item {} already embedded", id);
            return Ok(false);
        }

        let embedding = self
            .compute_embedding(&item, self.config.invocation_budget)
            .await?;

        let mut batch = WriteBatch::new();
        batch.set_embedding(item.id.clone(), embedding)?;
        let written = self.repo.commit(&batch).await?;

        Ok(written > 0)
    }

    /// Embedding progress across the catalog
    pub async fn progress(&self) -> Result<CatalogStats, DomainError> {
        self.repo.stats().await
    }

    async fn compute_embedding(
        &self,
        item: &CatalogItem,
        budget: Duration,
    ) -> Result<Vec<f32>, DomainError> {
        let text = embedding_text(item);
        tracing::debug!("Calculating embedding for \"{}\" with: \"{}\"", item.id, text);

        let timeout = self.config.provider_timeout.min(budget);
        let embedding = tokio::time::timeout(timeout, self.embedder.embed(&text))
            .await
            .map_err(|_| {
                DomainError::Provider(format!("{} timed out after {:?}", self.embedder.name(), timeout))
            })??;

        if embedding.is_empty() {
            return Err(DomainError::Provider("Empty embedding returned".to_string()));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::Provider(
                "Embedding contains non-finite values".to_string(),
            ));
        }
        if let Some(expected) = self.config.expected_dimension {
            if embedding.len() != expected {
                return Err(DomainError::Provider(format!(
                    "Embedding has {} dimensions, expected {}",
                    embedding.len(),
                    expected
                )));
            }
        }

        tracing::debug!("Calculated embedding of length {}", embedding.len());
        Ok(embedding)
    }
}
