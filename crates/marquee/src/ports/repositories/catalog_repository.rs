//! Catalog Repository Port
//!
//! Abstract interface for the document store holding catalog items.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, CatalogItem, CatalogStats, ScoredItem, VectorQuery, WriteBatch};

/// Repository interface for the catalog collection
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Find an item by id
    async fn get(&self, id: &str) -> Result<Option<CatalogItem>, DomainError>;

    /// Up to `limit` items that have no embedding yet, ordered by id
    async fn find_unembedded(&self, limit: usize) -> Result<Vec<CatalogItem>, DomainError>;

    /// Apply every mutation in `batch` atomically.
    ///
    /// Returns the number of documents actually written. On error nothing
    /// from the batch is persisted.
    async fn commit(&self, batch: &WriteBatch) -> Result<usize, DomainError>;

    /// Embedded items closest to `query.vector`, best first
    async fn find_nearest(&self, query: &VectorQuery) -> Result<Vec<ScoredItem>, DomainError>;

    /// Item counts by embedding state
    async fn stats(&self) -> Result<CatalogStats, DomainError>;
}
