//! Catalog Source Port
//!
//! Abstract interface for the bulk source feeding ingestion.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, RawRecord};

/// A row read from the source, or the reason it could not be decoded
pub type SourceRow = Result<RawRecord, DomainError>;

/// Service interface for reading raw catalog rows
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Read every row.
    ///
    /// The outer error means the source is unreadable as a whole
    /// (`DomainError::SourceRead`); a per-row error only rejects that row.
    async fn read_records(&self) -> Result<Vec<SourceRow>, DomainError>;
}
