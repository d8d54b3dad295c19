//! Marquee Domain Library
//!
//! Core domain types and interfaces for the Marquee film catalog:
//! ingestion, embedding backfill, and nearest-neighbor search.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (CatalogItem, WriteBatch, SearchQuery)
//!   - `value_objects/`: Immutable value types (DistanceMetric)
//!   - `services/`: Text synthesis, id derivation, linear-scan ranking
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Catalog store interface
//!   - `services/`: Embedding provider and bulk source interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use marquee::domain::{CatalogItem, WriteBatch};
//! use marquee::ports::{CatalogRepository, EmbeddingService};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CatalogItem, CatalogStats, DistanceMetric, DomainError, ItemAttributes, ItemMutation,
    RawRecord, ScoredItem, SearchQuery, VectorQuery, WriteBatch, MAX_BATCH_WRITES,
    MAX_SEARCH_LIMIT,
};
pub use ports::{CatalogRepository, CatalogSource, EmbeddingService, SourceRow};

#[cfg(any(test, feature = "mocks"))]
pub use ports::{MockCatalogRepository, MockCatalogSource, MockEmbeddingService};
