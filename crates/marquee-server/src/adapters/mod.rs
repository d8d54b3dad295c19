//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod csv_source;
pub mod embedding;
pub mod memory;
pub mod postgres;

// Re-exports
pub use csv_source::CsvCatalogSource;
pub use memory::InMemoryCatalogRepository;
pub use postgres::PgCatalogRepository;
