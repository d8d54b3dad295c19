//! PostgreSQL Repository Implementations

mod catalog_repository;

pub use catalog_repository::PgCatalogRepository;
