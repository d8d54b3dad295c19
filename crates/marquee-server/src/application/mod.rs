//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod backfill_service;
mod ingest_service;
mod search_service;

pub use backfill_service::{BackfillConfig, BackfillService};
pub use ingest_service::IngestService;
pub use search_service::SearchService;
