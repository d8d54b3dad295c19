//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - CatalogItem: a stored film with optional embedding
//! - WriteBatch: mutations committed atomically
//! - SearchQuery / ScoredItem: nearest-neighbor request and result

mod catalog_item;
mod search;
mod write_batch;

pub use catalog_item::*;
pub use search::*;
pub use write_batch::*;
