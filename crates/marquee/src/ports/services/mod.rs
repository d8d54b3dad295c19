//! Service Ports
//!
//! Abstract interfaces for external services.

mod catalog_source;
mod embedding;

pub use catalog_source::*;
pub use embedding::*;
