//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod catalog_repository;

pub use catalog_repository::*;
