//! Value Objects
//!
//! Immutable value types used across the domain.

mod distance_metric;

pub use distance_metric::*;
