//! Marquee API Models
//!
//! - Search: query parameters and ranked matches
//! - Status: embedding progress

mod catalog;

pub use catalog::*;
