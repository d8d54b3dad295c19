//! Domain Services
//!
//! Stateless logic shared by the application layer and store adapters.

mod nearest;
mod text;

pub use nearest::nearest;
pub use text::{derive_item_id, embedding_text, split_multi_value};
