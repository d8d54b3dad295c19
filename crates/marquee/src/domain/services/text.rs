//! Text helpers shared by ingestion and backfill

use sha2::{Digest, Sha256};

use crate::domain::entities::CatalogItem;

/// Split a delimited column into trimmed, non-empty values
pub fn split_multi_value(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stable id for an item without a carried-through id: hex SHA-256 of the trimmed title
pub fn derive_item_id(title: &str) -> String {
    let digest = Sha256::digest(title.trim().as_bytes());
    hex::encode(digest)
}

/// Text fed to the embedding provider for an item.
///
/// Field order is fixed: title, genres, summary, cast.
pub fn embedding_text(item: &CatalogItem) -> String {
    [
        item.title.as_str(),
        &item.genres.join(" "),
        item.summary.as_str(),
        &item.cast.join(" "),
    ]
    .join(" ")
}
