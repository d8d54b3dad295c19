//! CatalogItem - A film in the catalog
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::services::{derive_item_id, split_multi_value};

/// CatalogItem - One stored document, with optional embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable identifier (carried from the source or hashed from the title)
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub cast: Vec<String>,
    /// Embedding vector, present only once backfill succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// True iff `embedding` is present and non-empty
    #[serde(default)]
    pub embedded: bool,
}

impl CatalogItem {
    /// A freshly ingested item, not yet embedded
    pub fn new(attributes: ItemAttributes) -> Self {
        Self {
            id: attributes.id,
            title: attributes.title,
            genres: attributes.genres,
            summary: attributes.summary,
            cast: attributes.cast,
            embedding: None,
            embedded: false,
        }
    }

    /// Attach an embedding, flipping `embedded` on.
    ///
    /// Vectors must be non-empty and finite; stores cannot index NaN or inf.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Result<Self, DomainError> {
        if embedding.is_empty() {
            return Err(DomainError::Validation(format!(
                "Empty embedding for item {}",
                self.id
            )));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::Validation(format!(
                "Non-finite embedding for item {}",
                self.id
            )));
        }
        self.embedding = Some(embedding);
        self.embedded = true;
        Ok(self)
    }

    /// Apply ingested attributes without touching embedding state
    pub fn merge(&mut self, attributes: ItemAttributes) {
        self.title = attributes.title;
        self.genres = attributes.genres;
        self.summary = attributes.summary;
        self.cast = attributes.cast;
    }
}

/// The public attributes written by ingestion.
///
/// Carries no embedding fields, so persisting it can only ever merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
    pub summary: String,
    pub cast: Vec<String>,
}

/// One row as produced by a bulk source, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "genres")]
    pub genre: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
}

impl TryFrom<RawRecord> for ItemAttributes {
    type Error = DomainError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        let title = record
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::Validation("Missing required column: title".to_string()))?;

        let id = record
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| derive_item_id(&title));

        Ok(Self {
            id,
            title,
            genres: split_multi_value(record.genre.as_deref().unwrap_or_default()),
            summary: record.summary.unwrap_or_default().trim().to_string(),
            cast: split_multi_value(record.cast.as_deref().unwrap_or_default()),
        })
    }
}
