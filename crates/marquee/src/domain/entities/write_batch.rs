//! WriteBatch - A bounded group of mutations committed atomically

use crate::domain::entities::ItemAttributes;
use crate::domain::errors::DomainError;

/// Largest number of mutations a single atomic commit may carry
pub const MAX_BATCH_WRITES: usize = 500;

/// One document mutation
#[derive(Debug, Clone, PartialEq)]
pub enum ItemMutation {
    /// Insert the item, or merge attributes into an existing one.
    /// Never touches `embedding` / `embedded`.
    Upsert(ItemAttributes),
    /// Store a computed embedding and mark the item embedded.
    /// Applies only to items that already exist.
    SetEmbedding { id: String, embedding: Vec<f32> },
}

impl ItemMutation {
    pub fn id(&self) -> &str {
        match self {
            ItemMutation::Upsert(attributes) => &attributes.id,
            ItemMutation::SetEmbedding { id, .. } => id,
        }
    }
}

/// Ordered mutations committed all-or-nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    mutations: Vec<ItemMutation>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an upsert. A second upsert of the same id replaces the first
    /// in place so one batch never writes a document twice.
    pub fn upsert(&mut self, attributes: ItemAttributes) -> Result<(), DomainError> {
        if let Some(existing) = self.mutations.iter_mut().find(|m| {
            matches!(m, ItemMutation::Upsert(a) if a.id == attributes.id)
        }) {
            *existing = ItemMutation::Upsert(attributes);
            return Ok(());
        }
        self.push(ItemMutation::Upsert(attributes))
    }

    /// Stage an embedding update. Empty vectors are refused.
    pub fn set_embedding(&mut self, id: String, embedding: Vec<f32>) -> Result<(), DomainError> {
        if embedding.is_empty() {
            return Err(DomainError::Validation(format!(
                "Refusing to store empty embedding for {}",
                id
            )));
        }
        self.push(ItemMutation::SetEmbedding { id, embedding })
    }

    fn push(&mut self, mutation: ItemMutation) -> Result<(), DomainError> {
        if self.mutations.len() >= MAX_BATCH_WRITES {
            return Err(DomainError::Validation(format!(
                "Batch is full ({} writes)",
                MAX_BATCH_WRITES
            )));
        }
        self.mutations.push(mutation);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn mutations(&self) -> &[ItemMutation] {
        &self.mutations
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.mutations.iter().map(ItemMutation::id)
    }
}
