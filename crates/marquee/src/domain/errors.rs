//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    /// The bulk source could not be read at all (run-level abort)
    #[error("Source read error: {0}")]
    SourceRead(String),

    /// A batch commit failed; nothing from that batch was written
    #[error("Store write error: {0}")]
    StoreWrite(String),

    #[error("Repository error: {0}")]
    Repository(String),

    /// The embedding provider failed for one call
    #[error("Embedding provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    /// Whether the caller supplied bad input (as opposed to an infrastructure failure)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(DomainError::Validation("bad".into()).is_client_error());
        assert!(DomainError::not_found("CatalogItem", "abc").is_client_error());
        assert!(!DomainError::StoreWrite("boom".into()).is_client_error());
        assert!(!DomainError::Provider("timeout".into()).is_client_error());
    }

    #[test]
    fn test_not_found_message() {
        let err = DomainError::not_found("CatalogItem", "abc");
        assert_eq!(err.to_string(), "Entity not found: CatalogItem with id abc");
    }
}
