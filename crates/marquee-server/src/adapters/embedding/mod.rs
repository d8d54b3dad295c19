//! Embedding Provider Implementations

mod openai;
mod stub;
mod vertex;

pub use openai::OpenAiEmbedding;
pub use stub::StubEmbedding;
pub use vertex::VertexAiEmbedding;

use std::sync::Arc;

use marquee::{DomainError, EmbeddingService};

use crate::config::{AppConfig, ProviderKind, STUB_DIMENSION};

/// Build the provider selected by configuration
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn EmbeddingService>, DomainError> {
    let provider: Arc<dyn EmbeddingService> = match config.provider {
        ProviderKind::Stub => Arc::new(StubEmbedding::new(
            config.embedding_dimension.unwrap_or(STUB_DIMENSION),
        )),
        ProviderKind::OpenAi => {
            let key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| DomainError::Config("OPENAI_API_KEY not set".to_string()))?;
            Arc::new(OpenAiEmbedding::new(key, config.provider_timeout)?)
        }
        ProviderKind::Vertex => {
            let settings = config
                .vertex
                .clone()
                .ok_or_else(|| DomainError::Config("Vertex AI settings not set".to_string()))?;
            Arc::new(VertexAiEmbedding::new(settings, config.provider_timeout)?)
        }
    };

    tracing::info!("🧬 Embedding provider initialized: {}", provider.name());
    Ok(provider)
}
