//! Deterministic offline embedding provider
//!
//! Hashes the text into a unit vector. Identical text always maps to the
//! same vector, which keeps emulated backfill and search reproducible
//! without network access.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use marquee::{DomainError, EmbeddingService};

pub struct StubEmbedding {
    dimension: usize,
}

impl StubEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut values = Vec::with_capacity(self.dimension);
        let mut counter: u32 = 0;

        while values.len() < self.dimension {
            let digest = Sha256::new()
                .chain_update(counter.to_le_bytes())
                .chain_update(text.as_bytes())
                .finalize();
            for chunk in digest.chunks_exact(2) {
                if values.len() == self.dimension {
                    break;
                }
                let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
                // Map into [-1, 1]
                values.push(raw as f32 / u16::MAX as f32 * 2.0 - 1.0);
            }
            counter += 1;
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            values.iter_mut().for_each(|v| *v /= norm);
        }
        values
    }
}

#[async_trait]
impl EmbeddingService for StubEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.vector_for(text))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
