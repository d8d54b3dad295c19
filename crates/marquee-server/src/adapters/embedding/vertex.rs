//! Vertex AI embedding provider
//!
//! Calls the `text-embedding-005` publisher model with the
//! SEMANTIC_SIMILARITY task type, so catalog items and free-text queries
//! land in the same embedding space.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use marquee::{DomainError, EmbeddingService};

use crate::config::VertexSettings;

const VERTEX_MODEL: &str = "text-embedding-005";
const TASK_TYPE: &str = "SEMANTIC_SIMILARITY";

/// Embedding provider backed by Vertex AI
pub struct VertexAiEmbedding {
    client: Client,
    settings: VertexSettings,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<TextInstance<'a>>,
}

#[derive(Debug, Serialize)]
struct TextInstance<'a> {
    content: &'a str,
    task_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    embeddings: PredictionEmbeddings,
}

#[derive(Debug, Deserialize)]
struct PredictionEmbeddings {
    values: Vec<f32>,
}

impl VertexAiEmbedding {
    pub fn new(settings: VertexSettings, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:predict",
            location = self.settings.location,
            project = self.settings.project_id,
            model = VERTEX_MODEL,
        )
    }
}

#[async_trait]
impl EmbeddingService for VertexAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = PredictRequest {
            instances: vec![TextInstance {
                content: text,
                task_type: TASK_TYPE,
            }],
        };

        let response = self
            .client
            .post(self.endpoint_url())
            .bearer_auth(&self.settings.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::Provider(format!(
                "Vertex AI API error ({}): {}",
                status, error_text
            )));
        }

        let predict: PredictResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Provider(e.to_string()))?;

        predict
            .predictions
            .into_iter()
            .next()
            .map(|p| p.embeddings.values)
            .ok_or_else(|| DomainError::Provider("No embedding returned".to_string()))
    }

    fn name(&self) -> &'static str {
        "vertex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let provider = VertexAiEmbedding::new(
            VertexSettings {
                project_id: "films".to_string(),
                location: "us-central1".to_string(),
                access_token: "token".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            provider.endpoint_url(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/films/locations/us-central1/publishers/google/models/text-embedding-005:predict"
        );
    }

    #[test]
    fn test_parses_prediction_payload() {
        let body = r#"{"predictions":[{"embeddings":{"values":[0.1,0.2],"statistics":{"token_count":3}}}]}"#;
        let parsed: PredictResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.predictions[0].embeddings.values, vec![0.1, 0.2]);
    }
}
