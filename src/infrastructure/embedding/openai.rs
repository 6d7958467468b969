//! OpenAI-compatible embedding provider (OpenAI or a local Ollama server)

use async_trait::async_trait;
use serde::Deserialize;

use crate::infrastructure::llm::HttpClientTrait;
use crate::domain::embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Embedding provider for `/v1/embeddings`
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a provider; pass `None` as the key for unauthenticated local servers
    pub fn with_base_url(
        client: C,
        api_key: Option<&str>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: api_key.map(|key| format!("Bearer {}", key)),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<EmbeddingResponse, DomainError> {
        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(
                "embedding",
                format!("Failed to parse embedding response: {}", e),
            )
        })?;

        let embeddings: Vec<Embedding> = response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.index, d.embedding))
            .collect();

        Ok(EmbeddingResponse::new(
            response.model.unwrap_or_else(|| self.model.clone()),
            embeddings,
        ))
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let body = serde_json::to_value(&request)
            .map_err(|e| DomainError::provider("embedding", e.to_string()))?;

        let response = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), &body)
            .await?;

        let parsed = self.parse_response(response)?;

        if parsed.embeddings().len() != request.inputs().len() {
            return Err(DomainError::provider(
                "embedding",
                format!(
                    "Expected {} embeddings, got {}",
                    request.inputs().len(),
                    parsed.embeddings().len()
                ),
            ));
        }

        Ok(parsed)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    model: Option<String>,
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
