use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::openai::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OPENAI_BASE_URL};
use super::OpenAiProvider;
use crate::domain::{DomainError, EmbeddingProvider, LlmProvider};
use crate::infrastructure::embedding::OpenAiEmbeddingProvider;

/// Which OpenAI-compatible backend to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    OpenAi,
    #[default]
    Ollama,
}

impl LlmProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => DEFAULT_OPENAI_BASE_URL,
            Self::Ollama => DEFAULT_OLLAMA_BASE_URL,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAi)
    }
}

/// Connection settings shared by chat and embedding providers
#[derive(Debug, Clone)]
pub struct ProviderConnection<'a> {
    pub provider: LlmProviderType,
    pub base_url: Option<&'a str>,
    pub api_key: Option<&'a str>,
    pub timeout: Duration,
}

impl ProviderConnection<'_> {
    fn base_url(&self) -> &str {
        self.base_url
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    fn api_key(&self) -> Result<&str, DomainError> {
        self.api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
            DomainError::configuration("OPENAI_API_KEY is required for the openai provider")
        })
    }
}

/// Factory for creating LLM and embedding providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a chat provider
    pub fn create(connection: &ProviderConnection<'_>) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let client = HttpClient::with_timeout(connection.timeout)?;

        match connection.provider {
            LlmProviderType::OpenAi => Ok(Arc::new(OpenAiProvider::with_base_url(
                client,
                connection.api_key()?,
                connection.base_url(),
            ))),
            LlmProviderType::Ollama => Ok(Arc::new(OpenAiProvider::ollama(
                client,
                connection.base_url(),
            ))),
        }
    }

    /// Create an embedding provider
    pub fn create_embedding(
        connection: &ProviderConnection<'_>,
        model: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let client = HttpClient::with_timeout(connection.timeout)?;

        match connection.provider {
            LlmProviderType::OpenAi => Ok(Arc::new(OpenAiEmbeddingProvider::with_base_url(
                client,
                Some(connection.api_key()?),
                connection.base_url(),
                model,
            ))),
            LlmProviderType::Ollama => Ok(Arc::new(OpenAiEmbeddingProvider::with_base_url(
                client,
                None,
                connection.base_url(),
                model,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(provider: LlmProviderType, api_key: Option<&str>) -> ProviderConnection<'_> {
        ProviderConnection {
            provider,
            base_url: None,
            api_key,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_create_ollama_without_key() {
        let provider = LlmProviderFactory::create(&connection(LlmProviderType::Ollama, None)).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
    }

    #[test]
    fn test_create_openai_requires_key() {
        let result = LlmProviderFactory::create(&connection(LlmProviderType::OpenAi, None));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));

        let result = LlmProviderFactory::create(&connection(LlmProviderType::OpenAi, Some("")));
        assert!(result.is_err());

        let provider =
            LlmProviderFactory::create(&connection(LlmProviderType::OpenAi, Some("sk-1"))).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_embedding() {
        let provider = LlmProviderFactory::create_embedding(
            &connection(LlmProviderType::Ollama, None),
            "nomic-embed-text",
        )
        .unwrap();

        assert_eq!(provider.model(), "nomic-embed-text");
    }

    #[test]
    fn test_provider_type_deserialize() {
        let provider: LlmProviderType = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(provider, LlmProviderType::OpenAi);
        assert!(provider.requires_api_key());
        assert!(!LlmProviderType::Ollama.requires_api_key());
    }
}
