use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{CragConfig, DomainError};
use crate::infrastructure::llm::{LlmProviderType, ProviderConnection};
use crate::infrastructure::observability::{LoggingConfig, ObservabilityConfig};
use crate::infrastructure::web_search::DEFAULT_TAVILY_BASE_URL;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub web_search: WebSearchConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Chat model used by the grader, rewriter and generator
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProviderType,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Overrides `model` for relevance grading
    #[serde(default)]
    pub grader_model: Option<String>,
    /// Overrides `model` for query rewriting
    #[serde(default)]
    pub rewriter_model: Option<String>,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

/// Embeddings for knowledge base ranking; term overlap is used when disabled
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Defaults to the chat provider
    #[serde(default)]
    pub provider: Option<LlmProviderType>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseConfig {
    #[serde(default = "default_knowledge_base_id")]
    pub id: String,
    /// JSON corpus loaded at start-up
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub similarity_threshold: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebSearchProviderType {
    #[default]
    Tavily,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebSearchConfig {
    #[serde(default)]
    pub provider: WebSearchProviderType,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_web_search_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_web_search_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_grading_concurrency")]
    pub grading_concurrency: usize,
    #[serde(default = "default_step_timeout_secs")]
    pub step_timeout_secs: u64,
    #[serde(default = "default_max_corrective_passes")]
    pub max_corrective_passes: u32,
    /// Characters per SSE frame on `/stream`
    #[serde(default = "default_stream_chunk_size")]
    pub stream_chunk_size: usize,
    #[serde(default = "default_stream_chunk_delay_ms")]
    pub stream_chunk_delay_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_llm_model() -> String {
    "llama3.2".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_knowledge_base_id() -> String {
    "default".to_string()
}

fn default_top_k() -> usize {
    4
}

fn default_web_search_base_url() -> String {
    DEFAULT_TAVILY_BASE_URL.to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_web_search_timeout_secs() -> u64 {
    30
}

fn default_grading_concurrency() -> usize {
    4
}

fn default_step_timeout_secs() -> u64 {
    120
}

fn default_max_corrective_passes() -> u32 {
    1
}

fn default_stream_chunk_size() -> usize {
    5
}

fn default_stream_chunk_delay_ms() -> u64 {
    50
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            base_url: None,
            api_key: None,
            model: default_llm_model(),
            grader_model: None,
            rewriter_model: None,
            temperature: 0.0,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: None,
            base_url: None,
            api_key: None,
            model: default_embedding_model(),
        }
    }
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            id: default_knowledge_base_id(),
            corpus_path: None,
            top_k: default_top_k(),
            similarity_threshold: 0.0,
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            provider: WebSearchProviderType::default(),
            api_key: None,
            base_url: default_web_search_base_url(),
            max_results: default_max_results(),
            timeout_secs: default_web_search_timeout_secs(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            grading_concurrency: default_grading_concurrency(),
            step_timeout_secs: default_step_timeout_secs(),
            max_corrective_passes: default_max_corrective_passes(),
            stream_chunk_size: default_stream_chunk_size(),
            stream_chunk_delay_ms: default_stream_chunk_delay_ms(),
        }
    }
}

impl LlmConfig {
    pub fn connection(&self) -> ProviderConnection<'_> {
        ProviderConnection {
            provider: self.provider,
            base_url: self.base_url.as_deref(),
            api_key: self.api_key.as_deref(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn grader_model(&self) -> &str {
        self.grader_model.as_deref().unwrap_or(&self.model)
    }

    pub fn rewriter_model(&self) -> &str {
        self.rewriter_model.as_deref().unwrap_or(&self.model)
    }
}

impl EmbeddingConfig {
    /// Connection for the embedding endpoint, inheriting unset fields from the chat provider
    pub fn connection<'a>(&'a self, llm: &'a LlmConfig) -> ProviderConnection<'a> {
        let provider = self.provider.unwrap_or(llm.provider);
        let inherit = provider == llm.provider;

        ProviderConnection {
            provider,
            base_url: self
                .base_url
                .as_deref()
                .or_else(|| llm.base_url.as_deref().filter(|_| inherit)),
            api_key: self
                .api_key
                .as_deref()
                .or_else(|| llm.api_key.as_deref().filter(|_| inherit)),
            timeout: Duration::from_secs(llm.timeout_secs),
        }
    }
}

impl WorkflowConfig {
    pub fn crag_config(&self) -> CragConfig {
        CragConfig::new()
            .with_grading_concurrency(self.grading_concurrency)
            .with_step_timeout(Duration::from_secs(self.step_timeout_secs))
            .with_max_corrective_passes(self.max_corrective_passes)
    }

    pub fn stream_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.stream_chunk_delay_ms)
    }
}

fn is_missing(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl AppConfig {
    /// Load layered configuration: defaults, `config/default`, `config/local`, then `APP__*`
    /// environment variables, with the well-known credential variables as fallbacks.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_credential_fallbacks(|key| std::env::var(key).ok());

        Ok(app_config)
    }

    /// Fill unset API keys from unprefixed variables such as `TAVILY_API_KEY`
    pub fn apply_credential_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if is_missing(&self.web_search.api_key) {
            self.web_search.api_key = lookup("TAVILY_API_KEY");
        }

        if is_missing(&self.llm.api_key) && self.llm.provider == LlmProviderType::OpenAi {
            self.llm.api_key = lookup("OPENAI_API_KEY");
        }

        if is_missing(&self.embedding.api_key)
            && self.embedding.provider == Some(LlmProviderType::OpenAi)
        {
            self.embedding.api_key = lookup("OPENAI_API_KEY");
        }
    }

    /// Reject configurations that cannot serve requests
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.web_search.provider == WebSearchProviderType::Tavily
            && is_missing(&self.web_search.api_key)
        {
            return Err(DomainError::configuration(
                "TAVILY_API_KEY is required for the tavily web search provider",
            ));
        }

        if self.llm.provider.requires_api_key() && is_missing(&self.llm.api_key) {
            return Err(DomainError::configuration(
                "OPENAI_API_KEY is required for the openai llm provider",
            ));
        }

        if self.embedding.enabled {
            let connection = self.embedding.connection(&self.llm);

            if connection.provider.requires_api_key()
                && connection.api_key.is_none_or(|k| k.trim().is_empty())
            {
                return Err(DomainError::configuration(
                    "An API key is required for openai embeddings",
                ));
            }
        }

        if self.workflow.max_corrective_passes == 0 {
            return Err(DomainError::configuration(
                "workflow.max_corrective_passes must be at least 1",
            ));
        }

        if self.workflow.grading_concurrency == 0 {
            return Err(DomainError::configuration(
                "workflow.grading_concurrency must be at least 1",
            ));
        }

        if self.workflow.step_timeout_secs == 0 {
            return Err(DomainError::configuration(
                "workflow.step_timeout_secs must be at least 1",
            ));
        }

        if self.workflow.stream_chunk_size == 0 {
            return Err(DomainError::configuration(
                "workflow.stream_chunk_size must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::observability::LogFormat;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.web_search.api_key = Some("tvly-test".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.llm.provider, LlmProviderType::Ollama);
        assert_eq!(config.llm.model, "llama3.2");
        assert_eq!(config.knowledge_base.top_k, 4);
        assert_eq!(config.web_search.max_results, 5);
        assert_eq!(config.workflow.stream_chunk_size, 5);
        assert_eq!(config.workflow.crag_config().max_corrective_passes, 1);
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "llm": {"provider": "openai", "model": "gpt-4o-mini", "grader_model": "gpt-4o"},
            "workflow": {"grading_concurrency": 8}
        }))
        .unwrap();

        assert_eq!(config.llm.provider, LlmProviderType::OpenAi);
        assert_eq!(config.llm.grader_model(), "gpt-4o");
        assert_eq!(config.llm.rewriter_model(), "gpt-4o-mini");
        assert_eq!(config.workflow.grading_concurrency, 8);
        assert_eq!(config.workflow.step_timeout_secs, 120);
    }

    #[test]
    fn test_missing_tavily_key_is_rejected() {
        let error = AppConfig::default().validate().unwrap_err();

        assert!(matches!(error, DomainError::Configuration { .. }));
        assert!(error.to_string().contains("TAVILY_API_KEY"));
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let mut config = valid_config();
        config.web_search.api_key = Some("  ".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_openai_requires_key() {
        let mut config = valid_config();
        config.llm.provider = LlmProviderType::OpenAi;
        assert!(config.validate().is_err());

        config.llm.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_openai_embeddings_require_key() {
        let mut config = valid_config();
        config.embedding.enabled = true;
        assert!(config.validate().is_ok());

        config.embedding.provider = Some(LlmProviderType::OpenAi);
        assert!(config.validate().is_err());

        config.embedding.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_workflow_bounds() {
        let mut config = valid_config();
        config.workflow.max_corrective_passes = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.workflow.grading_concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.workflow.stream_chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.workflow.step_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credential_fallbacks() {
        let mut config = AppConfig::default();
        config.llm.provider = LlmProviderType::OpenAi;

        config.apply_credential_fallbacks(|key| Some(format!("{}-value", key)));

        assert_eq!(config.web_search.api_key.as_deref(), Some("TAVILY_API_KEY-value"));
        assert_eq!(config.llm.api_key.as_deref(), Some("OPENAI_API_KEY-value"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_key_wins_over_fallback() {
        let mut config = valid_config();
        config.apply_credential_fallbacks(|_| Some("from-env".to_string()));

        assert_eq!(config.web_search.api_key.as_deref(), Some("tvly-test"));
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_embedding_inherits_llm_connection() {
        let mut config = AppConfig::default();
        config.llm.base_url = Some("http://gpu:11434".to_string());

        let connection = config.embedding.connection(&config.llm);

        assert_eq!(connection.provider, LlmProviderType::Ollama);
        assert_eq!(connection.base_url, Some("http://gpu:11434"));
    }
}
