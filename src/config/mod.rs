//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, KnowledgeBaseConfig, LlmConfig, ServerConfig, WebSearchConfig,
    WebSearchProviderType, WorkflowConfig,
};
pub use crate::infrastructure::observability::{LogFormat, LoggingConfig};
