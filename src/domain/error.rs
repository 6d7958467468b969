use thiserror::Error;

/// Core domain errors raised by adapters and configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn knowledge_base(message: impl Into<String>) -> Self {
        Self::KnowledgeBase(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("tavily", "rate limited");
        assert_eq!(error.to_string(), "Provider error: tavily - rate limited");
    }

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("TAVILY_API_KEY is not set");
        assert_eq!(
            error.to_string(),
            "Configuration error: TAVILY_API_KEY is not set"
        );
    }

    #[test]
    fn test_knowledge_base_error() {
        let error = DomainError::knowledge_base("index not loaded");
        assert_eq!(error.to_string(), "Knowledge base error: index not loaded");
    }
}
