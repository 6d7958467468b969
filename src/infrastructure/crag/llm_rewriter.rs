//! LLM-based question re-writer

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::crag::QueryRewriter;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

const REWRITER_SYSTEM_PROMPT: &str = "You a question re-writer that converts an input question to a better version that is optimized \n \
     for web search. Look at the input and try to reason about the underlying semantic intent / meaning and only output the new improved question.";

#[derive(Debug)]
pub struct LlmQueryRewriter {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl LlmQueryRewriter {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }
}

#[async_trait]
impl QueryRewriter for LlmQueryRewriter {
    async fn rewrite(&self, question: &str) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .system(REWRITER_SYSTEM_PROMPT)
            .user(format!(
                "Here is the initial question: \n\n {} \n Formulate an improved question.",
                question
            ))
            .temperature(self.temperature)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        debug!(model = %self.model, "Question rewritten");

        Ok(response.content().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    #[tokio::test]
    async fn test_rewrite_returns_raw_reply() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response("Improved: What are the types of agent memory?"),
        );
        let rewriter = LlmQueryRewriter::new(provider.clone(), "llama3.2");

        let reply = rewriter.rewrite("agent memory").await.unwrap();

        assert_eq!(reply, "Improved: What are the types of agent memory?");
        let requests = provider.requests();
        assert!(requests[0].messages[0].content.contains("re-writer"));
        assert!(requests[0].messages[1].content.contains("agent memory"));
    }

    #[tokio::test]
    async fn test_rewrite_error() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("timeout"));
        let rewriter = LlmQueryRewriter::new(provider, "llama3.2");

        assert!(rewriter.rewrite("q").await.is_err());
    }
}
