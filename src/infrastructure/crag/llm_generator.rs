//! LLM-based answer generator using the standard RAG prompt

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::crag::AnswerGenerator;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct LlmAnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl LlmAnswerGenerator {
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

    fn build_prompt(context: &str, question: &str) -> String {
        format!(
            "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, just say that you don't know. \
Use three sentences maximum and keep the answer concise.\n\
Question: {question} \nContext: {context} \nAnswer:"
        )
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    async fn generate(&self, context: &str, question: &str) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .user(Self::build_prompt(context, question))
            .temperature(self.temperature)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        let answer = response.content().trim();

        if answer.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "Empty response from LLM",
            ));
        }

        debug!(model = %self.model, chars = answer.len(), "Generated answer");

        Ok(answer.to_string())
    }
}
