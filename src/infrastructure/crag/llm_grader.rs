//! LLM-based relevance grader
//!
//! Asks the model for a `{"binary_score": "yes" | "no"}` verdict per document.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::crag::{RelevanceGrade, RelevanceGrader};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

const GRADER_SYSTEM_PROMPT: &str = "You are a grader assessing relevance of a retrieved document to a user question. \n \
    If the document contains semantic meaning related to the question, grade it as relevant. \n\
    Give a binary score 'yes' if its relevant and 'no' if its irrelevant. \n\
    Respond with ONLY a JSON object in this exact format: {\"binary_score\": \"yes\"} or {\"binary_score\": \"no\"}";

/// Relevance grader backed by a chat model
#[derive(Debug)]
pub struct LlmRelevanceGrader {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl LlmRelevanceGrader {
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

    fn build_request(&self, question: &str, document_text: &str) -> LlmRequest {
        LlmRequest::builder()
            .system(GRADER_SYSTEM_PROMPT)
            .user(format!(
                "Retrieved document: \n\n {} \n\n User question: {}",
                document_text, question
            ))
            .temperature(self.temperature)
            .max_tokens(50)
            .json_output()
            .build()
    }
}

/// Response structure from LLM grading
#[derive(Debug, Deserialize)]
struct GradeResponse {
    binary_score: String,
}

/// Extract JSON object from a string (handles markdown code blocks)
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (start < end).then(|| &text[start..=end])
}

fn parse_verdict(verdict: &str) -> Option<RelevanceGrade> {
    let token = verdict
        .trim()
        .trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .split(|c: char| !c.is_ascii_alphanumeric())
        .next()?
        .to_ascii_lowercase();

    match token.as_str() {
        "yes" => Some(RelevanceGrade::Relevant),
        "no" => Some(RelevanceGrade::Irrelevant),
        _ => None,
    }
}

/// Read the grade from a model reply: JSON first, then a leading yes/no
fn parse_grade(response: &str) -> Result<RelevanceGrade, DomainError> {
    if let Some(json) = extract_json(response) {
        if let Ok(parsed) = serde_json::from_str::<GradeResponse>(json) {
            if let Some(grade) = parse_verdict(&parsed.binary_score) {
                return Ok(grade);
            }
        }
    }

    parse_verdict(response).ok_or_else(|| {
        warn!("Unrecognised grader response: {}", response);
        DomainError::validation(format!("Invalid grader response: {}", response))
    })
}

#[async_trait]
impl RelevanceGrader for LlmRelevanceGrader {
    async fn grade(
        &self,
        question: &str,
        document_text: &str,
    ) -> Result<RelevanceGrade, DomainError> {
        let request = self.build_request(question, document_text);
        let response = self.provider.chat(&self.model, request).await?;
        let grade = parse_grade(response.content())?;

        debug!(model = %self.model, grade = grade.as_str(), "Graded document");

        Ok(grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{LlmResponseFormat, MockLlmProvider};

    #[test]
    fn test_extract_json() {
        let text = "Sure! ```json\n{\"binary_score\": \"yes\"}\n```";
        assert_eq!(extract_json(text), Some("{\"binary_score\": \"yes\"}"));
        assert_eq!(extract_json("no braces"), None);
    }

    #[test]
    fn test_parse_grade_json() {
        assert_eq!(
            parse_grade(r#"{"binary_score": "yes"}"#).unwrap(),
            RelevanceGrade::Relevant
        );
        assert_eq!(
            parse_grade(r#"{"binary_score": "No"}"#).unwrap(),
            RelevanceGrade::Irrelevant
        );
    }

    #[test]
    fn test_parse_grade_bare_token() {
        assert_eq!(parse_grade("Yes.").unwrap(), RelevanceGrade::Relevant);
        assert_eq!(parse_grade("  no, it is not").unwrap(), RelevanceGrade::Irrelevant);
    }

    #[test]
    fn test_parse_grade_rejects_other_text() {
        assert!(parse_grade("maybe").is_err());
        assert!(parse_grade(r#"{"binary_score": "perhaps"}"#).is_err());
        assert!(parse_grade("").is_err());
    }

    #[tokio::test]
    async fn test_grade_sends_document_and_question() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response(r#"{"binary_score":"yes"}"#));
        let grader = LlmRelevanceGrader::new(provider.clone(), "llama3.2");

        let grade = grader
            .grade("agent memory", "Memory can be short-term or long-term.")
            .await
            .unwrap();

        assert_eq!(grade, RelevanceGrade::Relevant);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].response_format, LlmResponseFormat::JsonObject);
        assert_eq!(
            requests[0].messages[1].content,
            "Retrieved document: \n\n Memory can be short-term or long-term. \n\n User question: agent memory"
        );
    }

    #[tokio::test]
    async fn test_grade_provider_error() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("connection refused"));
        let grader = LlmRelevanceGrader::new(provider, "llama3.2");

        let result = grader.grade("q", "doc").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
