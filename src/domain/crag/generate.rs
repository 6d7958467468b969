//! Answer generation

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::knowledge_base::Document;
use crate::domain::DomainError;

/// Produces the final answer from grounding context
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    async fn generate(&self, context: &str, question: &str) -> Result<String, DomainError>;
}

/// Join document contents into the grounding context
pub fn build_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(Document::content)
        .collect::<Vec<_>>()
        .join("\n\n")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_context_joins_with_blank_line() {
        let docs = vec![Document::new("first"), Document::new("second")];
        assert_eq!(build_context(&docs), "first\n\nsecond");
    }

    #[test]
    fn test_build_context_empty() {
        assert_eq!(build_context(&[]), "");
    }
}
