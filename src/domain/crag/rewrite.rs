//! Query rewriting for web search

use std::fmt::Debug;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// First clause ending in `?` with no `.`, `?` or newline before it
static QUESTION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.?\n]*\?").unwrap());

/// Rephrases a question so it works better as a web search query
#[async_trait]
pub trait QueryRewriter: Send + Sync + Debug {
    /// Returns free-form text; it may or may not contain a question
    async fn rewrite(&self, question: &str) -> Result<String, DomainError>;
}

/// Pick the new working question out of a rewriter's reply.
///
/// Prefers the first interrogative clause, then the whole trimmed reply, then
/// the trimmed original question when the reply is blank.
pub fn extract_rewritten_question(rewritten: &str, original: &str) -> String {
    if let Some(found) = QUESTION_PATTERN.find(rewritten) {
        return found.as_str().trim().to_string();
    }

    let trimmed = rewritten.trim();
    if trimmed.is_empty() {
        original.trim().to_string()
    } else {
        trimmed.to_string()
    }
}
