//! Relevance grading

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::Document;
use crate::domain::DomainError;

/// Binary relevance judgment for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceGrade {
    Relevant,
    Irrelevant,
}

impl RelevanceGrade {
    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Relevant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevant => "relevant",
            Self::Irrelevant => "irrelevant",
        }
    }
}

/// Judges whether a single document addresses the question
#[async_trait]
pub trait RelevanceGrader: Send + Sync + Debug {
    async fn grade(&self, question: &str, document_text: &str)
    -> Result<RelevanceGrade, DomainError>;
}

/// The result of one complete grading pass
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    /// Documents judged relevant, in their original order
    pub relevant: Vec<Document>,
    pub discarded: usize,
    pub needs_web_search: bool,
}

impl GradingOutcome {
    /// Partition `documents` by the grade at the same position.
    ///
    /// An empty input grades nothing, so it never asks for a web search.
    pub fn from_grades(documents: Vec<Document>, grades: &[RelevanceGrade]) -> Self {
        debug_assert_eq!(documents.len(), grades.len());

        let total = documents.len();
        let relevant: Vec<Document> = documents
            .into_iter()
            .zip(grades)
            .filter(|(_, grade)| grade.is_relevant())
            .map(|(doc, _)| doc)
            .collect();
        let discarded = total - relevant.len();

        Self {
            relevant,
            discarded,
            needs_web_search: discarded > 0,
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Grades by exact document text, falling back to a default grade
    #[derive(Debug)]
    pub struct MockRelevanceGrader {
        default_grade: RelevanceGrade,
        grades: HashMap<String, RelevanceGrade>,
        fail_on: Option<String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockRelevanceGrader {
        pub fn always(grade: RelevanceGrade) -> Self {
            Self {
                default_grade: grade,
                grades: HashMap::new(),
                fail_on: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_grade(mut self, document_text: impl Into<String>, grade: RelevanceGrade) -> Self {
            self.grades.insert(document_text.into(), grade);
            self
        }

        /// Fail when asked to grade this exact text
        pub fn failing_on(mut self, document_text: impl Into<String>) -> Self {
            self.fail_on = Some(document_text.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RelevanceGrader for MockRelevanceGrader {
        async fn grade(
            &self,
            _question: &str,
            document_text: &str,
        ) -> Result<RelevanceGrade, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.fail_on.as_deref() == Some(document_text) {
                return Err(DomainError::provider("mock", "grader unavailable"));
            }

            Ok(self
                .grades
                .get(document_text)
                .copied()
                .unwrap_or(self.default_grade))
        }
    }
}
