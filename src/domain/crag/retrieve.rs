//! Retriever trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::knowledge_base::Document;
use crate::domain::DomainError;

/// Fetches candidate documents for a question, best first
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    async fn retrieve(&self, question: &str) -> Result<Vec<Document>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    pub struct MockRetriever {
        documents: Vec<Document>,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl MockRetriever {
        pub fn new(documents: Vec<Document>) -> Self {
            Self {
                documents,
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Retriever for MockRetriever {
        async fn retrieve(&self, _question: &str) -> Result<Vec<Document>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match self.error {
                Some(ref error) => Err(DomainError::knowledge_base(error.clone())),
                None => Ok(self.documents.clone()),
            }
        }
    }
}
