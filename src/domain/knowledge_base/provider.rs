//! Knowledge base provider trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::document::Document;
use super::search::{SearchParams, SearchResult};
use crate::domain::error::DomainError;

/// Provider trait for knowledge base operations
///
/// The index is built outside the request path; the workflow only ever calls
/// `search`. `add_documents` is used at start-up to seed in-process stores.
#[async_trait]
pub trait KnowledgeBaseProvider: Send + Sync + Debug {
    /// Get the knowledge base ID this provider is configured for
    fn knowledge_base_id(&self) -> &str;

    /// Get the provider type name
    fn provider_type(&self) -> &'static str;

    /// Search the knowledge base, best match first
    async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, DomainError>;

    /// Add documents, returning how many were stored
    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError>;

    /// Get the total document count in the knowledge base
    async fn document_count(&self) -> Result<usize, DomainError>;

    /// Check if the knowledge base is healthy and accessible
    async fn health_check(&self) -> Result<bool, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock knowledge base provider for testing
    #[derive(Debug)]
    pub struct MockKnowledgeBaseProvider {
        id: String,
        results: Mutex<Vec<SearchResult>>,
        search_count: AtomicUsize,
        should_fail: AtomicBool,
    }

    impl MockKnowledgeBaseProvider {
        pub fn new(id: impl Into<String>) -> Self {
            Self {
                id: id.into(),
                results: Mutex::new(Vec::new()),
                search_count: AtomicUsize::new(0),
                should_fail: AtomicBool::new(false),
            }
        }

        /// Set fixed search results (returned regardless of query)
        pub fn with_search_results(self, results: Vec<SearchResult>) -> Self {
            *self.results.lock().unwrap() = results;
            self
        }

        /// Make every operation fail
        pub fn failing(self) -> Self {
            self.should_fail.store(true, Ordering::SeqCst);
            self
        }

        pub fn search_count(&self) -> usize {
            self.search_count.load(Ordering::SeqCst)
        }

        fn check_should_fail(&self) -> Result<(), DomainError> {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(DomainError::knowledge_base(
                    "Mock provider configured to fail",
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl KnowledgeBaseProvider for MockKnowledgeBaseProvider {
        fn knowledge_base_id(&self) -> &str {
            &self.id
        }

        fn provider_type(&self) -> &'static str {
            "mock"
        }

        async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, DomainError> {
            self.check_should_fail()?;
            self.search_count.fetch_add(1, Ordering::SeqCst);

            Ok(self
                .results
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.score >= params.similarity_threshold)
                .take(params.top_k)
                .cloned()
                .collect())
        }

        async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
            self.check_should_fail()?;

            let mut results = self.results.lock().unwrap();
            let count = documents.len();

            for doc in documents {
                let id = format!("doc-{}", results.len() + 1);
                results.push(SearchResult::new(id, doc.content(), 1.0)
                    .with_all_metadata(doc.metadata().clone()));
            }

            Ok(count)
        }

        async fn document_count(&self) -> Result<usize, DomainError> {
            self.check_should_fail()?;
            Ok(self.results.lock().unwrap().len())
        }

        async fn health_check(&self) -> Result<bool, DomainError> {
            self.check_should_fail()?;
            Ok(true)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_add_and_search() {
            let provider = MockKnowledgeBaseProvider::new("test-kb");

            provider
                .add_documents(vec![Document::new("Hello world content")])
                .await
                .unwrap();

            let results = provider.search(SearchParams::new("hello")).await.unwrap();

            assert_eq!(results.len(), 1);
            assert_eq!(results[0].id, "doc-1");
            assert_eq!(provider.search_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_provider_failure() {
            let provider = MockKnowledgeBaseProvider::new("test-kb").failing();

            let result = provider.search(SearchParams::new("test")).await;
            assert!(result.is_err());
        }
    }
}
