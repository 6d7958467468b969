//! Retriever backed by a knowledge base provider

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::crag::Retriever;
use crate::domain::knowledge_base::{Document, KnowledgeBaseProvider, SearchParams};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct KnowledgeBaseRetriever {
    knowledge_base: Arc<dyn KnowledgeBaseProvider>,
    top_k: usize,
    similarity_threshold: f32,
}

impl KnowledgeBaseRetriever {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBaseProvider>) -> Self {
        Self {
            knowledge_base,
            top_k: 4,
            similarity_threshold: 0.0,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}

#[async_trait]
impl Retriever for KnowledgeBaseRetriever {
    async fn retrieve(&self, question: &str) -> Result<Vec<Document>, DomainError> {
        let params = SearchParams::new(question)
            .with_top_k(self.top_k)
            .with_similarity_threshold(self.similarity_threshold);

        let results = self.knowledge_base.search(params).await?;

        debug!(
            kb = self.knowledge_base.knowledge_base_id(),
            hits = results.len(),
            "Knowledge base search complete"
        );

        Ok(results.into_iter().map(|r| r.into_document()).collect())
    }
}
