//! In-memory knowledge base provider
//!
//! Ranks by cosine similarity when an embedding provider is configured and
//! falls back to query-term overlap otherwise.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest};
use crate::domain::knowledge_base::{Document, KnowledgeBaseProvider, SearchParams, SearchResult};
use crate::domain::DomainError;

const EMBEDDING_BATCH_SIZE: usize = 64;

#[derive(Debug)]
pub struct InMemoryKnowledgeBaseProvider {
    id: String,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    documents: RwLock<Vec<StoredDoc>>,
}

#[derive(Debug, Clone)]
struct StoredDoc {
    id: String,
    content: String,
    metadata: HashMap<String, serde_json::Value>,
    vector: Option<Vec<f32>>,
}

impl InMemoryKnowledgeBaseProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            embedder: None,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Rank by embedding similarity instead of term overlap
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    async fn embed(
        embedder: &dyn EmbeddingProvider,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(EMBEDDING_BATCH_SIZE) {
            let request = EmbeddingRequest::new(embedder.model(), batch.to_vec());
            vectors.extend(embedder.embed(request).await?.into_vectors());
        }

        Ok(vectors)
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Fraction of query terms present in the document
fn term_overlap(query_terms: &HashSet<String>, content: &str) -> f32 {
    if query_terms.is_empty() {
        return 0.0;
    }

    let doc_terms = terms(content);
    let matched = query_terms.iter().filter(|t| doc_terms.contains(*t)).count();

    matched as f32 / query_terms.len() as f32
}

#[async_trait]
impl KnowledgeBaseProvider for InMemoryKnowledgeBaseProvider {
    fn knowledge_base_id(&self) -> &str {
        &self.id
    }

    fn provider_type(&self) -> &'static str {
        "in_memory"
    }

    async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, DomainError> {
        let query_vector = match self.embedder {
            Some(ref embedder) => Self::embed(embedder.as_ref(), vec![params.query.clone()])
                .await?
                .into_iter()
                .next(),
            None => None,
        };
        let query_terms = terms(&params.query);

        let docs = self.documents.read().await;
        let mut scored: Vec<(f32, &StoredDoc)> = docs
            .iter()
            .map(|doc| {
                let score = match (&query_vector, &doc.vector) {
                    (Some(q), Some(v)) => cosine_similarity(q, v),
                    _ => term_overlap(&query_terms, &doc.content),
                };
                (score, doc)
            })
            .filter(|(score, _)| *score >= params.similarity_threshold)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<SearchResult> = scored
            .into_iter()
            .take(params.top_k)
            .map(|(score, doc)| {
                SearchResult::new(&doc.id, &doc.content, score)
                    .with_all_metadata(doc.metadata.clone())
            })
            .collect();

        debug!(kb = %self.id, hits = results.len(), "In-memory search");

        Ok(results)
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
        let vectors = match self.embedder {
            Some(ref embedder) => {
                let texts = documents.iter().map(|d| d.content().to_string()).collect();
                Some(Self::embed(embedder.as_ref(), texts).await?)
            }
            None => None,
        };

        let mut stored = self.documents.write().await;
        let count = documents.len();
        let mut vectors = vectors.map(Vec::into_iter);

        for doc in documents {
            let id = format!("{}-{}", self.id, stored.len() + 1);
            stored.push(StoredDoc {
                id,
                content: doc.content().to_string(),
                metadata: doc.metadata().clone(),
                vector: vectors.as_mut().and_then(Iterator::next),
            });
        }

        info!(kb = %self.id, added = count, total = stored.len(), "Documents added");

        Ok(count)
    }

    async fn document_count(&self) -> Result<usize, DomainError> {
        Ok(self.documents.read().await.len())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
