//! Knowledge base search types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::Document;

/// Search parameters for knowledge base queries
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Query text to search for
    pub query: String,
    /// Number of results to return
    pub top_k: usize,
    /// Minimum similarity score (0.0 - 1.0)
    pub similarity_threshold: f32,
}

impl SearchParams {
    /// Create new search parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 4,
            similarity_threshold: 0.0,
        }
    }

    /// Set number of results
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// A single hit returned by a knowledge base search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub content: String,
    /// Similarity score (0.0 - 1.0)
    pub score: f32,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            metadata: HashMap::new(),
        }
    }

    pub fn with_all_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Convert the hit into a workflow document, keeping its metadata as provenance
    pub fn into_document(self) -> Document {
        Document::new(self.content).with_all_metadata(self.metadata)
    }
}
