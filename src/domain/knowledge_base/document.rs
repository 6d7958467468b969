//! Document value type shared by retrieval, grading, web search and generation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A passage of text plus its provenance annotations.
///
/// Documents are created by a retriever or by wrapping a web search hit and are
/// never mutated afterwards; the builder methods consume and return `self`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "page_content")]
    content: String,
    #[serde(default)]
    metadata: HashMap<String, Value>,
}

impl Document {
    /// Create a document with empty metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add a single metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Replace all metadata
    pub fn with_all_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    /// The `source` annotation, when it is a string
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }
}
