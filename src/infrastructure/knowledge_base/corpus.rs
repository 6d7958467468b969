//! Corpus file loading
//!
//! Accepts a JSON array of documents or an object with a `documents` array.
//! Each entry carries `content` (or `page_content`) and optional `metadata`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domain::knowledge_base::Document;
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    List(Vec<CorpusEntry>),
    Wrapped { documents: Vec<CorpusEntry> },
}

#[derive(Debug, Deserialize)]
struct CorpusEntry {
    #[serde(alias = "page_content")]
    content: String,
    #[serde(default)]
    metadata: HashMap<String, Value>,
}

/// Parse corpus JSON into documents, skipping blank entries
pub fn parse_corpus(json: &str) -> Result<Vec<Document>, DomainError> {
    let file: CorpusFile = serde_json::from_str(json)
        .map_err(|e| DomainError::knowledge_base(format!("Invalid corpus file: {}", e)))?;

    let entries = match file {
        CorpusFile::List(entries) => entries,
        CorpusFile::Wrapped { documents } => documents,
    };

    Ok(entries
        .into_iter()
        .filter(|e| !e.content.trim().is_empty())
        .map(|e| Document::new(e.content).with_all_metadata(e.metadata))
        .collect())
}

/// Read and parse a corpus file
pub async fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<Document>, DomainError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::knowledge_base(format!("Failed to read corpus {}: {}", path.display(), e))
    })?;

    let documents = parse_corpus(&json)?;
    info!(path = %path.display(), documents = documents.len(), "Corpus loaded");

    Ok(documents)
}
