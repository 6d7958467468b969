//! Knowledge Base domain - Documents and vector search

mod document;
mod provider;
mod search;

pub use document::Document;
pub use provider::KnowledgeBaseProvider;
pub use search::{SearchParams, SearchResult};

#[cfg(test)]
pub use provider::mock::MockKnowledgeBaseProvider;
