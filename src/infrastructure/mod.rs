//! Infrastructure layer - External service implementations

pub mod crag;
pub mod embedding;
pub mod knowledge_base;
pub mod llm;
pub mod observability;
pub mod web_search;
