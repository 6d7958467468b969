//! Domain layer - Core types, traits and the corrective retrieval rules

pub mod crag;
pub mod embedding;
pub mod error;
pub mod knowledge_base;
pub mod llm;

pub use crag::{
    decide_route, AnswerGenerator, CragConfig, QueryRewriter, RelevanceGrade, RelevanceGrader,
    Retriever, Route, WebSearchProvider, WebSearchRecord, WorkflowError, WorkflowNode,
    WorkflowOutcome, WorkflowStage, WorkflowState,
};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use knowledge_base::{Document, KnowledgeBaseProvider, SearchParams, SearchResult};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, LlmResponseFormat,
    Message, MessageRole, Usage,
};
