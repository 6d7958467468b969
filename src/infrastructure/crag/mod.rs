//! CRAG infrastructure - the workflow engine and its LLM/knowledge base adapters

mod kb_retriever;
mod llm_generator;
mod llm_grader;
mod llm_rewriter;
mod workflow;

pub use kb_retriever::KnowledgeBaseRetriever;
pub use llm_generator::LlmAnswerGenerator;
pub use llm_grader::LlmRelevanceGrader;
pub use llm_rewriter::LlmQueryRewriter;
pub use workflow::CragWorkflow;
