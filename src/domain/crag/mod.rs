//! CRAG (Corrective RAG) domain
//!
//! Types and traits for the corrective retrieval loop: retrieve, grade each
//! document, and either generate straight away or rewrite the question and
//! fall back to web search first.

mod config;
mod error;
mod generate;
mod grade;
mod outcome;
mod retrieve;
mod rewrite;
mod state;
mod web_search;

pub use config::CragConfig;
pub use error::WorkflowError;
pub use generate::{build_context, AnswerGenerator};
pub use grade::{GradingOutcome, RelevanceGrade, RelevanceGrader};
pub use outcome::{StepTiming, WorkflowOutcome};
pub use retrieve::Retriever;
pub use rewrite::{extract_rewritten_question, QueryRewriter};
pub use state::{decide_route, Route, WorkflowNode, WorkflowStage, WorkflowState};
pub use web_search::{WebSearchProvider, WebSearchRecord};

#[cfg(test)]
pub use generate::mock::MockAnswerGenerator;
#[cfg(test)]
pub use grade::mock::MockRelevanceGrader;
#[cfg(test)]
pub use retrieve::mock::MockRetriever;
#[cfg(test)]
pub use rewrite::mock::MockQueryRewriter;
#[cfg(test)]
pub use web_search::mock::MockWebSearchProvider;
