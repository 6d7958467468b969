//! Workflow error types

use thiserror::Error;

use super::state::WorkflowNode;
use crate::domain::DomainError;

/// Errors that abort a workflow run
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Retrieval failed in '{step}': {message}")]
    Retrieval { step: WorkflowNode, message: String },

    #[error("Grading failed in '{step}': {message}")]
    Grading { step: WorkflowNode, message: String },

    #[error("Query rewrite failed in '{step}': {message}")]
    Rewrite { step: WorkflowNode, message: String },

    #[error("Web search failed in '{step}': {message}")]
    WebSearch { step: WorkflowNode, message: String },

    #[error("Generation failed in '{step}': {message}")]
    Generation { step: WorkflowNode, message: String },

    #[error("Timeout in step '{step}' after {timeout_ms}ms")]
    Timeout { step: WorkflowNode, timeout_ms: u64 },

    #[error("Cancelled during step '{step}'")]
    Cancelled { step: WorkflowNode },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl WorkflowError {
    /// Wrap a collaborator failure as the error kind belonging to `step`
    pub fn for_node(step: WorkflowNode, source: DomainError) -> Self {
        let message = source.to_string();

        match step {
            WorkflowNode::Retrieve => Self::Retrieval { step, message },
            WorkflowNode::GradeDocuments => Self::Grading { step, message },
            WorkflowNode::TransformQuery => Self::Rewrite { step, message },
            WorkflowNode::WebSearch => Self::WebSearch { step, message },
            WorkflowNode::Generate => Self::Generation { step, message },
        }
    }

    pub fn timeout(step: WorkflowNode, timeout_ms: u64) -> Self {
        Self::Timeout { step, timeout_ms }
    }

    pub fn cancelled(step: WorkflowNode) -> Self {
        Self::Cancelled { step }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// The step that failed; `None` for input rejected before the run started
    pub fn step(&self) -> Option<WorkflowNode> {
        match self {
            Self::Retrieval { step, .. }
            | Self::Grading { step, .. }
            | Self::Rewrite { step, .. }
            | Self::WebSearch { step, .. }
            | Self::Generation { step, .. }
            | Self::Timeout { step, .. }
            | Self::Cancelled { step } => Some(*step),
            Self::InvalidInput(_) => None,
        }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Retrieval { .. } => "retrieval_failure",
            Self::Grading { .. } => "grading_failure",
            Self::Rewrite { .. } => "rewrite_failure",
            Self::WebSearch { .. } => "web_search_failure",
            Self::Generation { .. } => "generation_failure",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled { .. } => "cancelled",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}
