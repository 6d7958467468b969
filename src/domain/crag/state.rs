//! Request-scoped workflow state and the routing decision

use std::fmt;

use serde::Serialize;

use super::grade::GradingOutcome;
use crate::domain::knowledge_base::Document;

/// Stage the workflow has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Start,
    Retrieved,
    Graded,
    Rewritten,
    WebSearched,
    Generated,
}

impl WorkflowStage {
    /// Whether moving from `self` to `next` is an edge of the workflow graph.
    ///
    /// `WebSearched -> Graded` only happens when more than one corrective pass is allowed.
    pub fn can_transition_to(&self, next: WorkflowStage) -> bool {
        use WorkflowStage::*;

        matches!(
            (self, next),
            (Start, Retrieved)
                | (Retrieved, Graded)
                | (Graded, Generated)
                | (Graded, Rewritten)
                | (Rewritten, WebSearched)
                | (WebSearched, Generated)
                | (WebSearched, Graded)
        )
    }
}

/// A node of the workflow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowNode {
    Retrieve,
    GradeDocuments,
    TransformQuery,
    WebSearch,
    Generate,
}

impl WorkflowNode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::GradeDocuments => "grade_documents",
            Self::TransformQuery => "transform_query",
            Self::WebSearch => "web_search",
            Self::Generate => "generate",
        }
    }
}

impl fmt::Display for WorkflowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where to go after a grading pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Generate,
    TransformQuery,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::TransformQuery => "transform_query",
        }
    }
}

/// Route after grading. Depends only on the latest grading pass.
pub fn decide_route(state: &WorkflowState) -> Route {
    if state.needs_web_search() {
        Route::TransformQuery
    } else {
        Route::Generate
    }
}

/// Mutable state owned by a single in-flight request
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    question: String,
    documents: Vec<Document>,
    needs_web_search: bool,
    generation: Option<String>,
    stage: WorkflowStage,
    history: Vec<WorkflowStage>,
    corrective_passes: u32,
}

impl WorkflowState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            documents: Vec::new(),
            needs_web_search: false,
            generation: None,
            stage: WorkflowStage::Start,
            history: vec![WorkflowStage::Start],
            corrective_passes: 0,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn needs_web_search(&self) -> bool {
        self.needs_web_search
    }

    /// Final answer; `None` until the generate step has succeeded
    pub fn generation(&self) -> Option<&str> {
        self.generation.as_deref()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// Every stage visited, starting with `Start`
    pub fn history(&self) -> &[WorkflowStage] {
        &self.history
    }

    pub fn corrective_passes(&self) -> u32 {
        self.corrective_passes
    }

    /// Whether another rewrite-and-search cycle is allowed
    pub fn can_correct(&self, max_corrective_passes: u32) -> bool {
        self.corrective_passes < max_corrective_passes
    }

    pub fn set_retrieved(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.enter(WorkflowStage::Retrieved);
    }

    /// Commit a complete grading pass
    pub fn apply_grading(&mut self, outcome: GradingOutcome) {
        self.documents = outcome.relevant;
        self.needs_web_search = outcome.needs_web_search;
        self.enter(WorkflowStage::Graded);
    }

    pub fn set_rewritten_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
        self.corrective_passes += 1;
        self.enter(WorkflowStage::Rewritten);
    }

    /// Append web results after the documents kept by grading
    pub fn append_web_results(&mut self, documents: Vec<Document>) {
        self.documents.extend(documents);
        self.enter(WorkflowStage::WebSearched);
    }

    pub fn set_generation(&mut self, generation: impl Into<String>) {
        self.generation = Some(generation.into());
        self.enter(WorkflowStage::Generated);
    }

    fn enter(&mut self, next: WorkflowStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "invalid workflow transition {:?} -> {:?}",
            self.stage,
            next
        );
        self.stage = next;
        self.history.push(next);
    }
}
