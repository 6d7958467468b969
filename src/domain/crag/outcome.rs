//! Result of a completed workflow run

use serde::Serialize;

use super::state::{Route, WorkflowNode, WorkflowState};

/// Wall-clock time spent in one node
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub node: WorkflowNode,
    pub duration_ms: u64,
}

/// Final state plus execution metadata
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    pub state: WorkflowState,
    /// Route taken after the first grading pass
    pub route: Route,
    pub steps: Vec<StepTiming>,
    pub execution_time_ms: u64,
}

impl WorkflowOutcome {
    /// The generated answer
    pub fn generation(&self) -> &str {
        self.state.generation().unwrap_or_default()
    }

    /// Nodes visited, in order
    pub fn visited_nodes(&self) -> Vec<WorkflowNode> {
        self.steps.iter().map(|s| s.node).collect()
    }
}
