use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::Document;
use crate::domain::WorkflowOutcome;

/// Body of `POST /query`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Query string of `GET /stream`
#[derive(Debug, Clone, Deserialize)]
pub struct StreamParams {
    pub question: String,
}

/// Final workflow state as returned to clients.
///
/// `question` is the question the answer was generated for, which is the
/// rewritten one when the corrective path ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub question: String,
    pub documents: Vec<Document>,
    pub generation: String,
}

impl From<WorkflowOutcome> for QueryResponse {
    fn from(outcome: WorkflowOutcome) -> Self {
        let generation = outcome.generation().to_string();

        Self {
            question: outcome.state.question().to_string(),
            documents: outcome.state.documents().to_vec(),
            generation,
        }
    }
}
