//! `POST /query`

use axum::extract::State;
use tracing::{info, warn};

use super::state::AppState;
use super::types::{ApiError, Json, QueryRequest, QueryResponse};

/// Run the workflow to completion and return the final state
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    info!(question = %request.question, "Query received");

    let outcome = state.workflow.run(&request.question).await.map_err(|e| {
        warn!(error = %e, kind = e.kind(), "Query failed");
        ApiError::from(e)
    })?;

    Ok(Json(QueryResponse::from(outcome)))
}
