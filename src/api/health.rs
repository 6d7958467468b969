//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Returns 200 while the process is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness: the knowledge base answers and holds documents.
///
/// An empty knowledge base is `degraded` since every question then falls
/// through to web search.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let kb_check = check_knowledge_base(&state).await;
    let overall_status = kb_check.status;

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![kb_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_knowledge_base(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let kb = &state.knowledge_base;
    let name = format!("knowledge_base:{}", kb.knowledge_base_id());

    let result = match kb.health_check().await {
        Ok(true) => kb.document_count().await,
        Ok(false) => Err(crate::domain::DomainError::knowledge_base(
            "knowledge base reported unhealthy",
        )),
        Err(e) => Err(e),
    };

    let (status, message, document_count) = match result {
        Ok(0) => (
            HealthStatus::Degraded,
            Some("knowledge base is empty".to_string()),
            Some(0),
        ),
        Ok(count) => (HealthStatus::Healthy, None, Some(count)),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string()), None),
    };

    HealthCheck {
        name,
        status,
        message,
        document_count,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}
