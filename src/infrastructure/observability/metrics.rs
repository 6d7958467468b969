//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("corrective_rag_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the end of a workflow run. `outcome` is `success` or an error kind.
pub fn record_workflow_run(outcome: &str, route: Option<&str>, duration: Duration) {
    let labels = [
        ("outcome", outcome.to_string()),
        ("route", route.unwrap_or("none").to_string()),
    ];

    counter!("crag_workflow_runs_total", &labels).increment(1);
    histogram!("crag_workflow_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record time spent in one workflow node
pub fn record_step_duration(step: &str, duration: Duration) {
    histogram!("crag_step_duration_seconds", "step" => step.to_string())
        .record(duration.as_secs_f64());
}

/// Record the grades of one grading pass
pub fn record_documents_graded(relevant: usize, irrelevant: usize) {
    counter!("crag_documents_graded_total", "grade" => "relevant").increment(relevant as u64);
    counter!("crag_documents_graded_total", "grade" => "irrelevant").increment(irrelevant as u64);
}

pub fn record_web_search_results(count: usize) {
    counter!("crag_web_search_results_total").increment(count as u64);
}

/// Record a chat completion call
pub fn record_llm_request(provider: &str, model: &str, success: bool, duration: Duration) {
    let labels = [
        ("provider", provider.to_string()),
        ("model", model.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("llm_requests_total", &labels).increment(1);
    histogram!("llm_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Sanitize URL path for metric labels (limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");

    match path.char_indices().nth(50) {
        Some((end, _)) => path[..end].to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/api/items/123/parts"), "/api/items/{id}/parts");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/query"), "/query");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_sanitize_path_truncates_on_char_boundary() {
        let path = format!("/{}", "é".repeat(60));
        let result = sanitize_path(&path);

        assert_eq!(result.chars().count(), 50);
        assert!(path.starts_with(&result));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_workflow_run("success", Some("generate"), Duration::from_millis(10));
        record_step_duration("retrieve", Duration::from_millis(1));
        record_documents_graded(2, 1);
        record_web_search_results(3);
    }
}
