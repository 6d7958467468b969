//! Observability infrastructure - Tracing, Metrics, and Logging

mod config;
mod metrics;
mod tracing_setup;

pub use config::{LogFormat, LoggingConfig, MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_documents_graded, record_http_request,
    record_llm_request, record_step_duration, record_web_search_results, record_workflow_run,
    PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
