use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeFile, trace::TraceLayer};

use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::{health, query, stream};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Static client served at `/`
pub const INDEX_HTML: &str = "public/index.html";

/// Create the router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/query", post(query::query))
        .route("/stream", get(stream::stream))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route_service("/", ServeFile::new(INDEX_HTML))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Create the router plus the Prometheus endpoint when metrics are enabled
pub fn create_router_with_metrics(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let router = create_router(state);

    match metrics {
        Some(m) => router.merge(create_metrics_router(m, metrics_path)),
        None => router,
    }
}
