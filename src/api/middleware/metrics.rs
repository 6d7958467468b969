//! HTTP metrics middleware

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use super::route_path;
use crate::infrastructure::observability::record_http_request;

/// Record `http_requests_total` and `http_request_duration_seconds`
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = route_path(&request);

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_path_falls_back_to_uri() {
        let request = Request::builder()
            .uri("/stream?question=hi")
            .body(Body::empty())
            .unwrap();

        assert_eq!(route_path(&request), "/stream");
    }
}
