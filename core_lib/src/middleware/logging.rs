//! Request logging middleware

use axum::{extract::Request, middleware::Next, response::Response};

pub async fn log_request(
    req: Request,
    next: Next,
) -> std::result::Result<Response, std::convert::Infallible> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    // 503 is the expected "node unhealthy" answer, not a failure of the
    // probe itself, so it logs at warn rather than error.
    if response.status().is_success() {
        tracing::info!(
            method = %method,
            path = %uri.path(),
            status = status,
            latency_ms = latency.as_millis(),
            "request processed"
        );
    } else {
        tracing::warn!(
            method = %method,
            path = %uri.path(),
            status = status,
            latency_ms = latency.as_millis(),
            "request processed"
        );
    }

    Ok(response)
}
