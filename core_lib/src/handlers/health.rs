//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use crate::{probe::HealthVerdict, AppState};

/// Runs one height-convergence pass and maps the verdict onto the HTTP
/// contract: 200 when healthy, 503 otherwise. This handler never errors;
/// every failure mode is an unhealthy verdict.
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET / - Running height-convergence check");

    let enabled = state.config.probe.enabled_now();
    let verdict = state.checker.check(enabled).await;

    let status_code = if verdict.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(verdict_payload(&verdict)))
}

// Wire shape kept compatible with the original probe: the comparison branch
// reports the heights, the missing-data branch reports an error string plus
// whatever per-endpoint data was collected.
fn verdict_payload(verdict: &HealthVerdict) -> serde_json::Value {
    match &verdict.reason {
        Some(reason) => serde_json::json!({
            "status": verdict.status,
            "error": reason,
            "ip_blocks": verdict.height_data,
        }),
        None => serde_json::json!({
            "status": verdict.status,
            "current_height": verdict.local_height,
            "max_height": verdict.max_peer_height,
            "behind_by": verdict.behind_by,
            "height_data": verdict.height_data,
        }),
    }
}

/// Answers "is the probe process itself up", as distinct from the node
/// verdict served at the root route.
pub async fn handle_liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "timestamp": chrono::Utc::now().timestamp()
        })),
    )
}
