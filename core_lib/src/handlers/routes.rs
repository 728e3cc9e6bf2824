//! HTTP route table for the probe

use axum::{routing::get, Router};

use crate::handlers::health::{handle_health, handle_liveness};
use crate::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_health))
        .route("/live", get(handle_liveness))
}
