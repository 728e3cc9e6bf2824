//! Core library for the chain-sync health probe: configuration, the
//! height-convergence checker, and the HTTP surface that exposes it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod probe;

pub use config::{AppConfig, ProbeConfig, ServerConfig};
pub use error::{AppError, ProbeError, Result};
pub use handlers::routes::create_routes;
pub use probe::{
    Endpoint, EndpointRole, HealthVerdict, HeightClient, HeightConvergenceChecker,
    RpcHeightClient, VerdictStatus,
};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware as axum_middleware, Router};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub checker: Arc<HeightConvergenceChecker>,
}

impl AppState {
    /// Wires the real JSON-RPC client into a checker built from the loaded
    /// configuration.
    pub fn new(config: AppConfig) -> Self {
        let client = RpcHeightClient::new(
            config.probe.rpc_port,
            Duration::from_secs(config.probe.request_timeout_seconds),
        );
        let checker = HeightConvergenceChecker::new(
            config.probe.endpoints.clone(),
            config.probe.staleness_threshold,
            Arc::new(client),
        );

        Self {
            config,
            checker: Arc::new(checker),
        }
    }

    /// State with an injected height client, for tests and alternate
    /// transports.
    pub fn with_client(config: AppConfig, client: Arc<dyn HeightClient>) -> Self {
        let checker = HeightConvergenceChecker::new(
            config.probe.endpoints.clone(),
            config.probe.staleness_threshold,
            client,
        );

        Self {
            config,
            checker: Arc::new(checker),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
            info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        }))
        .layer(axum_middleware::from_fn(middleware::logging::log_request))
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
