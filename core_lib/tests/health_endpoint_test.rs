//! Router-level tests: one check invocation per request, verdict serialized
//! with the documented field names and status codes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use core_lib::{create_app, AppConfig, AppState, Endpoint, HeightClient, ProbeError};
use tower::ServiceExt;

struct FixedHeights(HashMap<String, Result<u64, ProbeError>>);

impl FixedHeights {
    fn new(entries: Vec<(&str, Result<u64, ProbeError>)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(host, outcome)| (host.to_string(), outcome))
                .collect(),
        )
    }
}

#[async_trait::async_trait]
impl HeightClient for FixedHeights {
    async fn block_height(&self, host: &str) -> Result<u64, ProbeError> {
        self.0
            .get(host)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::Network(format!("no route to {}", host))))
    }
}

fn test_config(enabled: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.probe.enabled = enabled;
    config.probe.endpoints = vec![
        Endpoint::local("localhost"),
        Endpoint::peer("peer1"),
        Endpoint::peer("peer2"),
    ];
    config
}

async fn get_root(state: AppState) -> (StatusCode, serde_json::Value) {
    let app = create_app(state);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let payload = serde_json::from_slice(&bytes).unwrap();

    (status, payload)
}

#[tokio::test]
async fn test_healthy_node_returns_200() {
    let client = FixedHeights::new(vec![
        ("localhost", Ok(1000)),
        ("peer1", Ok(1050)),
        ("peer2", Ok(1080)),
    ]);
    let state = AppState::with_client(test_config(true), Arc::new(client));

    let (status, payload) = get_root(state).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "healthy");
    assert_eq!(payload["current_height"], 1000);
    assert_eq!(payload["max_height"], 1080);
    assert_eq!(payload["behind_by"], 80);
    assert_eq!(payload["height_data"]["localhost"], 1000);
    assert_eq!(payload["height_data"]["peer1"], 1050);
    assert_eq!(payload["height_data"]["peer2"], 1080);
}

#[tokio::test]
async fn test_stale_node_returns_503() {
    let client = FixedHeights::new(vec![
        ("localhost", Ok(900)),
        ("peer1", Ok(1050)),
        ("peer2", Err(ProbeError::Network("connection refused".to_string()))),
    ]);
    let state = AppState::with_client(test_config(true), Arc::new(client));

    let (status, payload) = get_root(state).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(payload["status"], "unhealthy");
    assert_eq!(payload["behind_by"], 150);
    assert_eq!(payload["height_data"]["peer2"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_disabled_probe_returns_503_without_queries() {
    struct PanickingClient;

    #[async_trait::async_trait]
    impl HeightClient for PanickingClient {
        async fn block_height(&self, _host: &str) -> Result<u64, ProbeError> {
            panic!("no network calls may be issued while disabled");
        }
    }

    let state = AppState::with_client(test_config(false), Arc::new(PanickingClient));

    let (status, payload) = get_root(state).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(payload["status"], "unhealthy");
    assert_eq!(payload["error"], "disabled");
    assert_eq!(payload["ip_blocks"], serde_json::json!({}));
}

#[tokio::test]
async fn test_missing_peer_data_returns_error_payload() {
    let client = FixedHeights::new(vec![
        ("localhost", Ok(500)),
        ("peer1", Err(ProbeError::Network("timed out".to_string()))),
        ("peer2", Err(ProbeError::Network("timed out".to_string()))),
    ]);
    let state = AppState::with_client(test_config(true), Arc::new(client));

    let (status, payload) = get_root(state).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(payload["status"], "unhealthy");
    assert_eq!(
        payload["error"],
        "no valid responses from peers or local node"
    );
    assert_eq!(payload["ip_blocks"]["localhost"], 500);
    assert_eq!(payload["ip_blocks"]["peer1"], serde_json::Value::Null);
    assert_eq!(payload["ip_blocks"]["peer2"], serde_json::Value::Null);
    assert!(payload.get("height_data").is_none());
}

#[tokio::test]
async fn test_liveness_route() {
    let client = FixedHeights::new(vec![]);
    let state = AppState::with_client(test_config(true), Arc::new(client));
    let app = create_app(state);

    let response = app
        .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(payload["status"], "alive");
}
