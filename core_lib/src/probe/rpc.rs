//! JSON-RPC height client for querying node endpoints

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// JSON-RPC 2.0 request for the current block height. The id carries no
/// meaning here; a constant is fine since responses are never multiplexed.
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Vec<serde_json::Value>,
    pub id: u32,
}

impl RpcRequest {
    pub fn block_number() -> Self {
        Self {
            jsonrpc: "2.0",
            method: "quai_blockNumber",
            params: Vec::new(),
            id: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<String>,
}

/// Parses a hexadecimal height string, with or without the `0x` prefix the
/// wire convention uses.
pub fn parse_hex_height(raw: &str) -> Result<u64, ProbeError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(ProbeError::Protocol(format!(
            "empty height value: {:?}",
            raw
        )));
    }

    u64::from_str_radix(digits, 16)
        .map_err(|e| ProbeError::Protocol(format!("non-hex height value {:?}: {}", raw, e)))
}

/// Seam between the checker and the wire, so checks can run against test
/// doubles instead of live nodes.
#[async_trait::async_trait]
pub trait HeightClient: Send + Sync {
    async fn block_height(&self, host: &str) -> Result<u64, ProbeError>;
}

/// Real client: one JSON-RPC POST per query, bounded by the configured
/// per-request timeout.
#[derive(Debug, Clone)]
pub struct RpcHeightClient {
    client: reqwest::Client,
    rpc_port: u16,
    timeout: Duration,
}

impl RpcHeightClient {
    pub fn new(rpc_port: u16, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            rpc_port,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl HeightClient for RpcHeightClient {
    async fn block_height(&self, host: &str) -> Result<u64, ProbeError> {
        let url = format!("http://{}:{}", host, self.rpc_port);

        let response = self
            .client
            .post(&url)
            .json(&RpcRequest::block_number())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProbeError::Network(e.to_string()))?;

        let payload: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProbeError::Protocol(e.to_string()))?;

        let hex = payload
            .result
            .ok_or_else(|| ProbeError::Protocol("missing result field".to_string()))?;

        parse_hex_height(&hex)
    }
}
