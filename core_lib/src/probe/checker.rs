//! Height-convergence health check across a local node and its peers

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ProbeError;
use crate::probe::endpoint::{Endpoint, EndpointRole};
use crate::probe::rpc::HeightClient;

pub const REASON_DISABLED: &str = "disabled";
pub const REASON_NO_DATA: &str = "no valid responses from peers or local node";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Healthy,
    Unhealthy,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictStatus::Healthy => write!(f, "healthy"),
            VerdictStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Outcome of querying a single endpoint. Created fresh per check pass and
/// discarded once the verdict is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightQueryResult {
    pub endpoint: Endpoint,
    pub height: Option<u64>,
    pub error: Option<ProbeError>,
}

/// Aggregate result of one check pass.
///
/// `behind_by` is present iff both heights are; a healthy status requires
/// both present and `behind_by < threshold`. `height_data` always carries
/// one entry per configured endpoint, failed queries as `None`, so the
/// observability payload is complete even on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthVerdict {
    pub status: VerdictStatus,
    pub local_height: Option<u64>,
    pub max_peer_height: Option<u64>,
    pub behind_by: Option<i64>,
    pub height_data: BTreeMap<String, Option<u64>>,
    pub reason: Option<String>,
}

impl HealthVerdict {
    pub fn is_healthy(&self) -> bool {
        self.status == VerdictStatus::Healthy
    }

    fn disabled() -> Self {
        Self {
            status: VerdictStatus::Unhealthy,
            local_height: None,
            max_peer_height: None,
            behind_by: None,
            height_data: BTreeMap::new(),
            reason: Some(REASON_DISABLED.to_string()),
        }
    }
}

/// Queries every configured endpoint once for its chain height, compares the
/// local height against the peer maximum, and returns a verdict. Holds no
/// state across passes; concurrent invocations are independent.
pub struct HeightConvergenceChecker {
    endpoints: Vec<Endpoint>,
    staleness_threshold: u64,
    client: Arc<dyn HeightClient>,
}

impl HeightConvergenceChecker {
    pub fn new(
        endpoints: Vec<Endpoint>,
        staleness_threshold: u64,
        client: Arc<dyn HeightClient>,
    ) -> Self {
        Self {
            endpoints,
            staleness_threshold,
            client,
        }
    }

    /// Runs one health-check pass. Never fails: every per-endpoint error is
    /// downgraded to a missing height, and missing data yields an unhealthy
    /// verdict with a reason rather than an error.
    ///
    /// `enabled` is the process-wide gating flag, read fresh by the caller
    /// for each invocation; when false no network calls are issued.
    pub async fn check(&self, enabled: bool) -> HealthVerdict {
        if !enabled {
            info!("health reporting disabled, skipping endpoint queries");
            return HealthVerdict::disabled();
        }

        let queries = self.endpoints.iter().map(|endpoint| async {
            match self.client.block_height(&endpoint.host).await {
                Ok(height) => HeightQueryResult {
                    endpoint: endpoint.clone(),
                    height: Some(height),
                    error: None,
                },
                Err(err) => {
                    warn!(host = %endpoint.host, error = %err, "failed to get response from endpoint");
                    HeightQueryResult {
                        endpoint: endpoint.clone(),
                        height: None,
                        error: Some(err),
                    }
                }
            }
        });

        let results = future::join_all(queries).await;
        self.aggregate(results)
    }

    // Order-independent: max and presence checks are commutative, so the
    // completion order of the queries cannot change the verdict.
    fn aggregate(&self, results: Vec<HeightQueryResult>) -> HealthVerdict {
        let mut height_data = BTreeMap::new();
        let mut local_height = None;
        let mut max_peer_height: Option<u64> = None;

        for result in &results {
            height_data.insert(result.endpoint.host.clone(), result.height);

            match (result.endpoint.role, result.height) {
                (EndpointRole::Local, Some(height)) => local_height = Some(height),
                (EndpointRole::Peer, Some(height)) => {
                    max_peer_height = Some(max_peer_height.map_or(height, |max| max.max(height)));
                }
                (_, None) => {}
            }
        }

        match (local_height, max_peer_height) {
            (Some(local), Some(max_peer)) => {
                let behind_by = max_peer as i64 - local as i64;

                info!("Highest block number from peer nodes: {}", max_peer);
                info!("Current block number: {}", local);
                info!("This node is behind by: {}", behind_by);

                let status = if behind_by < self.staleness_threshold as i64 {
                    VerdictStatus::Healthy
                } else {
                    VerdictStatus::Unhealthy
                };

                HealthVerdict {
                    status,
                    local_height: Some(local),
                    max_peer_height: Some(max_peer),
                    behind_by: Some(behind_by),
                    height_data,
                    reason: None,
                }
            }
            (local, max_peer) => {
                warn!(
                    local_responded = local.is_some(),
                    peers_responded = max_peer.is_some(),
                    "insufficient data to compare heights"
                );

                HealthVerdict {
                    status: VerdictStatus::Unhealthy,
                    local_height: local,
                    max_peer_height: max_peer,
                    behind_by: None,
                    height_data,
                    reason: Some(REASON_NO_DATA.to_string()),
                }
            }
        }
    }
}
