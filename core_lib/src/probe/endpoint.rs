//! Endpoint identity for the nodes a check pass queries

use serde::{Deserialize, Serialize};

/// Whether an endpoint is the node being health-checked or a reference peer.
/// An explicit tag, rather than matching on the literal host string
/// "localhost", decides which height is "the local height".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    Local,
    Peer,
}

/// One node to query. Immutable; supplied at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub role: EndpointRole,
}

impl Endpoint {
    pub fn local(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            role: EndpointRole::Local,
        }
    }

    pub fn peer(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            role: EndpointRole::Peer,
        }
    }

    pub fn is_local(&self) -> bool {
        self.role == EndpointRole::Local
    }
}
