pub mod checker;
pub mod endpoint;
pub mod rpc;


pub use checker::{HealthVerdict, HeightConvergenceChecker, HeightQueryResult, VerdictStatus};
pub use endpoint::{Endpoint, EndpointRole};
pub use rpc::{HeightClient, RpcHeightClient};
