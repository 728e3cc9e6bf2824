pub mod health;
pub mod routes;

pub use health::{handle_health, handle_liveness};
pub use routes::create_routes;
