pub mod settings;

pub use settings::{AppConfig, ProbeConfig, ServerConfig};
