use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::probe::{Endpoint, EndpointRole};

/// Environment variable consulted on every check so the gating flag can be
/// flipped between invocations without a restart.
pub const ENABLED_ENV_VAR: &str = "APP_PROBE_ENABLED";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// When false the checker is bypassed entirely and the probe reports
    /// unhealthy without issuing any network calls.
    pub enabled: bool,
    /// Ordered endpoint set; exactly one entry should carry the local role.
    pub endpoints: Vec<Endpoint>,
    /// Healthy iff behind_by < staleness_threshold, strictly.
    pub staleness_threshold: u64,
    pub request_timeout_seconds: u64,
    pub rpc_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoints: vec![
                Endpoint::peer("35.225.109.37"),
                Endpoint::peer("34.170.246.185"),
                Endpoint::peer("34.138.8.33"),
                Endpoint::peer("35.231.18.216"),
                Endpoint::peer("34.150.225.232"),
                Endpoint::peer("35.245.223.75"),
                Endpoint::local("localhost"),
            ],
            staleness_threshold: 100,
            request_timeout_seconds: 5,
            rpc_port: 9200,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.probe.endpoints.is_empty() {
            return Err(ConfigError::Message(
                "Probe endpoint list cannot be empty".to_string(),
            ));
        }

        let local_count = self
            .probe
            .endpoints
            .iter()
            .filter(|e| e.role == EndpointRole::Local)
            .count();

        // Zero locals degrades to an unhealthy verdict at check time; more
        // than one makes "the local height" ambiguous and is rejected here.
        if local_count > 1 {
            return Err(ConfigError::Message(
                "At most one endpoint may have the local role".to_string(),
            ));
        }

        if self.probe.request_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.probe.rpc_port == 0 {
            return Err(ConfigError::Message("RPC port cannot be 0".to_string()));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ProbeConfig {
    /// Reads the gating flag fresh from the environment, falling back to the
    /// loaded configuration value. The original deployment toggled this via
    /// a reloaded environment between health checks.
    pub fn enabled_now(&self) -> bool {
        match std::env::var(ENABLED_ENV_VAR) {
            Ok(raw) => matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
            Err(_) => self.enabled,
        }
    }
}
