//! Shared types used across the classroom crates.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Client ID used when a caller does not identify itself.
pub const DEFAULT_CLIENT_ID: &str = "classroom";

/// Per-request context passed to every tool call and recorded in tracing spans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Identifier of the calling client (tutor agent, gateway user, ...).
    pub client_id: String,
    /// Optional correlation id for request tracing.
    #[serde(default)]
    pub correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Resolved client ID (never empty).
    pub fn resolved_client_id(&self) -> &str {
        Some(self.client_id.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_CLIENT_ID)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_ID)
    }
}

/// Gateway configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown in logs and the status route.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Optional JSON catalog replacing the built-in classroom topics.
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Request queue depth between tool sessions and the tool server.
    pub channel_capacity: usize,
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `CLASSROOM_CONFIG` path > `config/gateway.toml` > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CLASSROOM_CONFIG").unwrap_or_else(|_| "config/gateway.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Same as [`CoreConfig::load`] but with an explicit file path. Missing files fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("app_name", "Classroom Tutor")?
            .set_default("port", 8001_i64)?
            .set_default("channel_capacity", 32_i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("CLASSROOM").separator("__"))
            .build()?;

        built.try_deserialize()
    }
}
