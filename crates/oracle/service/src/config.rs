//! Service configuration
//!
//! Layered as: built-in defaults, then an optional TOML file, then
//! `ORACLE__`-prefixed environment variables (`__` separates sections,
//! e.g. `ORACLE__ANALYSIS__API_KEY`).

use oracle_types::WorkflowConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP trigger listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Everything the workflows read
    #[serde(flatten)]
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Run the compliance sync on its schedule
    #[serde(default = "default_true")]
    pub cron_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cron_enabled: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8088))
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    /// Load configuration from defaults, an optional file and the
    /// environment.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Tables merge key by key, so the built-in chain table is left to
        // `#[serde(default)]` and only applies when no source sets `chains`.
        let mut defaults = serde_json::to_value(ServiceConfig::default())
            .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
        if let Some(sections) = defaults.as_object_mut() {
            sections.remove("chains");
        }
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ORACLE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.authorized_keys")
                .with_list_parse_key("don.signing_seeds")
                .with_list_parse_key("bridge.unsupported_sources")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
