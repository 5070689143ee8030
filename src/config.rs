//! Agent configuration
//!
//! Loaded from a JSON file at boot and validated before any subsystem is
//! touched. The network name doubles as the request scope filter: inbound
//! requests naming a different network are dropped without a response body.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Agent configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Network this node serves; requests for other networks are ignored
    pub network_name: String,

    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 4040)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Service unit that runs the node as an active validator
    pub validator_unit: String,

    /// Service unit that runs the node as a warm backup
    pub backup_unit: String,

    /// Path to the base64-encoded 256-bit command key
    pub key_file: PathBuf,

    /// Bound on each unit stop/start wait, in seconds (default: 60)
    #[serde(default = "default_unit_op_timeout_secs")]
    pub unit_op_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4040
}

fn default_unit_op_timeout_secs() -> u64 {
    60
}

impl AgentConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: AgentConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.network_name.is_empty() {
            return Err(ConfigError::Invalid("network_name must not be empty".into()));
        }
        if self.validator_unit.is_empty() {
            return Err(ConfigError::Invalid("validator_unit must not be empty".into()));
        }
        if self.backup_unit.is_empty() {
            return Err(ConfigError::Invalid("backup_unit must not be empty".into()));
        }
        if self.validator_unit == self.backup_unit {
            return Err(ConfigError::Invalid(
                "validator_unit and backup_unit must name different units".into(),
            ));
        }
        if self.unit_op_timeout_secs == 0 {
            return Err(ConfigError::Invalid("unit_op_timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    /// Socket address string to bind
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Bound on each unit stop/start wait
    pub fn unit_op_timeout(&self) -> Duration {
        Duration::from_secs(self.unit_op_timeout_secs)
    }

    /// Starter configuration written by `init`
    pub fn starter(network_name: &str, key_file: PathBuf) -> Self {
        Self {
            network_name: network_name.to_string(),
            host: default_host(),
            port: default_port(),
            validator_unit: "collator-validator.service".to_string(),
            backup_unit: "collator-backup.service".to_string(),
            key_file,
            unit_op_timeout_secs: default_unit_op_timeout_secs(),
        }
    }
}
