//! Host configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use exp_types::ExpParams;

use crate::{LogFormat, NodeError};

/// Configuration for the EXP request host.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Module parameters live in the
/// `[params]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for request storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to collect Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Upper bound on requests of each kind examined per block.
    #[serde(default = "default_max_requests_per_block")]
    pub max_requests_per_block: usize,

    #[serde(default)]
    pub params: ExpParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./exp_data")
}

fn default_map_size() -> usize {
    256 * 1024 * 1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_requests_per_block() -> usize {
    1_000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        self.params
            .validate()
            .map_err(|e| NodeError::Config(format!("params: {e}")))?;
        self.log_format()?;
        if self.max_requests_per_block == 0 {
            return Err(NodeError::Config(
                "max_requests_per_block must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
            max_requests_per_block: default_max_requests_per_block(),
            params: ExpParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.max_requests_per_block, 1_000);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.params, ExpParams::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"
            max_requests_per_block = 10

            [params]
            burn_exp_period_secs = 3600
            denom = "uexp"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.max_requests_per_block, 10);
        assert_eq!(config.params.burn_exp_period_secs, 3600);
        assert_eq!(config.params.close_pool_period_secs, 60); // default
    }

    #[test]
    fn invalid_params_are_rejected() {
        let toml = r#"
            [params]
            denom = "x"
        "#;
        assert!(matches!(
            NodeConfig::from_toml_str(toml),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(NodeConfig::from_toml_str("log_format = \"yaml\"").is_err());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/exp.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
