//! Configuration management for the MCP file server
//!
//! Defaults are built in; an optional `config.toml` and `MCP_FILE_SERVER_*`
//! environment variables override them in that order.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "MCP_FILE_SERVER_CONFIG";

/// Prefix for environment overrides, e.g. `MCP_FILE_SERVER_SORT_ENTRIES=false`
pub const ENV_PREFIX: &str = "MCP_FILE_SERVER";

const DEFAULT_CONFIG_FILE: &str = "config";

/// What to do when a requested path contains a `..` segment.
///
/// The attempt is logged either way.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraversalPolicy {
    #[default]
    Reject,
    Warn,
}

/// Complete server configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Handling of `..` segments in requested paths
    pub traversal_policy: TraversalPolicy,

    /// Number of leading bytes inspected when classifying undecodable files
    pub binary_sniff_bytes: usize,

    /// Non-text ratio at or above which undecodable content counts as binary
    pub binary_threshold: f64,

    /// Optional upper bound on the size of a file `read_file` will load
    #[serde(default)]
    pub max_read_bytes: Option<u64>,

    /// Sort listings by lowercase name
    pub sort_entries: bool,

    /// Write through a temporary file renamed over the target
    pub atomic_writes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            traversal_policy: TraversalPolicy::Reject,
            binary_sniff_bytes: 8192,
            binary_threshold: 0.30,
            max_read_bytes: None,
            sort_entries: true,
            atomic_writes: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `$MCP_FILE_SERVER_CONFIG` or `./config.toml`
    /// with environment overrides. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from(Some(&PathBuf::from(path))),
            None => Self::load_from(None),
        }
    }

    /// Load configuration from an explicit file (required when given)
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("traversal_policy", "reject")?
            .set_default("binary_sniff_bytes", defaults.binary_sniff_bytes as i64)?
            .set_default("binary_threshold", defaults.binary_threshold)?
            .set_default("sort_entries", defaults.sort_entries)?
            .set_default("atomic_writes", defaults.atomic_writes)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binary_sniff_bytes == 0 {
            return Err(ConfigError::Invalid(
                "binary_sniff_bytes must be greater than 0".into(),
            ));
        }

        if !(self.binary_threshold > 0.0 && self.binary_threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "binary_threshold must be in (0, 1], got {}",
                self.binary_threshold
            )));
        }

        if self.max_read_bytes == Some(0) {
            return Err(ConfigError::Invalid(
                "max_read_bytes must be greater than 0 when set".into(),
            ));
        }

        Ok(())
    }
}
