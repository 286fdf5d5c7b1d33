//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration is a small YAML document. This module
//! defines strongly-typed structs mirroring it, with serde defaults so a
//! missing file section (or an entirely empty document) yields a fully
//! usable configuration.
//!
//! ```yaml
//! pagination:
//!   default_limit: 100
//!   max_limit: 500
//! depletion:
//!   mode: primary_yield_cap
//!   cap: 250
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::lifecycle::DepletionPolicy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// List-operation pagination bounds.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Node depletion policy evaluated by the explicit depletion hook.
    #[serde(default)]
    pub depletion: DepletionPolicy,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Pagination bounds for list operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the caller does not specify a limit.
    #[serde(default = "default_page_limit")]
    pub default_limit: usize,

    /// Hard upper bound on any requested page size.
    #[serde(default = "default_max_page_limit")]
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_page_limit(),
        }
    }
}

const fn default_page_limit() -> usize {
    100
}

const fn default_max_page_limit() -> usize {
    500
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::parse("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.pagination.default_limit, 100);
        assert_eq!(config.pagination.max_limit, 500);
        assert_eq!(config.depletion, DepletionPolicy::Manual);
    }

    #[test]
    fn full_document_parses() {
        let yaml = r"
pagination:
  default_limit: 25
  max_limit: 50
depletion:
  mode: primary_yield_cap
  cap: 250
";
        let config = EngineConfig::parse(yaml).unwrap();
        assert_eq!(config.pagination.default_limit, 25);
        assert_eq!(config.pagination.max_limit, 50);
        assert_eq!(config.depletion, DepletionPolicy::PrimaryYieldCap { cap: 250 });
    }

    #[test]
    fn partial_section_keeps_remaining_defaults() {
        let yaml = r"
pagination:
  default_limit: 10
";
        let config = EngineConfig::parse(yaml).unwrap();
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.pagination.max_limit, 500);
        assert_eq!(config.depletion, DepletionPolicy::Manual);
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = EngineConfig::parse(": not yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
