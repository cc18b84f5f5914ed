//! Engine configuration.
//!
//! Capacities are fixed for a subtree's lifetime: nothing grows mid-frame.
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! node_capacity = 2048
//! resource_slots = 512
//! resource_buckets = 128
//! scroll_pixels_per_line = 32.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading or validating a config.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// The document is not valid TOML or has unknown/mistyped keys.
    #[error("invalid config TOML: {0}")]
    Parse(String),

    /// Parsed fine but a value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Sizing and tuning knobs for one subtree.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Layout tree arena size, root included.
    pub node_capacity: usize,
    /// Resource cache slots, sentinel excluded.
    pub resource_slots: usize,
    /// Resource cache hash buckets. Power of two.
    pub resource_buckets: usize,
    /// 16-wide groups in the node-identity table. Power of two.
    pub node_id_groups: usize,
    /// Events accepted per frame.
    pub event_capacity: usize,
    /// Default scroll speed for new scroll regions.
    pub scroll_pixels_per_line: f32,
    /// Width of the resize grab band along the right and bottom outer edges.
    pub resize_border: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_capacity: 4096,
            resource_slots: 1024,
            resource_buckets: 256,
            node_id_groups: 64,
            event_capacity: 256,
            scroll_pixels_per_line: 40.0,
            resize_border: 6.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }

    /// Check ranges the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Node 0 is the root, so a usable tree needs room for at least one child.
        if self.node_capacity < 2 {
            return Err(ConfigError::Invalid("node_capacity must be at least 2".into()));
        }
        if self.resource_slots == 0 {
            return Err(ConfigError::Invalid("resource_slots must be > 0".into()));
        }
        if !self.resource_buckets.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "resource_buckets must be a power of two, got {}",
                self.resource_buckets
            )));
        }
        if !self.node_id_groups.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "node_id_groups must be a power of two, got {}",
                self.node_id_groups
            )));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be > 0".into()));
        }
        if !(self.scroll_pixels_per_line > 0.0) {
            return Err(ConfigError::Invalid(
                "scroll_pixels_per_line must be positive".into(),
            ));
        }
        if self.resize_border < 0.0 {
            return Err(ConfigError::Invalid("resize_border must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str("node_capacity = 64\nresize_border = 2.5").unwrap();
        assert_eq!(config.node_capacity, 64);
        assert_eq!(config.resize_border, 2.5);
        assert_eq!(config.resource_slots, 1024);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = EngineConfig::from_toml_str("node_capacityy = 64").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bucket_count_must_be_power_of_two() {
        let err = EngineConfig::from_toml_str("resource_buckets = 100").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("resource_buckets")));
    }

    #[test]
    fn test_zero_scroll_speed_rejected() {
        let err = EngineConfig::from_toml_str("scroll_pixels_per_line = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/spark-ui.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
