//! Bridge configuration.
//!
//! Loaded from `bridge.toml`; every field has a default so a missing
//! file or empty table is a valid configuration.

use crate::error::{BridgeError, BridgeResult};
use crate::shm::DEFAULT_SEGMENT_NAME;
use serde::Deserialize;
use std::path::Path;

/// Default function for segment_name
fn default_segment_name() -> String {
    DEFAULT_SEGMENT_NAME.to_string()
}

/// Default function for poll_interval_ms
fn default_poll_interval_ms() -> u64 {
    1000
}

/// Configuration loaded from `bridge.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Shared memory segment name published by the producer.
    /// Must match the producer's published name exactly.
    #[serde(default = "default_segment_name")]
    pub segment_name: String,

    /// Refresh interval for the polling host, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            segment_name: default_segment_name(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl BridgeConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> BridgeResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| BridgeError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content)
    }

    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `segment_name` non-empty
    /// 2. `poll_interval_ms` > 0
    pub fn validate(&self) -> BridgeResult<()> {
        if self.segment_name.is_empty() {
            return Err(BridgeError::Config(
                "segment_name must not be empty".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(BridgeError::Config(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_track_the_producer_contract() {
        let config = BridgeConfig::default();
        assert_eq!(config.segment_name, "AIDA64_SensorValues");
        assert_eq!(config.poll_interval_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = BridgeConfig::from_toml("").unwrap();
        assert_eq!(config.segment_name, "AIDA64_SensorValues");
    }

    #[test]
    fn fields_override_defaults() {
        let config = BridgeConfig::from_toml(
            "segment_name = \"CustomSegment\"\npoll_interval_ms = 250\n",
        )
        .unwrap();
        assert_eq!(config.segment_name, "CustomSegment");
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let result = BridgeConfig::from_toml("poll_interval_ms = 0\n");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn empty_segment_name_is_rejected() {
        let result = BridgeConfig::from_toml("segment_name = \"\"\n");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn load_reads_a_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "segment_name = \"FileSegment\"").unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.segment_name, "FileSegment");
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = BridgeConfig::load(Path::new("/nonexistent/bridge.toml"));
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }
}
