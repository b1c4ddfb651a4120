//! sync::config
//!
//! Synchronization configuration schema and loading.
//!
//! # Overview
//!
//! Two knobs govern the confirmation protocol:
//!
//! - `enabled` - whether the development channel is active in the current
//!   runtime context. When false, every confirmed write degrades to a
//!   synchronous local-only merge. Production builds run with this off;
//!   the development host turns it on.
//! - `ack_timeout_ms` - how long a confirmed write waits for the host's
//!   acknowledgment before failing.
//!
//! Configuration can be embedded in a host's own TOML file and parsed with
//! [`SyncConfig::from_toml_str`], or loaded from a standalone file with
//! [`SyncConfig::load`]. Parsing is strict: unknown keys are rejected.
//!
//! # Example
//!
//! ```
//! use stagelink::sync::SyncConfig;
//!
//! let config = SyncConfig::default();
//! assert!(config.enabled);
//! assert_eq!(config.ack_timeout_ms, 1000);
//!
//! let config = SyncConfig::from_toml_str("ack_timeout_ms = 250").unwrap();
//! assert_eq!(config.ack_timeout().as_millis(), 250);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default acknowledgment timeout in milliseconds.
pub const DEFAULT_ACK_TIMEOUT_MS: u64 = 1000;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseError(String),
}

/// Synchronization configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Whether the development channel is active.
    pub enabled: bool,

    /// Acknowledgment timeout for confirmed writes, in milliseconds.
    pub ack_timeout_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ack_timeout_ms: DEFAULT_ACK_TIMEOUT_MS,
        }
    }
}

impl SyncConfig {
    /// Create a configuration with synchronization disabled.
    ///
    /// Every confirmed write resolves after the local merge, without any
    /// channel interaction.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Get the acknowledgment timeout as a [`Duration`].
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] on malformed TOML or unknown keys.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] if the file cannot be read
    /// - [`ConfigError::ParseError`] on malformed TOML or unknown keys
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values() {
        let config = SyncConfig::default();
        assert!(config.enabled);
        assert_eq!(config.ack_timeout_ms, DEFAULT_ACK_TIMEOUT_MS);
        assert_eq!(config.ack_timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn disabled_constructor() {
        let config = SyncConfig::disabled();
        assert!(!config.enabled);
        assert_eq!(config.ack_timeout_ms, DEFAULT_ACK_TIMEOUT_MS);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = SyncConfig::from_toml_str("enabled = false").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.ack_timeout_ms, DEFAULT_ACK_TIMEOUT_MS);
    }

    #[test]
    fn parses_full_toml() {
        let config = SyncConfig::from_toml_str(
            "enabled = true\n\
             ack_timeout_ms = 250\n",
        )
        .unwrap();
        assert!(config.enabled);
        assert_eq!(config.ack_timeout_ms, 250);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = SyncConfig::from_toml_str("ack_timeout = 250");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = SyncConfig::from_toml_str("enabled = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ack_timeout_ms = 500").unwrap();

        let config = SyncConfig::load(file.path()).unwrap();
        assert_eq!(config.ack_timeout_ms, 500);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let result = SyncConfig::load("/nonexistent/stagelink.toml");
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
