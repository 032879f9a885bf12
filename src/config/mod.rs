//! Global configuration management.
//!
//! ipub keeps user-wide settings out of the project manifest: the manifest
//! describes *what* to publish and is safe to commit, while the global
//! configuration describes *how this machine* reaches the store.
//!
//! # Location
//!
//! 1. `IPUB_CONFIG` environment variable, if set (essential for testing)
//! 2. `~/.ipub/config.toml`
//!
//! A missing file yields the default configuration; a malformed file is an
//! error (silently ignoring a typo would mask a broken setup).
//!
//! # Format
//!
//! ```toml
//! # Override the ipfs binary (defaults to `ipfs` in PATH)
//! ipfs-bin = "/opt/ipfs/ipfs"
//!
//! # Per-command timeout in seconds (defaults to 300)
//! store-timeout-secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::constants::{CONFIG_ENV_VAR, STORE_COMMAND_TIMEOUT};
use crate::core::IpubError;

/// User-wide settings loaded from `~/.ipub/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalConfig {
    /// Path or name of the `ipfs` binary to execute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_bin: Option<String>,

    /// Timeout in seconds for a single store command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_timeout_secs: Option<u64>,
}

impl GlobalConfig {
    /// Default configuration file location.
    pub fn default_path() -> Result<PathBuf, IpubError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".ipub").join("config.toml")).ok_or_else(|| {
            IpubError::ConfigError {
                message: "unable to determine home directory".to_string(),
            }
        })
    }

    /// Load the global configuration, defaulting when no file exists.
    pub fn load() -> Result<Self, IpubError> {
        let path = Self::default_path()?;
        if !path.exists() {
            debug!("No global config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| IpubError::ConfigError {
            message: format!("invalid config file {}: {e}", path.display()),
        })
    }

    /// The store command timeout, defaulting to
    /// [`STORE_COMMAND_TIMEOUT`](crate::constants::STORE_COMMAND_TIMEOUT).
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout_secs.map_or(STORE_COMMAND_TIMEOUT, Duration::from_secs)
    }
}
