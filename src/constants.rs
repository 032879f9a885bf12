//! Global constants used throughout the ipub codebase.
//!
//! Centralizes file names, environment variable names, and timeout
//! durations shared across modules.

use std::time::Duration;

/// Name of the project manifest file searched for in the project directory.
pub const MANIFEST_NAME: &str = "ipub.json";

/// Environment variable overriding the global configuration file path.
pub const CONFIG_ENV_VAR: &str = "IPUB_CONFIG";

/// Environment variable overriding the `ipfs` binary used by the store.
pub const IPFS_BIN_ENV_VAR: &str = "IPUB_IPFS_BIN";

/// Default timeout for a single `ipfs` command (5 minutes).
///
/// Adding a large directory tree or fetching content from the network can
/// take a while; the timeout exists so an unreachable daemon fails the build
/// with a diagnostic instead of hanging forever.
pub const STORE_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);
