//! IPFS-backed content store wrapping the system `ipfs` command.
//!
//! Like Cargo's `git-fetch-with-cli`, ipub shells out to the system binary
//! instead of embedding a protocol implementation. This keeps the tool
//! compatible with whatever daemon, repo configuration and credentials the
//! user already has, and makes failures debuggable with the same commands a
//! user would run by hand.
//!
//! [`IpfsCommand`] is a small typed builder over [`tokio::process::Command`]
//! providing consistent timeout handling, output capture, tracing, and typed
//! error mapping. [`IpfsStore`] implements [`ContentStore`] on top of it:
//!
//! - `add_data` pipes bytes to `ipfs add -Q`
//! - `add_path` runs `ipfs add -Q -r <path>`
//! - `get` runs `ipfs get -o <dest> <id>`
//!
//! The `-Q` flag makes `ipfs add` print only the final identifier, which is
//! captured and trimmed into a [`ProductId`].

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::{ContentStore, ProductId};
use crate::constants::{IPFS_BIN_ENV_VAR, STORE_COMMAND_TIMEOUT};
use crate::core::IpubError;

/// Builder for constructing and executing `ipfs` commands.
///
/// Defaults: output captured, 5-minute timeout, binary resolved from the
/// `IPUB_IPFS_BIN` environment variable falling back to `ipfs` in `PATH`.
pub struct IpfsCommand {
    bin: String,
    args: Vec<String>,
    stdin_data: Option<Vec<u8>>,
    timeout_duration: Option<Duration>,
}

impl Default for IpfsCommand {
    fn default() -> Self {
        Self {
            bin: std::env::var(IPFS_BIN_ENV_VAR).unwrap_or_else(|_| "ipfs".to_string()),
            args: Vec::new(),
            stdin_data: None,
            timeout_duration: Some(STORE_COMMAND_TIMEOUT),
        }
    }
}

impl IpfsCommand {
    /// Create a command builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the binary to execute (from configuration).
    pub fn bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Pipe `data` to the child's stdin.
    pub fn stdin_data(mut self, data: Vec<u8>) -> Self {
        self.stdin_data = Some(data);
        self
    }

    /// Override the timeout (`None` disables it).
    pub fn timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Execute the command and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// - [`IpubError::StoreNotFound`] if the binary cannot be spawned
    /// - [`IpubError::StoreCommandError`] on non-zero exit or timeout
    pub async fn execute_stdout(self) -> Result<String> {
        let operation = self.args.first().cloned().unwrap_or_else(|| "unknown".to_string());
        let full_args = self.args.clone();

        trace!(target: "ipfs", "Executing: {} {}", self.bin, full_args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&self.args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(if self.stdin_data.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::Error::from(IpubError::StoreNotFound)
            } else {
                anyhow::Error::from(e).context(format!("failed to spawn {}", self.bin))
            }
        })?;

        if let Some(data) = self.stdin_data {
            let mut stdin = child.stdin.take().context("child stdin unavailable")?;
            stdin.write_all(&data).await.context("failed to write to ipfs stdin")?;
            // Close stdin so `ipfs add` sees end-of-input
            drop(stdin);
        }

        let output_future = child.wait_with_output();
        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => {
                    result.with_context(|| format!("failed to execute ipfs {operation}"))?
                }
                Err(_) => {
                    return Err(IpubError::StoreCommandError {
                        operation,
                        stderr: format!(
                            "ipfs command timed out after {} seconds; check that the daemon is reachable",
                            duration.as_secs()
                        ),
                    }
                    .into());
                }
            }
        } else {
            output_future.await.with_context(|| format!("failed to execute ipfs {operation}"))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            debug!(
                target: "ipfs",
                "Command failed with exit code {:?}: ipfs {}",
                output.status.code(),
                full_args.join(" ")
            );
            return Err(IpubError::StoreCommandError { operation, stderr }.into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !stdout.is_empty() {
            trace!(target: "ipfs", "ipfs {} -> {}", operation, stdout);
        }
        Ok(stdout)
    }

    /// Execute the command, discarding stdout.
    pub async fn execute_success(self) -> Result<()> {
        self.execute_stdout().await.map(|_| ())
    }
}

/// Content store backed by the system `ipfs` binary.
#[derive(Debug, Clone)]
pub struct IpfsStore {
    bin: Option<String>,
    timeout: Option<Duration>,
}

impl IpfsStore {
    /// Create a store using the default binary resolution and timeout.
    pub fn new() -> Self {
        Self {
            bin: None,
            timeout: Some(STORE_COMMAND_TIMEOUT),
        }
    }

    /// Create a store with explicit binary and timeout overrides, typically
    /// sourced from the global configuration.
    pub fn with_overrides(bin: Option<String>, timeout: Option<Duration>) -> Self {
        Self { bin, timeout }
    }

    fn command(&self) -> IpfsCommand {
        let mut cmd = IpfsCommand::new().timeout(self.timeout);
        if let Some(ref bin) = self.bin {
            cmd = cmd.bin(bin.clone());
        }
        cmd
    }
}

impl Default for IpfsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for IpfsStore {
    async fn add_data(&self, data: Vec<u8>) -> Result<ProductId> {
        debug!(target: "ipfs", "Adding {} bytes of data", data.len());
        let id = self.command().args(["add", "-Q"]).stdin_data(data).execute_stdout().await?;
        Ok(ProductId::new(id))
    }

    async fn add_path(&self, path: &Path) -> Result<ProductId> {
        debug!(target: "ipfs", "Adding path {}", path.display());
        let id = self
            .command()
            .args(["add", "-Q", "-r"])
            .arg(path.to_string_lossy())
            .execute_stdout()
            .await?;
        Ok(ProductId::new(id))
    }

    async fn get(&self, id: &ProductId, dest: &Path) -> Result<()> {
        debug!(target: "ipfs", "Getting {} into {}", id, dest.display());
        self.command()
            .args(["get", "-o"])
            .arg(dest.to_string_lossy())
            .arg(id.as_str())
            .execute_success()
            .await
    }
}
