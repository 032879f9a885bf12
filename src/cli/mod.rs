//! Command-line interface for ipub.
//!
//! Each command is implemented as a separate module with its own argument
//! structure and execution logic:
//!
//! - `init` - scaffold a new `ipub.json` manifest
//! - `build` - resolve the graph and publish every target
//! - `validate` - check the manifest and reference graph without publishing
//!
//! # Usage
//!
//! ```bash
//! # 1. Create a manifest
//! ipub init
//!
//! # 2. Check it over (static cycle check; --resolve dry-runs the build)
//! ipub validate --resolve
//!
//! # 3. Publish, printing the name -> identifier mapping as JSON
//! ipub build
//!
//! # Deterministic identifiers without an IPFS daemon
//! ipub build --dry-run
//! ```
//!
//! # Global options
//!
//! - `--verbose` / `--quiet` control log verbosity (the `RUST_LOG`
//!   environment variable takes precedence when set)
//! - `--manifest-path` points at an explicit `ipub.json` instead of
//!   searching the current directory and its ancestors

mod build;
pub mod common;
mod init;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Main CLI structure for ipub.
///
/// Global options are available to all subcommands; mutually exclusive
/// verbosity flags are validated by the parser.
#[derive(Parser)]
#[command(
    name = "ipub",
    about = "Content-addressed publisher - build and publish interlinked artifacts to IPFS",
    version,
    long_about = "ipub resolves a declarative graph of interlinked artifacts, rewrites each \
                  artifact's cross-references to the published addresses of its dependencies, \
                  and publishes the results to a content-addressed store."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to RUST_LOG=debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the manifest file (ipub.json)
    ///
    /// By default ipub searches the current directory and its ancestors.
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with an ipub.json manifest.
    Init(init::InitCommand),

    /// Resolve the graph and publish every target.
    Build(build::BuildCommand),

    /// Validate the manifest and reference graph without publishing.
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        self.init_tracing();
        match self.command {
            Commands::Init(cmd) => cmd.execute().await,
            Commands::Build(cmd) => cmd.execute_with_manifest_path(self.manifest_path).await,
            Commands::Validate(cmd) => cmd.execute_with_manifest_path(self.manifest_path).await,
        }
    }

    /// Install the tracing subscriber once, honoring `RUST_LOG` over the
    /// verbosity flags.
    fn init_tracing(&self) {
        let default_level = if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
