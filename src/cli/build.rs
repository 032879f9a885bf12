//! Build and publish the project graph.
//!
//! Loads the manifest, expands it into a concrete graph, resolves every
//! target, and prints the name to identifier mapping as pretty-printed JSON
//! with sorted keys, so successive runs diff cleanly.
//!
//! ```bash
//! ipub build
//! ipub build --dry-run          # deterministic ids, no daemon required
//! ipub build --manifest-path ../site/ipub.json
//! ```
//!
//! Any failure (cycle, missing source, store error) aborts the whole build
//! with a non-zero exit and no partial output.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use super::common::{project_root, resolve_manifest_path};
use crate::config::GlobalConfig;
use crate::graph::SourceGraph;
use crate::manifest::Manifest;
use crate::resolver::Environment;
use crate::store::{ContentStore, IpfsStore, MemoryStore};

/// Command to build and publish every target in the manifest.
#[derive(Args)]
pub struct BuildCommand {
    /// Compute identifiers with a deterministic in-memory store instead of
    /// publishing to IPFS
    #[arg(long)]
    dry_run: bool,
}

impl BuildCommand {
    /// Execute the build against the manifest at `manifest_path` (or the
    /// nearest `ipub.json`).
    pub async fn execute_with_manifest_path(self, manifest_path: Option<PathBuf>) -> Result<()> {
        let manifest_path = resolve_manifest_path(manifest_path)?;
        let root = project_root(&manifest_path);
        debug!("Building project at {}", root.display());

        let manifest = Manifest::load(&manifest_path)?;
        let graph = SourceGraph::from_manifest(&manifest, &root)?;

        let report = if self.dry_run {
            run_build(graph, MemoryStore::new()).await?
        } else {
            let config = GlobalConfig::load()?;
            let store =
                IpfsStore::with_overrides(config.ipfs_bin.clone(), Some(config.store_timeout()));
            run_build(graph, store).await?
        };

        println!("{report}");
        Ok(())
    }
}

/// Resolve all targets and render the sorted-key JSON report.
async fn run_build<S: ContentStore>(graph: SourceGraph, store: S) -> Result<String> {
    let mut environment = Environment::new(graph, store);
    let results = environment.build().await?;
    Ok(serde_json::to_string_pretty(&results)?)
}
