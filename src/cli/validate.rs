//! Validate the project configuration without publishing.
//!
//! Performs, in order:
//!
//! 1. Manifest parsing and eager schema validation
//! 2. A static cycle check over the declared reference graph
//! 3. With `--resolve`, a full dry-run resolution against the in-memory
//!    store, which exercises wildcard expansion, template formatting, and
//!    every filesystem lookup the real build would make
//!
//! ```bash
//! ipub validate
//! ipub validate --resolve
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::{project_root, resolve_manifest_path};
use crate::graph::SourceGraph;
use crate::manifest::Manifest;
use crate::resolver::{Environment, ReferenceGraph};
use crate::store::MemoryStore;

/// Command to validate the manifest and its reference graph.
#[derive(Args)]
pub struct ValidateCommand {
    /// Additionally dry-run the full resolution against an in-memory store
    #[arg(long)]
    resolve: bool,
}

impl ValidateCommand {
    /// Execute validation against the manifest at `manifest_path` (or the
    /// nearest `ipub.json`).
    pub async fn execute_with_manifest_path(self, manifest_path: Option<PathBuf>) -> Result<()> {
        let manifest_path = resolve_manifest_path(manifest_path)?;
        let manifest = Manifest::load(&manifest_path)?;
        println!(
            "{} manifest {} ({} sources)",
            "ok:".green().bold(),
            manifest_path.display(),
            manifest.sources.len()
        );

        let references = ReferenceGraph::from_manifest(&manifest)?;
        references.detect_cycles()?;
        println!(
            "{} reference graph is acyclic ({} nodes, {} references)",
            "ok:".green().bold(),
            references.node_count(),
            references.edge_count()
        );

        if self.resolve {
            let root = project_root(&manifest_path);
            let graph = SourceGraph::from_manifest(&manifest, &root)?;
            let mut environment = Environment::new(graph, MemoryStore::new());
            let results = environment.build().await?;
            println!(
                "{} dry-run resolved {} targets",
                "ok:".green().bold(),
                results.len()
            );
        }

        Ok(())
    }
}
