//! Shared helpers for the external test suites.
//!
//! These suites exercise ipub as an external consumer: projects are real
//! directories on disk, manifests are loaded through [`Manifest::load`], and
//! resolution runs against the public [`MemoryStore`].

#![allow(dead_code)]

use ipub::constants::MANIFEST_NAME;
use ipub::graph::SourceGraph;
use ipub::manifest::Manifest;
use ipub::resolver::Environment;
use ipub::store::MemoryStore;
use std::path::Path;
use tempfile::TempDir;

/// Create a project directory containing `files` (relative path, bytes).
pub fn project(files: &[(&str, &[u8])]) -> TempDir {
    let dir = TempDir::new().expect("failed to create project directory");
    for (relative, content) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parents");
        }
        std::fs::write(path, content).expect("failed to write project file");
    }
    dir
}

/// Write the project manifest into `root`.
pub fn write_manifest(root: &Path, json: &str) {
    std::fs::write(root.join(MANIFEST_NAME), json).expect("failed to write manifest");
}

/// Load the manifest from `root` and build a memory-store environment.
pub fn load_environment(root: &Path) -> Environment<MemoryStore> {
    let manifest = Manifest::load(&root.join(MANIFEST_NAME)).expect("manifest must load");
    let graph = SourceGraph::from_manifest(&manifest, root).expect("graph must expand");
    Environment::new(graph, MemoryStore::new())
}
