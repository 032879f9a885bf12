//! On-disk project fixtures.

use tempfile::TempDir;

use crate::graph::SourceGraph;
use crate::manifest::Manifest;
use crate::resolver::Environment;
use crate::store::MemoryStore;
use std::path::Path;

/// A temporary project directory with files, optionally a manifest, and a
/// ready-made resolution environment over the in-memory store.
///
/// The fixture must outlive any environment built from it: resolution reads
/// project files from disk.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Create an empty project directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create fixture directory"),
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file (creating parent directories) and return `self` for
    /// chaining.
    pub fn file(&self, relative: &str, content: &[u8]) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture parents");
        }
        std::fs::write(path, content).expect("failed to write fixture file");
        self
    }

    /// Create a directory (and parents) and return `self` for chaining.
    pub fn mkdir(&self, relative: &str) -> &Self {
        std::fs::create_dir_all(self.dir.path().join(relative))
            .expect("failed to create fixture directory");
        self
    }

    /// Parse, validate and expand an inline manifest against this project.
    pub fn graph(&self, manifest_json: &str) -> SourceGraph {
        let manifest: Manifest =
            serde_json::from_str(manifest_json).expect("fixture manifest must parse");
        manifest.validate().expect("fixture manifest must validate");
        SourceGraph::from_manifest(&manifest, self.dir.path())
            .expect("fixture manifest must expand")
    }

    /// Build a resolution environment over the in-memory store.
    pub fn environment(&self, manifest_json: &str) -> Environment<MemoryStore> {
        Environment::new(self.graph(manifest_json), MemoryStore::new())
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
