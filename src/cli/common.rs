//! Helpers shared by CLI commands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::IpubError;
use crate::manifest::find_manifest;

/// Resolve the manifest location from an explicit `--manifest-path` or by
/// searching the current directory and its ancestors.
pub fn resolve_manifest_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            if path.is_file() {
                Ok(path)
            } else {
                Err(IpubError::ManifestNotFound.into())
            }
        }
        None => {
            let cwd = std::env::current_dir().context("failed to determine current directory")?;
            find_manifest(&cwd).ok_or_else(|| IpubError::ManifestNotFound.into())
        }
    }
}

/// The project root a manifest belongs to (its containing directory).
pub fn project_root(manifest_path: &Path) -> PathBuf {
    manifest_path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
