//! Canonical node-name handling.
//!
//! Graph node names are filesystem paths or logical names. Two syntactically
//! different spellings of one file (`./a.html`, `sub/../a.html`, a symlink)
//! must collide in the resolver's cache and in cycle detection, so every name
//! is reduced to a canonical absolute path before lookup: joined to the
//! project root, then resolved through [`std::fs::canonicalize`] when the
//! path exists on disk, or lexically normalized when it does not (logical
//! names such as static sources never exist on disk).

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into their
/// parent. Does not touch the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep leading .. only when there is nothing to fold
                if matches!(components.last(), None | Some(Component::ParentDir)) {
                    components.push(component);
                } else {
                    components.pop();
                }
            }
            c => components.push(c),
        }
    }
    components.iter().collect()
}

/// Reduce a node name to its canonical form relative to `root`.
///
/// Relative names are joined to `root` first. If the resulting path exists,
/// symlinks and relative segments are resolved through the filesystem;
/// otherwise the path is normalized lexically so that logical names still
/// canonicalize consistently.
pub fn canonical_node_path(root: &Path, name: impl AsRef<Path>) -> PathBuf {
    let name = name.as_ref();
    let joined = if name.is_absolute() {
        name.to_path_buf()
    } else {
        root.join(name)
    };
    std::fs::canonicalize(&joined).unwrap_or_else(|_| normalize_path(&joined))
}

/// Human-readable display name for a canonical node path: relative to `root`
/// when the node lives under it, absolute otherwise.
pub fn display_name(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => {
            relative.to_string_lossy().into_owned()
        }
        Ok(_) => ".".to_string(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
