//! Glob pattern matching for wildcard node names.
//!
//! Manifest source and target names may be glob-style path patterns instead
//! of exact names (e.g. `*_index`, `pages/**/*.html`). This module provides
//! the matcher used to expand those patterns against the project tree before
//! any resolution begins.
//!
//! # Pattern Syntax
//!
//! Standard glob patterns are supported:
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components (recursive matching)
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match character sets and ranges
//!
//! # Expansion semantics
//!
//! Expansion returns regular files only, as paths relative to the searched
//! root, and does not follow symlinks. Directories become graph nodes when
//! referenced directly, not through patterns.

use anyhow::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::core::IpubError;

/// Whether a declared node name is a pattern rather than an exact name.
pub fn is_pattern(name: &str) -> bool {
    name.contains(['*', '?', '['])
}

/// Compiled glob pattern for discovering project files.
///
/// The pattern is compiled once at construction and can be matched against
/// individual names or expanded against a directory tree.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original: String,
}

impl PatternMatcher {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`IpubError::PatternError`] if the pattern contains invalid
    /// glob syntax.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern_str).map_err(|e| IpubError::PatternError {
            pattern: pattern_str.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            original: pattern_str.to_string(),
        })
    }

    /// The original pattern string.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Find all regular files under `base_path` matching the pattern.
    ///
    /// Paths are matched and returned relative to `base_path`. Symlinks are
    /// not followed.
    pub fn find_matches(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        debug!("Searching for pattern '{}' in {}", self.original, base_path.display());

        let mut matches = Vec::new();
        for entry in WalkDir::new(base_path)
            .follow_links(false)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(base_path) {
                let relative_str = relative.to_string_lossy();
                trace!("Checking path: {}", relative_str);
                if self.pattern.matches(&relative_str) {
                    matches.push(relative.to_path_buf());
                }
            }
        }

        debug!("Found {} matches for pattern '{}'", matches.len(), self.original);
        Ok(matches)
    }

    /// Check whether a single name matches the pattern, without touching the
    /// filesystem. Used to match patterns against declared logical names.
    pub fn matches_name(&self, name: &str) -> bool {
        self.pattern.matches(name)
    }
}
