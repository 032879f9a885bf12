//! Graph construction: manifest to concrete source graph.
//!
//! Builds the mapping from canonical node path to [`Source`] plus the
//! ordered target list, expanding glob-style declarations against the
//! project tree. Expansion happens once, before any resolution begins; the
//! resulting graph is input to the resolver (which only ever adds
//! synthesized defaults for undeclared filesystem nodes).
//!
//! # Wildcard semantics
//!
//! - A source declared under a pattern (`*_index`) is assigned to every
//!   regular file the pattern matches. Two patterns assigning the same
//!   concrete node is a [`IpubError::DuplicateSource`] error; an exact
//!   declaration shadows any pattern expansion of the same node.
//! - A target pattern expands against both the project tree and the
//!   declared source names (static sources have no file behind them), in
//!   sorted order within one pattern, patterns in declaration order.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::IpubError;
use crate::manifest::Manifest;
use crate::pattern::{PatternMatcher, is_pattern};
use crate::source::Source;
use crate::utils::{canonical_node_path, display_name};

/// A concrete, fully-expanded build graph.
#[derive(Debug)]
pub struct SourceGraph {
    root: PathBuf,
    sources: HashMap<PathBuf, Source>,
    names: HashMap<PathBuf, String>,
    targets: Vec<PathBuf>,
}

impl SourceGraph {
    /// Expand a manifest into a concrete graph rooted at `root` (the
    /// manifest's directory).
    pub fn from_manifest(manifest: &Manifest, root: &Path) -> Result<Self> {
        let root = std::fs::canonicalize(root)
            .with_context(|| format!("project root {} is not accessible", root.display()))?;

        let mut graph = Self {
            root: root.clone(),
            sources: HashMap::new(),
            names: HashMap::new(),
            targets: Vec::new(),
        };
        // Which declaration (exact name or pattern) assigned each node, for
        // duplicate reporting.
        let mut origins: HashMap<PathBuf, (String, bool)> = HashMap::new();

        // Exact declarations first: they shadow pattern expansions.
        for name in manifest.sources.keys().filter(|name| !is_pattern(name)) {
            let spec = manifest.follow_alias(name)?;
            let source = Source::from_spec(spec)?;
            let canonical = canonical_node_path(&root, name);
            if let Some((first, _)) = origins.get(&canonical) {
                return Err(IpubError::DuplicateSource {
                    name: name.clone(),
                    first: first.clone(),
                    second: name.clone(),
                }
                .into());
            }
            origins.insert(canonical.clone(), (name.clone(), true));
            graph.names.insert(canonical.clone(), name.clone());
            graph.sources.insert(canonical, source);
        }

        // Pattern declarations expand against the project tree.
        for pattern_name in manifest.sources.keys().filter(|name| is_pattern(name)) {
            let spec = manifest.follow_alias(pattern_name)?;
            let matcher = PatternMatcher::new(pattern_name)?;
            let mut matches = matcher.find_matches(&root)?;
            matches.sort();
            debug!("Pattern '{}' declared {} sources", pattern_name, matches.len());

            for relative in matches {
                let canonical = canonical_node_path(&root, &relative);
                match origins.get(&canonical) {
                    // An exact declaration wins over any pattern expansion
                    Some((_, true)) => continue,
                    Some((first, false)) => {
                        return Err(IpubError::DuplicateSource {
                            name: relative.to_string_lossy().into_owned(),
                            first: first.clone(),
                            second: pattern_name.clone(),
                        }
                        .into());
                    }
                    None => {}
                }
                origins.insert(canonical.clone(), (pattern_name.clone(), false));
                graph.names.insert(canonical.clone(), relative.to_string_lossy().into_owned());
                graph.sources.insert(canonical, Source::from_spec(spec)?);
            }
        }

        // Targets, in declaration order; each pattern's expansion sorted.
        for target in manifest.effective_targets() {
            if is_pattern(&target) {
                let matcher = PatternMatcher::new(&target)?;
                let mut expanded: Vec<(String, PathBuf)> = matcher
                    .find_matches(&root)?
                    .into_iter()
                    .map(|relative| {
                        let canonical = canonical_node_path(&root, &relative);
                        (relative.to_string_lossy().into_owned(), canonical)
                    })
                    .collect();
                // Declared logical names (e.g. static sources) have no file
                // behind them; match the pattern against the names too.
                for (canonical, name) in &graph.names {
                    if matcher.matches_name(name) {
                        expanded.push((name.clone(), canonical.clone()));
                    }
                }
                expanded.sort();
                expanded.dedup_by(|a, b| a.1 == b.1);
                if expanded.is_empty() {
                    warn!("Target pattern '{}' matched nothing", target);
                }
                graph.targets.extend(expanded.into_iter().map(|(_, canonical)| canonical));
            } else {
                let canonical = canonical_node_path(&root, &target);
                graph.names.entry(canonical.clone()).or_insert(target);
                graph.targets.push(canonical);
            }
        }

        Ok(graph)
    }

    /// The canonical project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The ordered canonical target list.
    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    /// Look up a node's declared source.
    pub fn get(&self, node: &Path) -> Option<&Source> {
        self.sources.get(node)
    }

    /// Insert a source for a node. Used by the resolver to memoize
    /// synthesized defaults; construction never overwrites declarations.
    pub fn insert(&mut self, node: PathBuf, source: Source) {
        self.sources.entry(node).or_insert(source);
    }

    /// Human-readable name for a node: its declared name when it has one,
    /// its root-relative path otherwise.
    pub fn node_name(&self, node: &Path) -> String {
        self.names.get(node).cloned().unwrap_or_else(|| display_name(&self.root, node))
    }

    /// Iterate over declared (name, source) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Source)> {
        self.sources.iter()
    }

    /// Number of declared sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the graph declares no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
