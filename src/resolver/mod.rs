//! Recursive build-graph resolution.
//!
//! [`Environment`] owns the expanded source graph, a per-instance
//! memoization cache, and an explicit active-resolution stack. Resolution is
//! single-threaded and recursive: resolving a templated node resolves its
//! dependencies first, bottoming out at store calls for plain files and
//! static identifiers.
//!
//! # Guarantees
//!
//! - **Single computation**: a node's identifier is computed at most once per
//!   environment. Two references to the same name never trigger two store
//!   calls and always yield the same identifier. The cache is written at most
//!   once per node and is owned by this environment alone; a fresh
//!   environment starts empty.
//! - **Cycle detection**: the active-resolution stack is an explicit,
//!   inspectable sequence held in the environment, not the host call stack.
//!   A name already on the stack fails the build with the full ordered chain.
//! - **Determinism**: directory children are resolved in sorted name order
//!   and targets in declaration order, so the sequence of distinct store
//!   submissions is reproducible for a given graph.
//!
//! # Directory aggregation
//!
//! A directory's identifier is assembled bottom-up: each child is resolved
//! by name (its path joined to the parent), the resolved contents are
//! retrieved into a fresh temporary directory, and the staged directory is
//! submitted whole. The temporary directory is removed on every exit path,
//! including errors. Cost is proportional to descendants times store
//! round-trips; this is an accepted ceiling, kept for the simplicity of
//! never mutating the original tree.

pub mod graph;

pub use graph::ReferenceGraph;

use anyhow::{Context, Result};
use futures::future::LocalBoxFuture;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::IpubError;
use crate::graph::SourceGraph;
use crate::source::Source;
use crate::store::{ContentStore, ProductId};
use crate::templating::{expand_groups, expand_replacement, substitute_literals};
use crate::utils::canonical_node_path;

/// Resolution environment: graph, memoization cache, active stack, store.
///
/// An environment is typically created fresh per build. Reusing one across
/// builds is legal and simply keeps the cache warm.
pub struct Environment<S> {
    graph: SourceGraph,
    store: S,
    cache: HashMap<PathBuf, ProductId>,
    stack: Vec<PathBuf>,
}

impl<S: ContentStore> Environment<S> {
    /// Create an environment over an expanded graph and a store.
    pub fn new(graph: SourceGraph, store: S) -> Self {
        Self {
            graph,
            store,
            cache: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// The store this environment publishes into.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The graph being resolved.
    pub fn graph(&self) -> &SourceGraph {
        &self.graph
    }

    /// Resolve every target and return the display-name to identifier
    /// mapping, sorted by name for reproducible output.
    ///
    /// Targets share this environment's cache, so overlapping subgraphs are
    /// still resolved once. Any failure aborts the whole build; there is no
    /// partial result.
    pub async fn build(&mut self) -> Result<BTreeMap<String, ProductId>> {
        let targets = self.graph.targets().to_vec();
        debug!("Building {} targets", targets.len());
        let mut results = BTreeMap::new();
        for target in targets {
            let id = self.resolve(&target).await?;
            results.insert(self.graph.node_name(&target), id);
        }
        Ok(results)
    }

    /// Resolve one node to its product identifier.
    ///
    /// The name is canonicalized first so different spellings of one file
    /// share a cache entry and collide in cycle detection. Recursion is
    /// explicit and boxed; the cycle check runs against the environment's
    /// own stack, bounding graph depth independent of the native call stack.
    pub fn resolve<'a>(&'a mut self, node: &Path) -> LocalBoxFuture<'a, Result<ProductId>> {
        let node = canonical_node_path(self.graph.root(), node);
        Box::pin(async move {
            if let Some(id) = self.cache.get(&node) {
                trace!(target: "resolver", "cache hit for {}", node.display());
                return Ok(id.clone());
            }

            if self.stack.contains(&node) {
                return Err(IpubError::CircularDependency {
                    stack: self.stack.iter().map(|n| self.graph.node_name(n)).collect(),
                    repeated: self.graph.node_name(&node),
                }
                .into());
            }

            self.stack.push(node.clone());
            let result = self.resolve_uncached(&node).await;
            self.stack.pop();

            let id = result?;
            self.cache.insert(node, id.clone());
            Ok(id)
        })
    }

    async fn resolve_uncached(&mut self, node: &Path) -> Result<ProductId> {
        let source = match self.graph.get(node) {
            Some(source) => source.clone(),
            None => {
                let synthesized = self.synthesize_default(node)?;
                self.graph.insert(node.to_path_buf(), synthesized.clone());
                synthesized
            }
        };
        trace!(target: "resolver", "resolving {} as {}", node.display(), source.kind());

        match source {
            Source::Static { product_id } => Ok(product_id),
            Source::File => self.store.add_path(node).await,
            Source::Directory => self.resolve_directory(node).await,
            Source::Replace { rules } => {
                let meta = self.node_metadata(node)?;
                if meta.is_dir() {
                    // A directory may carry an (empty) declaration; actual
                    // substitution rules on a directory are unsupported.
                    if rules.is_empty() {
                        return self.resolve_directory(node).await;
                    }
                    return Err(self.directory_substitution_error(node));
                }
                self.resolve_replace(node, &rules).await
            }
            Source::Regexp {
                pattern,
                replacement,
                name_template,
            } => {
                let meta = self.node_metadata(node)?;
                if meta.is_dir() {
                    return Err(self.directory_substitution_error(node));
                }
                self.resolve_regexp(node, &pattern, &replacement, &name_template).await
            }
        }
    }

    /// Default source for a node with no declaration, from what it is on
    /// disk.
    fn synthesize_default(&self, node: &Path) -> Result<Source> {
        match std::fs::metadata(node) {
            Ok(meta) if meta.is_dir() => Ok(Source::Directory),
            Ok(_) => Ok(Source::File),
            Err(_) => Err(IpubError::SourceNotFound {
                name: self.graph.node_name(node),
            }
            .into()),
        }
    }

    fn node_metadata(&self, node: &Path) -> Result<std::fs::Metadata> {
        std::fs::metadata(node).map_err(|_| {
            IpubError::SourceNotFound {
                name: self.graph.node_name(node),
            }
            .into()
        })
    }

    fn directory_substitution_error(&self, node: &Path) -> anyhow::Error {
        IpubError::DirectorySubstitution {
            path: self.graph.node_name(node),
        }
        .into()
    }

    /// Literal substitution: resolve each referenced dependency, replace all
    /// placeholders in one pass, submit the rendered bytes.
    async fn resolve_replace(
        &mut self,
        node: &Path,
        rules: &[(Vec<u8>, String)],
    ) -> Result<ProductId> {
        let data = tokio::fs::read(node)
            .await
            .with_context(|| format!("failed to read {}", node.display()))?;

        let mut resolved = Vec::with_capacity(rules.len());
        for (placeholder, dependency) in rules {
            let id = self.resolve(Path::new(dependency)).await?;
            resolved.push((placeholder.clone(), id.as_bytes().to_vec()));
        }

        let rendered = substitute_literals(&data, &resolved)?;
        self.store.add_data(rendered).await
    }

    /// Regexp substitution: for every match, format a dependency name from
    /// the capture groups, resolve it, and splice the identifier back
    /// through the replacement template.
    async fn resolve_regexp(
        &mut self,
        node: &Path,
        pattern: &regex::bytes::Regex,
        replacement: &str,
        name_template: &str,
    ) -> Result<ProductId> {
        let data = tokio::fs::read(node)
            .await
            .with_context(|| format!("failed to read {}", node.display()))?;

        let mut out = Vec::with_capacity(data.len());
        let mut last = 0;
        for caps in pattern.captures_iter(&data) {
            let Some(whole) = caps.get(0) else { continue };
            let dependency = expand_groups(name_template, &caps)?;
            let id = self.resolve(Path::new(&dependency)).await?;
            out.extend_from_slice(&data[last..whole.start()]);
            out.extend_from_slice(&expand_replacement(replacement, &caps, &id)?);
            last = whole.end();
        }
        out.extend_from_slice(&data[last..]);

        self.store.add_data(out).await
    }

    /// Assemble a directory identifier from its children's identifiers.
    async fn resolve_directory(&mut self, node: &Path) -> Result<ProductId> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(node)
            .await
            .with_context(|| format!("failed to read directory {}", node.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name());
        }
        // Sorted order keeps the store-call sequence deterministic
        names.sort();

        let mut children = Vec::with_capacity(names.len());
        for name in names {
            let id = self.resolve(&node.join(&name)).await?;
            children.push((name, id));
        }

        // Stage the assembled tree and submit it whole; the staging
        // directory is removed on every exit path, including errors.
        let staging = tempfile::tempdir().context("failed to create staging directory")?;
        for (name, id) in &children {
            self.store.get(id, &staging.path().join(name)).await?;
        }
        self.store.add_path(staging.path()).await
    }
}
