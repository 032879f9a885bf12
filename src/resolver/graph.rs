//! Static reference graph over declared sources.
//!
//! `validate` builds this graph from the manifest's `replace` rules before
//! any resolution happens, so reference cycles between declared sources are
//! reported without touching the store or the filesystem. Regexp sources
//! derive their dependency names from matched content and contribute no
//! static edges; cycles through them are still caught at resolution time by
//! the environment's active-resolution stack.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::core::IpubError;
use crate::manifest::Manifest;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet.
    White,
    /// Currently on the DFS stack.
    Gray,
    /// Fully visited.
    Black,
}

/// Directed graph of declared source references.
pub struct ReferenceGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl ReferenceGraph {
    /// Build the reference graph from a validated manifest.
    ///
    /// Every declared source becomes a node; each `replace` rule contributes
    /// an edge from the declaring source to the referenced dependency name.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, IpubError> {
        let mut graph = Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        };

        for (name, _) in &manifest.sources {
            graph.ensure_node(name);
            let spec = manifest.follow_alias(name)?;
            if let Some(rules) = &spec.replace {
                for dependency in rules.values() {
                    graph.add_reference(name, dependency);
                }
            }
        }

        Ok(graph)
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(name) {
            index
        } else {
            let index = self.graph.add_node(name.to_string());
            self.nodes.insert(name.to_string(), index);
            index
        }
    }

    fn add_reference(&mut self, from: &str, to: &str) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);
        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Number of nodes (declared sources plus referenced names).
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct references.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Detect reference cycles with a colored DFS.
    ///
    /// Returns [`IpubError::CircularDependency`] carrying the cycle path
    /// when one exists.
    pub fn detect_cycles(&self) -> Result<(), IpubError> {
        let mut colors: HashMap<NodeIndex, Color> = HashMap::new();
        for node in self.graph.node_indices() {
            colors.insert(node, Color::White);
        }

        let mut path: Vec<NodeIndex> = Vec::new();
        for node in self.graph.node_indices() {
            if colors[&node] == Color::White
                && let Some((cycle, repeated)) = self.dfs_visit(node, &mut colors, &mut path)
            {
                return Err(IpubError::CircularDependency {
                    stack: cycle.iter().map(|&idx| self.graph[idx].clone()).collect(),
                    repeated: self.graph[repeated].clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the path from the cycle's entry point plus the repeated node.
    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<(Vec<NodeIndex>, NodeIndex)> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    let start = path.iter().position(|&n| n == neighbor).unwrap_or(0);
                    return Some((path[start..].to_vec(), neighbor));
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }
}
