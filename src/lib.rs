//! ipub - content-addressed publisher
//!
//! A declarative build engine that computes a content-addressed identifier
//! for each entry in a named dependency graph, where entries are files,
//! directories, or templates referencing each other's computed identifiers.
//! It publishes a set of interlinked artifacts (e.g. an HTML page referencing
//! other generated files) into IPFS, rewriting each artifact's embedded
//! cross-references to the resolved addresses of its dependencies before
//! publishing.
//!
//! # Architecture Overview
//!
//! A build walks three stages:
//!
//! 1. The [`manifest`] is parsed and validated eagerly, then expanded by
//!    [`graph`] into a concrete source graph: wildcard declarations are
//!    matched against the project tree, re-exports are followed, and targets
//!    are fixed in declaration order.
//! 2. The [`resolver`] resolves each target recursively, memoizing every
//!    node's identifier, detecting reference cycles with an explicit
//!    resolution stack, and assembling directory identifiers bottom-up from
//!    their children.
//! 3. Each leaf hands its content to the [`store`], either the system `ipfs`
//!    binary or a deterministic in-memory store for dry runs.
//!
//! # Core Modules
//!
//! - [`manifest`] - manifest parsing and validation (ipub.json)
//! - [`graph`] - wildcard expansion into the concrete source graph
//! - [`source`] - the closed set of node kinds (static, file, directory,
//!   replace, regexp)
//! - [`resolver`] - recursive resolution, memoization, and cycle detection
//! - [`templating`] - placeholder substitution and group templates
//! - [`store`] - the content-addressed store capability and its
//!   implementations
//!
//! # Supporting Modules
//!
//! - [`cli`] - command-line interface (`init`, `build`, `validate`)
//! - [`config`] - global configuration (~/.ipub/config.toml)
//! - [`core`] - error types and user-facing error presentation
//! - [`pattern`] - glob matching for wildcard node names
//! - [`utils`] - canonical path handling
//!
//! # Manifest Format (ipub.json)
//!
//! ```json
//! {
//!     "sources": {
//!         "index.html": {
//!             "type": "replace",
//!             "replace": { "<<APP>>": "app.js" }
//!         },
//!         "app.js": {
//!             "type": "regexp",
//!             "pattern": "load\\('([^']*)\\.code'\\)",
//!             "replacement": "load('/ipfs/{}')",
//!             "source": "modules/{}.code"
//!         },
//!         "pinned.bin": { "type": "static", "product_id": "QmShhh" }
//!     },
//!     "targets": ["index.html"]
//! }
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use ipub::graph::SourceGraph;
//! use ipub::manifest::Manifest;
//! use ipub::resolver::Environment;
//! use ipub::store::MemoryStore;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let manifest = Manifest::load(Path::new("ipub.json"))?;
//! let graph = SourceGraph::from_manifest(&manifest, Path::new("."))?;
//! let mut environment = Environment::new(graph, MemoryStore::new());
//! for (name, id) in environment.build().await? {
//!     println!("{name}: {id}");
//! }
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod graph;
pub mod manifest;
pub mod pattern;
pub mod resolver;
pub mod source;
pub mod store;
pub mod templating;

// Supporting modules
pub mod utils;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
