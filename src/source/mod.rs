//! Graph node sources.
//!
//! A [`Source`] is the recipe for deriving one node's product identifier.
//! The set of node kinds is a closed enum dispatched by exhaustive matching,
//! so adding a kind is a compile-time-checked change. A source never stores
//! its own name; the resolver looks it up by name in the graph.
//!
//! Manifests declare `static`, `replace` and `regexp` sources. The
//! [`File`](Source::File) and [`Directory`](Source::Directory) variants are
//! synthesized by the resolver for nodes with no declaration, based on what
//! the node is on disk, and inserted into the graph so repeated lookups
//! reuse them.

use anyhow::Result;
use regex::bytes::Regex;

use crate::core::IpubError;
use crate::manifest::SourceSpec;
use crate::store::ProductId;

/// Default group template: the identifier token / first capture group.
const DEFAULT_TEMPLATE: &str = "{}";

/// Recipe for producing one node's product identifier.
#[derive(Debug, Clone)]
pub enum Source {
    /// A fixed, pre-supplied identifier. Never touches the store.
    Static {
        /// The identifier returned verbatim.
        product_id: ProductId,
    },

    /// Pass-through: the raw file is handed to the store untouched.
    /// Synthesized for undeclared regular files.
    File,

    /// Aggregate: the identifier is assembled from the resolved identifiers
    /// of the directory's immediate children. Synthesized for undeclared
    /// directories.
    Directory,

    /// Literal placeholder substitution over the node's bytes.
    ///
    /// Each rule maps a placeholder byte string to the name of the
    /// dependency whose resolved identifier replaces it. Zero rules is
    /// legal: the node's bytes are re-submitted unmodified.
    Replace {
        /// (placeholder bytes, dependency name) pairs.
        rules: Vec<(Vec<u8>, String)>,
    },

    /// Regular-expression driven substitution over the node's bytes.
    ///
    /// For every match of `pattern`, a dependency name is formatted from the
    /// match's capture groups via `name_template`, resolved, and the match
    /// is replaced by `replacement` with the identifier spliced in for `{}`.
    Regexp {
        /// Compiled pattern, one per source (compiled at graph build time).
        pattern: Regex,
        /// Replacement template; `{}` is the identifier token.
        replacement: String,
        /// Dependency-name template expanded from capture groups.
        name_template: String,
    },
}

impl Source {
    /// Build a source from a validated manifest description.
    ///
    /// `spec` must already have passed manifest validation; re-exports must
    /// have been followed to their defining spec.
    pub fn from_spec(spec: &SourceSpec) -> Result<Self> {
        match spec.kind.as_str() {
            "static" => Ok(Self::Static {
                product_id: ProductId::new(spec.product_id.clone().unwrap_or_default()),
            }),
            "replace" => Ok(Self::Replace {
                rules: spec
                    .replace
                    .as_ref()
                    .map(|rules| {
                        rules
                            .iter()
                            .map(|(placeholder, dep)| (placeholder.clone().into_bytes(), dep.clone()))
                            .collect()
                    })
                    .unwrap_or_default(),
            }),
            "regexp" => {
                let pattern_str = spec.pattern.as_deref().unwrap_or_default();
                let pattern = Regex::new(pattern_str).map_err(|e| IpubError::PatternError {
                    pattern: pattern_str.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Self::Regexp {
                    pattern,
                    replacement: spec
                        .replacement
                        .clone()
                        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
                    name_template: spec
                        .source
                        .clone()
                        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
                })
            }
            other => Err(IpubError::ManifestValidationError {
                reason: format!("unresolved re-export '{other}' reached source construction"),
            }
            .into()),
        }
    }

    /// Whether this source declares substitution rules, which directories do
    /// not support.
    pub fn has_rules(&self) -> bool {
        match self {
            Self::Static { .. } | Self::File | Self::Directory => false,
            Self::Replace { rules } => !rules.is_empty(),
            Self::Regexp { .. } => true,
        }
    }

    /// Short kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Static { .. } => "static",
            Self::File => "file",
            Self::Directory => "directory",
            Self::Replace { .. } => "replace",
            Self::Regexp { .. } => "regexp",
        }
    }
}
