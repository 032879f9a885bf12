//! Manifest parsing and validation (`ipub.json`).
//!
//! The manifest is the declarative description of a publishing graph. It is
//! a JSON document with two top-level keys:
//!
//! ```json
//! {
//!     "sources": {
//!         "index.html": {
//!             "type": "replace",
//!             "replace": { "<<STYLE>>": "style.css" }
//!         },
//!         "app.js": {
//!             "type": "regexp",
//!             "pattern": "load\\('([^']*)\\.code'\\)",
//!             "replacement": "load('/ipfs/{}')",
//!             "source": "modules/{}.code"
//!         },
//!         "pinned": { "type": "static", "product_id": "QmShhh" },
//!         "about.html": { "type": "index.html" }
//!     },
//!     "targets": ["index.html"]
//! }
//! ```
//!
//! - `sources` maps node names (paths relative to the manifest directory, or
//!   glob patterns) to tagged source descriptions. A `type` naming another
//!   declared source re-exports that source's definition under a new name.
//! - `targets` is the ordered list of names (or patterns) to resolve;
//!   omitted, it defaults to every declared source name in sorted order.
//!
//! Recognized `type` values and their fields are validated eagerly at load
//! time: an invalid manifest never reaches resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::MANIFEST_NAME;
use crate::core::IpubError;

/// A parsed, validated project manifest.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Node name (or pattern) to source description.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSpec>,

    /// Ordered list of names (or patterns) to resolve. `None` means all
    /// declared source names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
}

/// Tagged source description as written in the manifest.
///
/// The `type` field selects the variant; the remaining fields are
/// type-specific and checked by [`Manifest::validate`]. Field selection is
/// deliberately not encoded as a serde enum: a `type` may also name another
/// declared source (a re-export), which no closed tag set can express.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    /// One of `static`, `replace`, `regexp`, or the name of another declared
    /// source.
    #[serde(rename = "type")]
    pub kind: String,

    /// `static`: the fixed product identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// `replace`: literal placeholder to dependency name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<BTreeMap<String, String>>,

    /// `regexp`: the pattern matched against the node's bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// `regexp`: replacement template; `{}` is the identifier token.
    /// Defaults to `{}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,

    /// `regexp`: dependency-name template expanded from capture groups.
    /// Defaults to `{}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SourceSpec {
    fn validation_error(name: &str, reason: impl Into<String>) -> IpubError {
        IpubError::ManifestValidationError {
            reason: format!("source '{name}': {}", reason.into()),
        }
    }

    /// Check that exactly the fields for this spec's `type` are present.
    fn validate(&self, name: &str, declared: &BTreeMap<String, SourceSpec>) -> Result<(), IpubError> {
        let forbid = |present: bool, field_name: &str| -> Result<(), IpubError> {
            if present {
                Err(Self::validation_error(
                    name,
                    format!("field '{field_name}' is not valid for type '{}'", self.kind),
                ))
            } else {
                Ok(())
            }
        };

        match self.kind.as_str() {
            "static" => {
                if self.product_id.is_none() {
                    return Err(Self::validation_error(name, "type 'static' requires 'product_id'"));
                }
                forbid(self.replace.is_some(), "replace")?;
                forbid(self.pattern.is_some(), "pattern")?;
                forbid(self.replacement.is_some(), "replacement")?;
                forbid(self.source.is_some(), "source")?;
            }
            "replace" => {
                forbid(self.product_id.is_some(), "product_id")?;
                forbid(self.pattern.is_some(), "pattern")?;
                forbid(self.replacement.is_some(), "replacement")?;
                forbid(self.source.is_some(), "source")?;
            }
            "regexp" => {
                let Some(ref pattern) = self.pattern else {
                    return Err(Self::validation_error(name, "type 'regexp' requires 'pattern'"));
                };
                regex::bytes::Regex::new(pattern).map_err(|e| {
                    Self::validation_error(name, format!("invalid pattern '{pattern}': {e}"))
                })?;
                forbid(self.product_id.is_some(), "product_id")?;
                forbid(self.replace.is_some(), "replace")?;
            }
            other => {
                // Re-export of another declared source
                if !declared.contains_key(other) {
                    return Err(Self::validation_error(
                        name,
                        format!("unrecognized type '{other}' (not a built-in type or a declared source)"),
                    ));
                }
                if self.product_id.is_some()
                    || self.replace.is_some()
                    || self.pattern.is_some()
                    || self.replacement.is_some()
                    || self.source.is_some()
                {
                    return Err(Self::validation_error(
                        name,
                        format!("a re-export of '{other}' cannot carry fields of its own"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn is_alias(&self) -> bool {
        !matches!(self.kind.as_str(), "static" | "replace" | "regexp")
    }
}

impl Manifest {
    /// Parse and validate a manifest file.
    ///
    /// # Errors
    ///
    /// - [`IpubError::ManifestNotFound`] if the file does not exist
    /// - [`IpubError::ManifestParseError`] on malformed JSON or unknown fields
    /// - [`IpubError::ManifestValidationError`] on schema violations
    pub fn load(path: &Path) -> Result<Self, IpubError> {
        if !path.exists() {
            return Err(IpubError::ManifestNotFound);
        }
        let content = std::fs::read_to_string(path)?;
        let manifest: Self =
            serde_json::from_str(&content).map_err(|e| IpubError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;
        manifest.validate()?;
        debug!("Loaded manifest with {} sources from {}", manifest.sources.len(), path.display());
        Ok(manifest)
    }

    /// Validate every source description eagerly.
    pub fn validate(&self) -> Result<(), IpubError> {
        for (name, spec) in &self.sources {
            spec.validate(name, &self.sources)?;
        }
        // Alias chains must terminate at a built-in type
        for name in self.sources.keys() {
            self.follow_alias(name)?;
        }
        Ok(())
    }

    /// Follow a (possibly aliased) source to its defining spec.
    pub fn follow_alias(&self, name: &str) -> Result<&SourceSpec, IpubError> {
        let mut seen = vec![name.to_string()];
        let mut current = self.sources.get(name).ok_or_else(|| {
            IpubError::ManifestValidationError {
                reason: format!("source '{name}' is not declared"),
            }
        })?;
        while current.is_alias() {
            let target = current.kind.as_str();
            if seen.iter().any(|s| s == target) {
                return Err(IpubError::ManifestValidationError {
                    reason: format!(
                        "re-export cycle: {} -> {target}",
                        seen.join(" -> ")
                    ),
                });
            }
            seen.push(target.to_string());
            current = self.sources.get(target).ok_or_else(|| {
                IpubError::ManifestValidationError {
                    reason: format!("source '{name}' re-exports undeclared '{target}'"),
                }
            })?;
        }
        Ok(current)
    }

    /// The effective target list: declared targets, or all declared source
    /// names in sorted order.
    pub fn effective_targets(&self) -> Vec<String> {
        match &self.targets {
            Some(targets) => targets.clone(),
            // BTreeMap iteration is already sorted, giving a stable default
            None => self.sources.keys().cloned().collect(),
        }
    }

    /// Serialize back to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, IpubError> {
        serde_json::to_string_pretty(self).map_err(|e| IpubError::ManifestValidationError {
            reason: format!("failed to serialize manifest: {e}"),
        })
    }
}

/// Locate the manifest by searching `start` and its ancestors, mirroring how
/// build tools search for their project file.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}
