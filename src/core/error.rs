//! Error handling for ipub.
//!
//! The error system is built around two types:
//! 1. [`IpubError`] - strongly-typed errors for every failure mode, so callers
//!    can match on precise causes
//! 2. [`ErrorContext`] - a display wrapper that adds user-friendly suggestions
//!    and details for CLI output
//!
//! Every error is fatal: resolution failures, graph construction failures and
//! store failures all propagate to the top-level build invocation, which exits
//! non-zero without producing partial output. [`user_friendly_error`] converts
//! any [`anyhow::Error`] into an [`ErrorContext`] with actionable suggestions
//! for the most common causes.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for ipub operations.
///
/// Each variant represents a specific failure mode with enough context to
/// produce an actionable diagnostic. Variants map one-to-one onto the failure
/// taxonomy of the build engine: cycles, missing or duplicated sources,
/// unsupported configurations, template format errors, and store failures.
#[derive(Error, Debug)]
pub enum IpubError {
    /// A node is reachable from itself through the active-resolution stack.
    ///
    /// Carries the ordered stack of nodes being resolved when the repeat was
    /// detected, plus the repeated node, so the full cycle can be reported.
    #[error("dependency cycle detected: {}", format_cycle(.stack, .repeated))]
    CircularDependency {
        /// Nodes on the active-resolution stack, outermost first.
        stack: Vec<String>,
        /// The node that was reached a second time.
        repeated: String,
    },

    /// A referenced node has no declared source and does not exist on disk.
    #[error("nonexistent source: {name}")]
    SourceNotFound {
        /// The node name that could not be resolved.
        name: String,
    },

    /// Two wildcard expansions assigned different sources to the same node.
    #[error("duplicate source for '{name}' (expanded from patterns '{first}' and '{second}')")]
    DuplicateSource {
        /// The concrete node name that was assigned twice.
        name: String,
        /// The pattern that assigned it first.
        first: String,
        /// The pattern that assigned it again.
        second: String,
    },

    /// A directory node was given non-empty substitution rules.
    ///
    /// Directory aggregation recurses into children; rewriting the directory
    /// itself is not supported.
    #[error("substitution rules specified on a directory are not supported ({path})")]
    DirectorySubstitution {
        /// The directory node carrying the rules.
        path: String,
    },

    /// A template placeholder references a capture group that does not exist.
    #[error("no capture group for placeholder '{{{placeholder}}}' in template '{template}'")]
    GroupFormat {
        /// The offending template string.
        template: String,
        /// The placeholder content that failed to bind (may be empty for `{}`).
        placeholder: String,
    },

    /// The `ipfs` binary is not installed or not found in `PATH`.
    #[error("ipfs is not installed or not found in PATH")]
    StoreNotFound,

    /// An `ipfs` command exited unsuccessfully.
    #[error("ipfs operation failed: {operation}")]
    StoreCommandError {
        /// The ipfs subcommand that failed (e.g. "add", "get").
        operation: String,
        /// The error output from the ipfs command.
        stderr: String,
    },

    /// Manifest file (ipub.json) not found in the project directory.
    #[error("manifest file {} not found", crate::constants::MANIFEST_NAME)]
    ManifestNotFound,

    /// Manifest could not be parsed as JSON.
    #[error("invalid manifest syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse.
        file: String,
        /// Specific reason for the parsing failure.
        reason: String,
    },

    /// Manifest parsed but failed eager validation.
    #[error("manifest validation failed: {reason}")]
    ManifestValidationError {
        /// Reason why validation failed.
        reason: String,
    },

    /// A glob pattern in the manifest could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    PatternError {
        /// The pattern string.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// Global configuration error.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn format_cycle(stack: &[String], repeated: &str) -> String {
    let mut chain = stack.join(" -> ");
    chain.push_str(" -> ");
    chain.push_str(repeated);
    chain
}

/// User-facing wrapper around an error with optional suggestion and details.
///
/// The CLI renders this at the top level instead of a bare error chain, so
/// that common failures come with a hint about how to fix them.
pub struct ErrorContext {
    /// The underlying error being presented.
    pub error: anyhow::Error,
    /// A short, actionable hint shown after the error message.
    pub suggestion: Option<String>,
    /// Extra background shown below the suggestion.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach an actionable suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach explanatory details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);

        // Walk the anyhow context chain below the headline message
        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }

        if let Some(ref details) = self.details {
            eprintln!("\n{details}");
        }

        if let Some(ref suggestion) = self.suggestion {
            eprintln!("\n{} {}", "hint:".cyan().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with suggestions for the
/// failure modes a user can act on.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let (suggestion, details): (Option<&str>, Option<String>) =
        match error.downcast_ref::<IpubError>() {
            Some(IpubError::StoreNotFound) => (
                Some("install IPFS from https://docs.ipfs.tech/install/ or point IPUB_IPFS_BIN at the binary"),
                None,
            ),
            Some(IpubError::StoreCommandError { stderr, .. }) => (
                Some("check that the IPFS daemon is running (`ipfs daemon`)"),
                (!stderr.trim().is_empty()).then(|| stderr.trim().to_string()),
            ),
            Some(IpubError::ManifestNotFound) => {
                (Some("run `ipub init` to create a manifest, or pass --manifest-path"), None)
            }
            Some(IpubError::CircularDependency { .. }) => (
                None,
                Some(
                    "each node on the chain references the next; break any one reference to fix the cycle"
                        .to_string(),
                ),
            ),
            Some(IpubError::SourceNotFound { .. }) => {
                (Some("declare the node under \"sources\" or create the file it names"), None)
            }
            Some(IpubError::DuplicateSource { .. }) => {
                (Some("narrow the patterns so each file is matched by at most one of them"), None)
            }
            Some(
                IpubError::ManifestParseError { .. } | IpubError::ManifestValidationError { .. },
            ) => (Some("run `ipub validate` for a full report"), None),
            _ => (None, None),
        };

    let mut ctx = ErrorContext::new(error);
    ctx.suggestion = suggestion.map(String::from);
    ctx.details = details;
    ctx
}
