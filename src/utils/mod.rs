//! Shared utilities.
//!
//! # Modules
//!
//! - [`paths`] - canonical node-name handling: normalization, display names

pub mod paths;

pub use paths::{canonical_node_path, display_name, normalize_path};
