//! Core types and error handling for ipub.
//!
//! This module is the foundation of ipub's type system. It provides the
//! strongly-typed error enumeration used across the crate and the
//! user-friendly error presentation layer used by the CLI.
//!
//! # Modules
//!
//! ## `error` - Error handling
//!
//! - [`IpubError`] - enumerated error types covering all failure modes
//! - [`ErrorContext`] - user-friendly error wrapper with suggestions
//! - [`user_friendly_error`] - convert any error to user-friendly format
//!
//! # Design Principles
//!
//! Every operation that can fail returns a [`Result`] with meaningful error
//! information. Errors are fatal at the point they are detected: there is no
//! partial or degraded build mode, so nothing in the crate swallows an error
//! to continue. The CLI converts the final error into an [`ErrorContext`]
//! with a suggestion when one exists.
//!
//! # Example
//!
//! ```rust
//! use ipub::core::{IpubError, user_friendly_error};
//!
//! fn run() -> anyhow::Result<()> {
//!     Err(IpubError::ManifestNotFound.into())
//! }
//!
//! if let Err(e) = run() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, IpubError, user_friendly_error};
