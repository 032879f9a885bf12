//! Content-addressed store abstraction.
//!
//! Every product of a build is addressed by an opaque identifier returned by
//! a store. The resolver never inspects identifier structure; it only threads
//! identifiers through template substitution and its memoization cache, so
//! the store is modeled as a small capability trait with three operations:
//! submit raw bytes, submit a file or directory tree, and materialize
//! previously-submitted content at a destination path.
//!
//! # Implementations
//!
//! - [`IpfsStore`] - wraps the system `ipfs` binary, the same way a package
//!   manager shells out to system `git`. This is the store used by real
//!   builds.
//! - [`MemoryStore`] - deterministic in-process store hashing content with
//!   SHA-256. Used by dry runs, `validate --resolve`, and the test suites.
//!
//! # Example
//!
//! ```rust,no_run
//! use ipub::store::{ContentStore, MemoryStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = MemoryStore::new();
//! let id = store.add_data(b"hello".to_vec()).await?;
//! println!("addressed as {id}");
//! # Ok(())
//! # }
//! ```

pub mod ipfs;
pub mod memory;

pub use ipfs::IpfsStore;
pub use memory::MemoryStore;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque content-derived identifier returned by a [`ContentStore`].
///
/// For the IPFS store this is a CID string; for the memory store a hex
/// digest. The resolver treats it as an immutable byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as bytes, for splicing into templated artifacts.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Capability interface to a content-addressed store.
///
/// All operations are fallible and asynchronous; a store failure is fatal to
/// the build invocation and is never retried here.
pub trait ContentStore {
    /// Submit raw bytes, returning their content identifier.
    fn add_data(&self, data: Vec<u8>) -> impl Future<Output = Result<ProductId>>;

    /// Submit a file or directory tree rooted at `path`, returning its
    /// content identifier.
    fn add_path(&self, path: &Path) -> impl Future<Output = Result<ProductId>>;

    /// Materialize previously-addressed content at `dest`.
    fn get(&self, id: &ProductId, dest: &Path) -> impl Future<Output = Result<()>>;
}
