//! Deterministic in-process content store.
//!
//! Addresses blobs and directory trees by SHA-256, mirroring the shape of a
//! real content-addressed store without any network or daemon. Identifiers
//! are stable across runs for identical content, so dry-run output is
//! diffable, and a directory's identifier depends only on the (name,
//! identifier) pairs of its immediate children.
//!
//! Used by `ipub build --dry-run`, `ipub validate --resolve`, and the test
//! suites. The store records how many times each operation was invoked so
//! tests can assert the resolver's single-computation guarantee.

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::trace;

use super::{ContentStore, ProductId};

#[derive(Debug, Clone)]
enum Entry {
    Blob(Vec<u8>),
    Tree(BTreeMap<String, ProductId>),
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    add_data_calls: usize,
    add_path_calls: usize,
    get_calls: usize,
}

/// In-memory SHA-256 content store.
///
/// Cloning is cheap and clones share the same backing storage, so a test can
/// keep a handle while the resolver owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `add_data` calls made against this store.
    pub fn add_data_calls(&self) -> usize {
        self.inner.lock().unwrap().add_data_calls
    }

    /// Number of `add_path` calls made against this store.
    pub fn add_path_calls(&self) -> usize {
        self.inner.lock().unwrap().add_path_calls
    }

    /// Number of `get` calls made against this store.
    pub fn get_calls(&self) -> usize {
        self.inner.lock().unwrap().get_calls
    }

    /// Whether the store holds content for `id`.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.inner.lock().unwrap().entries.contains_key(id.as_str())
    }

    /// The blob bytes stored under `id`, if `id` names a blob.
    pub fn blob(&self, id: &ProductId) -> Option<Vec<u8>> {
        match self.inner.lock().unwrap().entries.get(id.as_str()) {
            Some(Entry::Blob(data)) => Some(data.clone()),
            _ => None,
        }
    }

    fn insert_blob(&self, data: Vec<u8>) -> ProductId {
        let mut hasher = Sha256::new();
        hasher.update(b"blob:");
        hasher.update(&data);
        let id = ProductId::new(hex::encode(hasher.finalize()));
        self.inner.lock().unwrap().entries.insert(id.as_str().to_string(), Entry::Blob(data));
        id
    }

    // Tree identity hashes only the immediate (name, child id) pairs, in
    // sorted name order.
    fn insert_tree(&self, children: BTreeMap<String, ProductId>) -> ProductId {
        let mut hasher = Sha256::new();
        hasher.update(b"tree:");
        for (name, id) in &children {
            hasher.update(name.as_bytes());
            hasher.update(b"\0");
            hasher.update(id.as_bytes());
            hasher.update(b"\n");
        }
        let id = ProductId::new(hex::encode(hasher.finalize()));
        self.inner.lock().unwrap().entries.insert(id.as_str().to_string(), Entry::Tree(children));
        id
    }

    fn hash_path(&self, path: &Path) -> Result<ProductId> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if meta.is_dir() {
            let mut children = BTreeMap::new();
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("failed to read directory {}", path.display()))?
            {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                let child_id = self.hash_path(&entry.path())?;
                children.insert(name, child_id);
            }
            Ok(self.insert_tree(children))
        } else {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(self.insert_blob(data))
        }
    }

    fn materialize(&self, id: &ProductId, dest: &Path) -> Result<()> {
        let entry = {
            let inner = self.inner.lock().unwrap();
            inner.entries.get(id.as_str()).cloned()
        };
        let Some(entry) = entry else {
            bail!("memory store has no content for {id}");
        };
        match entry {
            Entry::Blob(data) => {
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(dest, data)
                    .with_context(|| format!("failed to write {}", dest.display()))?;
            }
            Entry::Tree(children) => {
                std::fs::create_dir_all(dest)
                    .with_context(|| format!("failed to create {}", dest.display()))?;
                for (name, child_id) in children {
                    self.materialize(&child_id, &dest.join(name))?;
                }
            }
        }
        Ok(())
    }
}

impl ContentStore for MemoryStore {
    async fn add_data(&self, data: Vec<u8>) -> Result<ProductId> {
        self.inner.lock().unwrap().add_data_calls += 1;
        let id = self.insert_blob(data);
        trace!(target: "store", "add_data -> {id}");
        Ok(id)
    }

    async fn add_path(&self, path: &Path) -> Result<ProductId> {
        self.inner.lock().unwrap().add_path_calls += 1;
        let id = self.hash_path(path)?;
        trace!(target: "store", "add_path {} -> {id}", path.display());
        Ok(id)
    }

    async fn get(&self, id: &ProductId, dest: &Path) -> Result<()> {
        self.inner.lock().unwrap().get_calls += 1;
        self.materialize(id, dest)
    }
}
