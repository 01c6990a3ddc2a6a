//! In-process slot backend.
//!
//! Clones share one map, so a trial presenter holding one handle and the
//! analyzer holding another see the same persisted document. Nothing
//! survives the process; use `FileKvStore` for that.

use std::sync::Arc;

use dashmap::DashMap;

use super::KvStore;
use crate::Result;

/// Shared in-memory key-value map.
///
/// # Example
///
/// ```rust
/// use judgment_analytics::kv::{KvStore, MemoryKvStore};
///
/// # async fn example() -> judgment_analytics::Result<()> {
/// let presenter = MemoryKvStore::new();
/// let analyzer = presenter.clone();
///
/// presenter.set("experimentData", b"{}".to_vec()).await?;
/// assert_eq!(analyzer.get("experimentData").await?, Some(b"{}".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `other` is a handle to the same map.
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}
