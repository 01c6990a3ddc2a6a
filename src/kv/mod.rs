//! Key-value persistence contract for the local session slot
//!
//! The trial presenter writes its most recent session document to a single
//! key; the analyzer reads that key on startup and forgets it on clear-all.
//! Backends:
//! - [`MemoryKvStore`]: in-process, lost on restart
//! - [`FileKvStore`]: one file per key in a directory (requires `tokio`)
//!
//! # Example
//!
//! ```rust,no_run
//! use judgment_analytics::kv::{LocalSessionSlot, MemoryKvStore};
//!
//! # async fn example() -> judgment_analytics::Result<()> {
//! let slot = LocalSessionSlot::new(MemoryKvStore::new(), "experimentData", "local");
//!
//! slot.save_document(&serde_json::json!({ "participant": { "id": "P1" } })).await?;
//! assert!(slot.is_occupied().await?);
//!
//! slot.forget().await?;
//! assert!(slot.load().await?.is_none());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "tokio")]
mod file;
mod memory;
mod slot;

#[cfg(feature = "tokio")]
pub use file::FileKvStore;
pub use memory::MemoryKvStore;
pub use slot::LocalSessionSlot;

use crate::Result;
use std::future::Future;

/// Minimal async key-value store.
pub trait KvStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Set a value for a key.
    ///
    /// Overwrites any existing value.
    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Delete a key.
    ///
    /// No-op if the key doesn't exist.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;
}
