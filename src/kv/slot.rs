//! The persisted "local" session slot

use tracing::{debug, warn};

use super::KvStore;
use crate::session::{parse_session_document, SessionRecord};
use crate::{AnalyticsConfig, Error, Result};

/// One KV key holding the most recent raw session document.
#[derive(Debug)]
pub struct LocalSessionSlot<K> {
    store: K,
    key: String,
    source_label: String,
}

impl<K: KvStore> LocalSessionSlot<K> {
    /// Create a slot over `store` at `key`; a restored session is labelled
    /// `source_label`.
    #[must_use]
    pub fn new(store: K, key: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            source_label: source_label.into(),
        }
    }

    /// Create a slot using the configured key and label.
    #[must_use]
    pub fn from_config(store: K, config: &AnalyticsConfig) -> Self {
        Self::new(store, config.local_slot_key(), config.local_source_label())
    }

    /// Slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &K {
        &self.store
    }

    /// Whether the slot holds a document.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn is_occupied(&self) -> Result<bool> {
        self.store.exists(&self.key).await
    }

    /// Read and validate the stored document.
    ///
    /// Returns `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseError`/`Error::Validation` if the stored document
    /// is unusable, or a backend error
    pub async fn load(&self) -> Result<Option<SessionRecord>> {
        let Some(bytes) = self.store.get(&self.key).await? else {
            debug!(key = %self.key, "local slot empty");
            return Ok(None);
        };
        let text = String::from_utf8(bytes).map_err(|e| {
            Error::ParseError(format!("{}: slot is not UTF-8: {e}", self.source_label))
        })?;
        match parse_session_document(&text, &self.source_label) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(key = %self.key, error = %e, "local slot holds an unusable document");
                Err(e)
            }
        }
    }

    /// Store a raw session document, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the backend fails
    pub async fn save_document(&self, document: &serde_json::Value) -> Result<()> {
        let bytes = serde_json::to_vec(document)?;
        self.store.set(&self.key, bytes).await
    }

    /// Drop the stored document.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    pub async fn forget(&self) -> Result<()> {
        debug!(key = %self.key, "local slot forgotten");
        self.store.delete(&self.key).await
    }
}
