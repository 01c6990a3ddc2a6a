//! Session Store - ordered, append-only collection of validated sessions
//!
//! Insertion order is display and aggregation order; the store never
//! re-sorts and never merges sessions, even when participant IDs repeat.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::SessionRecord;
use crate::{Error, Result};

/// Ordered store of validated sessions.
///
/// Sessions are held behind `Arc` so a [`StoreSnapshot`] is a cheap copy
/// of the current order that later mutations cannot affect.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    sessions: Vec<Arc<SessionRecord>>,
}

impl SessionStore {
    /// Create a new empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Append a session at the end. Returns its position.
    pub fn add(&mut self, session: SessionRecord) -> usize {
        debug!(
            participant_id = session.participant_id(),
            source = session.source_label(),
            position = self.sessions.len(),
            "session added"
        );
        self.sessions.push(Arc::new(session));
        self.sessions.len() - 1
    }

    /// Remove the session at `index`; later sessions shift down by one.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` if no session is stored at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<Arc<SessionRecord>> {
        if index >= self.sessions.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.sessions.len(),
            });
        }
        let removed = self.sessions.remove(index);
        debug!(
            participant_id = removed.participant_id(),
            position = index,
            "session removed"
        );
        Ok(removed)
    }

    /// Remove every session. Returns how many were removed.
    ///
    /// Forgetting the persisted local copy is the caller's job; see
    /// `Analyzer::clear_all`.
    pub fn clear(&mut self) -> usize {
        let removed = self.sessions.len();
        self.sessions.clear();
        debug!(removed, "session store cleared");
        removed
    }

    /// Session at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SessionRecord> {
        self.sessions.get(index).map(AsRef::as_ref)
    }

    /// Sessions in insertion order.
    #[must_use]
    pub fn sessions(&self) -> &[Arc<SessionRecord>] {
        &self.sessions
    }

    /// Iterate sessions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SessionRecord> {
        self.sessions.iter().map(AsRef::as_ref)
    }

    /// Immutable copy of the current session order.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            sessions: self.sessions.clone(),
        }
    }
}

/// Point-in-time view of a store.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    sessions: Vec<Arc<SessionRecord>>,
}

impl StoreSnapshot {
    /// Sessions in insertion order at snapshot time.
    #[must_use]
    pub fn sessions(&self) -> &[Arc<SessionRecord>] {
        &self.sessions
    }

    /// Number of sessions at snapshot time.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Session store for concurrent hosts.
///
/// Mutations are serialized behind a write lock; readers take a
/// [`StoreSnapshot`] and compute statistics without holding the lock.
#[derive(Debug, Default, Clone)]
pub struct SharedSessionStore {
    inner: Arc<RwLock<SessionStore>>,
}

impl SharedSessionStore {
    /// Create a new empty shared store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a session. Returns its position.
    pub fn add(&self, session: SessionRecord) -> usize {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(session)
    }

    /// Remove the session at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` if no session is stored at `index`
    pub fn remove_at(&self, index: usize) -> Result<Arc<SessionRecord>> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove_at(index)
    }

    /// Remove every session. Returns how many were removed.
    pub fn clear(&self) -> usize {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear()
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Immutable copy of the current session order.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }
}
