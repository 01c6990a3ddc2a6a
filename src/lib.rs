//! # judgment-analytics: Aggregation Engine for Grammaticality Judgment Sessions
//!
//! **Version**: 0.3.0
//!
//! Validates session documents produced by a sentence-judgment experiment,
//! keeps them in an ordered in-memory store, and derives the summary views a
//! researcher looks at: global accuracy and response time, per-condition and
//! per-participant summaries, learning curves, a response-time histogram,
//! speed/accuracy points and a condition-by-condition compatibility grid
//! (the diagonal holds each condition's correct count, every off-diagonal
//! cell in a row holds that condition's incorrect count).
//!
//! ## Design Principles
//!
//! - **Pure aggregation**: every view is a function of the store snapshot;
//!   nothing is cached, so identical input gives identical output
//! - **Validate at the boundary**: a document either becomes a
//!   [`session::SessionRecord`] or is rejected with a [`ValidationError`]
//! - **Degrade, don't fail**: an empty store yields zeroed stats, never an error
//!
//! ## Example Usage
//!
//! ```rust
//! use judgment_analytics::Analyzer;
//! use serde_json::json;
//!
//! let mut analyzer = Analyzer::builder().build()?;
//! analyzer.import_document(
//!     &json!({
//!         "participant": { "id": "P1" },
//!         "experiment": { "data": [{
//!             "trial": 1, "sentence": "Der Hund bellt.",
//!             "condition": "simple_non_ambiguous",
//!             "expected": "grammatical", "response": "grammatical",
//!             "responseTime": 812, "correct": true
//!         }] }
//!     }),
//!     "p1.json",
//! )?;
//!
//! let stats = analyzer.engine().global_stats();
//! assert_eq!(stats.total_trials, 1);
//! assert!((stats.accuracy_pct - 100.0).abs() < f64::EPSILON);
//! # Ok::<(), judgment_analytics::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod import;
pub mod kv;
pub mod session;
pub mod stats;
pub mod storage;

pub use config::{AnalyticsConfig, AnalyticsConfigBuilder, ParticipantMergePolicy};
pub use error::{Error, Result, ValidationError};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use export::ExportDocument;
use import::ImportSummary;
use kv::{KvStore, LocalSessionSlot};
use session::{validate_session, SessionRecord, SessionStore};
use stats::{AnalyticsReport, StatisticsEngine};
use storage::TrialTable;

/// Session store plus the configuration every view is computed with.
#[derive(Debug, Default)]
pub struct Analyzer {
    config: AnalyticsConfig,
    store: SessionStore,
}

impl Analyzer {
    /// Create a new analyzer builder
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Stored sessions
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Mutable access to the stored sessions
    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// Validate a parsed document and append it to the store.
    ///
    /// Returns the store position of the new session.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the document is rejected; the store is
    /// unchanged
    pub fn import_document(
        &mut self,
        document: &serde_json::Value,
        source_label: &str,
    ) -> Result<usize> {
        let session = validate_session(document, source_label)?;
        Ok(self.store.add(session))
    }

    /// Parse, validate and store a batch of `(source_label, text)` documents.
    /// Rejected documents are reported in the summary.
    pub fn import_documents<I, L, T>(&mut self, documents: I) -> ImportSummary
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: AsRef<str>,
    {
        import::import_documents(&mut self.store, documents)
    }

    /// Read and store session files, one session per file.
    #[cfg(feature = "tokio")]
    pub async fn import_files<P: AsRef<std::path::Path>>(&mut self, paths: &[P]) -> ImportSummary {
        import::import_files(&mut self.store, paths).await
    }

    /// Append the sessions of an export document. Returns how many were added.
    pub fn import_export(&mut self, document: ExportDocument) -> usize {
        document.restore_into(&mut self.store)
    }

    /// Remove the session at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` if `index >= len`
    pub fn remove_at(&mut self, index: usize) -> Result<Arc<SessionRecord>> {
        self.store.remove_at(index)
    }

    /// Statistics engine over the current store contents
    #[must_use]
    pub fn engine(&self) -> StatisticsEngine<'_, Arc<SessionRecord>> {
        StatisticsEngine::with_config(self.store.sessions(), &self.config)
    }

    /// Every view at once
    #[must_use]
    pub fn report(&self) -> AnalyticsReport {
        self.engine().report()
    }

    /// Export document of the current store, stamped `export_time`
    #[must_use]
    pub fn export(&self, export_time: DateTime<Utc>) -> ExportDocument {
        ExportDocument::build(&self.store, &self.config, export_time)
    }

    /// Columnar table of every stored trial.
    ///
    /// # Errors
    ///
    /// Returns error if Arrow rejects the columns
    pub fn trial_table(&self) -> Result<TrialTable> {
        TrialTable::from_sessions(self.store.sessions())
    }

    /// Load the session persisted in `slot`, if any, and append it.
    ///
    /// Returns whether a session was restored.
    ///
    /// # Errors
    ///
    /// Returns error if the slot holds an unusable document or the backend
    /// fails; the store is unchanged
    pub async fn restore_local<K: KvStore>(&mut self, slot: &LocalSessionSlot<K>) -> Result<bool> {
        match slot.load().await? {
            Some(session) => {
                let index = self.store.add(session);
                info!(key = slot.key(), index, "local session restored");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Empty the store and forget the persisted local session.
    ///
    /// Returns how many sessions were removed.
    ///
    /// # Errors
    ///
    /// Returns error if the slot backend fails; the store is already empty
    pub async fn clear_all<K: KvStore>(&mut self, slot: &LocalSessionSlot<K>) -> Result<usize> {
        let removed = self.store.clear();
        slot.forget().await?;
        info!(removed, "all sessions cleared");
        Ok(removed)
    }
}

/// Analyzer builder
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    config: AnalyticsConfigBuilder,
}

impl AnalyzerBuilder {
    /// Start from `config` instead of the defaults
    #[must_use]
    pub fn config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config.into();
        self
    }

    /// Set how sessions map to participant rows
    #[must_use]
    pub fn merge_policy(mut self, policy: ParticipantMergePolicy) -> Self {
        self.config = self.config.merge_policy(policy);
        self
    }

    /// Set the histogram bin width
    #[must_use]
    pub fn histogram_bin_width_ms(mut self, width_ms: f64) -> Self {
        self.config = self.config.histogram_bin_width_ms(width_ms);
        self
    }

    /// Build the analyzer
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the configuration is invalid
    pub fn build(self) -> Result<Analyzer> {
        Ok(Analyzer {
            config: self.config.build()?,
            store: SessionStore::new(),
        })
    }
}
