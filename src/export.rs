//! Export document - the engine's canonical output artifact
//!
//! ```text
//! {
//!   "importedData": [SessionRecord, ...],
//!   "analytics": {
//!     "globalStats": GlobalStats,
//!     "conditionStats": [ConditionStats, ...],
//!     "exportTime": "2024-05-02T10:15:00Z"
//!   }
//! }
//! ```
//!
//! Analytics values are rounded with the configured display decimals.
//! `importedData` holds the full sessions, so an export can be loaded back
//! into a store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::format::ResultFormatter;
use crate::session::{SessionRecord, SessionStore};
use crate::stats::{ConditionStats, GlobalStats, StatisticsEngine};
use crate::{AnalyticsConfig, Error, Result, ValidationError};

/// Summary block of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAnalytics {
    /// Rounded global totals
    pub global_stats: GlobalStats,
    /// Rounded per-condition summaries
    pub condition_stats: Vec<ConditionStats>,
    /// When the export was produced
    pub export_time: DateTime<Utc>,
}

/// Full export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Every stored session in store order
    pub imported_data: Vec<SessionRecord>,
    /// Summary statistics
    pub analytics: ExportAnalytics,
}

impl ExportDocument {
    /// Build an export of `store` stamped with `export_time`.
    #[must_use]
    pub fn build(store: &SessionStore, config: &AnalyticsConfig, export_time: DateTime<Utc>) -> Self {
        let engine = StatisticsEngine::with_config(store.sessions(), config);
        let formatter = ResultFormatter::from_config(config);

        Self {
            imported_data: store.iter().cloned().collect(),
            analytics: ExportAnalytics {
                global_stats: formatter.round_global(&engine.global_stats()),
                condition_stats: formatter.round_conditions(&engine.condition_stats()),
                export_time,
            },
        }
    }

    /// Parse an export document.
    ///
    /// Every session must carry a non-empty participant ID and at least one
    /// trial, the same guarantees a validated import gives.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseError` if the text is not a valid export, or
    /// `Error::Validation` for the first session breaking those guarantees
    pub fn from_json(text: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(text)
            .map_err(|e| Error::ParseError(format!("export document: {e}")))?;
        for (index, session) in document.imported_data.iter().enumerate() {
            if let Err(e) = check_session(session) {
                warn!(index, field = e.field(), "rejected exported session");
                return Err(e.into());
            }
        }
        Ok(document)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the export to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json_pretty()?)?;
        info!(
            path = %path.as_ref().display(),
            sessions = self.imported_data.len(),
            "export written"
        );
        Ok(())
    }

    /// Append every exported session to `store`. Returns how many were added.
    pub fn restore_into(self, store: &mut SessionStore) -> usize {
        let count = self.imported_data.len();
        for session in self.imported_data {
            store.add(session);
        }
        count
    }
}

fn check_session(session: &SessionRecord) -> std::result::Result<(), ValidationError> {
    if session.participant_id().is_empty() {
        return Err(ValidationError::MissingParticipantId);
    }
    if session.trials().is_empty() {
        return Err(ValidationError::EmptyData);
    }
    Ok(())
}
