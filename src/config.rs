//! Analytics configuration
//!
//! Every field has a default, so an empty JSON object `{}` is a valid
//! configuration file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default response-time histogram bin width in milliseconds
pub const DEFAULT_BIN_WIDTH_MS: f64 = 500.0;

/// Default key of the persisted "local" session slot
pub const DEFAULT_LOCAL_SLOT_KEY: &str = "experimentData";

/// Source label given to the session restored from the persisted slot
pub const DEFAULT_LOCAL_SOURCE_LABEL: &str = "local";

/// Default number of decimals for displayed and exported values
pub const DEFAULT_DISPLAY_DECIMALS: u8 = 1;

/// Upper bound on response-time histogram bins; times past the last bin's
/// start are counted in the last bin
pub const MAX_HISTOGRAM_BINS: usize = 2_000;

/// How sessions sharing a participant ID are grouped in per-participant views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantMergePolicy {
    /// One row per stored session, even when IDs repeat.
    #[default]
    PerSession,
    /// Sessions with the same participant ID are summed into one row.
    MergeById,
}

/// Configuration for the aggregation engine and its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    histogram_bin_width_ms: f64,
    merge_policy: ParticipantMergePolicy,
    local_slot_key: String,
    local_source_label: String,
    display_decimals: u8,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            histogram_bin_width_ms: DEFAULT_BIN_WIDTH_MS,
            merge_policy: ParticipantMergePolicy::default(),
            local_slot_key: DEFAULT_LOCAL_SLOT_KEY.to_string(),
            local_source_label: DEFAULT_LOCAL_SOURCE_LABEL.to_string(),
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
        }
    }
}

impl AnalyticsConfig {
    /// Create a configuration builder seeded with defaults
    #[must_use]
    pub fn builder() -> AnalyticsConfigBuilder {
        AnalyticsConfigBuilder::default()
    }

    /// Parse a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or a value is out of range
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its contents are invalid
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the bin width is not a positive
    /// finite number or a label/key is empty
    pub fn validate(&self) -> Result<()> {
        if !self.histogram_bin_width_ms.is_finite() || self.histogram_bin_width_ms <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "histogram_bin_width_ms must be a positive number, got {}",
                self.histogram_bin_width_ms
            )));
        }
        if self.local_slot_key.is_empty() {
            return Err(Error::InvalidInput(
                "local_slot_key must not be empty".to_string(),
            ));
        }
        if self.local_source_label.is_empty() {
            return Err(Error::InvalidInput(
                "local_source_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Histogram bin width in milliseconds.
    #[must_use]
    pub const fn histogram_bin_width_ms(&self) -> f64 {
        self.histogram_bin_width_ms
    }

    /// Participant grouping policy.
    #[must_use]
    pub const fn merge_policy(&self) -> ParticipantMergePolicy {
        self.merge_policy
    }

    /// Key of the persisted local session slot.
    #[must_use]
    pub fn local_slot_key(&self) -> &str {
        &self.local_slot_key
    }

    /// Source label for the restored local session.
    #[must_use]
    pub fn local_source_label(&self) -> &str {
        &self.local_source_label
    }

    /// Decimals used for display and export rounding.
    #[must_use]
    pub const fn display_decimals(&self) -> u8 {
        self.display_decimals
    }
}

/// Builder for `AnalyticsConfig`.
#[derive(Debug, Default)]
pub struct AnalyticsConfigBuilder {
    config: AnalyticsConfig,
}

impl AnalyticsConfigBuilder {
    /// Set the histogram bin width
    #[must_use]
    pub const fn histogram_bin_width_ms(mut self, width_ms: f64) -> Self {
        self.config.histogram_bin_width_ms = width_ms;
        self
    }

    /// Set the participant grouping policy
    #[must_use]
    pub const fn merge_policy(mut self, policy: ParticipantMergePolicy) -> Self {
        self.config.merge_policy = policy;
        self
    }

    /// Set the persisted slot key
    #[must_use]
    pub fn local_slot_key(mut self, key: impl Into<String>) -> Self {
        self.config.local_slot_key = key.into();
        self
    }

    /// Set the source label of the restored local session
    #[must_use]
    pub fn local_source_label(mut self, label: impl Into<String>) -> Self {
        self.config.local_source_label = label.into();
        self
    }

    /// Set display/export rounding
    #[must_use]
    pub const fn display_decimals(mut self, decimals: u8) -> Self {
        self.config.display_decimals = decimals;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of range
    pub fn build(self) -> Result<AnalyticsConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl From<AnalyticsConfig> for AnalyticsConfigBuilder {
    fn from(config: AnalyticsConfig) -> Self {
        Self { config }
    }
}
