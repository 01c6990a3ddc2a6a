//! Error types for judgment-analytics
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)
//!
//! Parse and validation failures are always recoverable at the call site:
//! a caller importing many documents reports the failing one and moves on.
//! Nothing in the statistics engine returns an error; empty inputs degrade
//! to zero-valued aggregates.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// judgment-analytics error types
#[derive(Error, Debug)]
pub enum Error {
    /// Source document is not valid JSON
    #[error("Session document parse error: {0}")]
    ParseError(String),

    /// Document is well-formed JSON but violates the session schema
    #[error("Session validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid argument or configuration value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store position does not exist
    #[error("Session index {index} out of range (store holds {len} sessions)")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of sessions in the store
        len: usize,
    },

    /// Storage error (Parquet/KV slot)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Schema violation found by the session validator.
///
/// Variants are listed in the order the validator checks them; only the
/// first failing check is ever reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Top-level value is not a JSON object
    #[error("document is not a JSON object")]
    NotAnObject,

    /// `participant` object is missing
    #[error("missing `participant` object")]
    MissingParticipant,

    /// `participant.id` is missing, not a string, or empty
    #[error("missing or empty `participant.id`")]
    MissingParticipantId,

    /// `experiment` object is missing
    #[error("missing `experiment` object")]
    MissingExperiment,

    /// `experiment.data` is not an array
    #[error("`experiment.data` is not an array")]
    DataNotArray,

    /// `experiment.data` has no trials
    #[error("`experiment.data` is empty")]
    EmptyData,

    /// First trial lacks a required field
    #[error("first trial is missing required field `{0}`")]
    MissingTrialField(&'static str),
}

impl ValidationError {
    /// Path of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotAnObject => "$",
            Self::MissingParticipant => "participant",
            Self::MissingParticipantId => "participant.id",
            Self::MissingExperiment => "experiment",
            Self::DataNotArray | Self::EmptyData => "experiment.data",
            Self::MissingTrialField(field) => *field,
        }
    }
}
