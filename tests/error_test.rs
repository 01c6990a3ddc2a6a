//! Tests for error types

use judgment_analytics::{Error, ValidationError};

#[test]
fn test_parse_error() {
    let error = Error::ParseError("p1.json: EOF while parsing".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Session document parse error"));
    assert!(error_str.contains("p1.json"));
}

#[test]
fn test_validation_error_wraps_reason() {
    let error: Error = ValidationError::MissingParticipantId.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("Session validation failed"));
    assert!(error_str.contains("participant.id"));
}

#[test]
fn test_missing_trial_field_names_field() {
    let error = ValidationError::MissingTrialField("responseTime");
    assert!(format!("{error}").contains("responseTime"));
    assert_eq!(error.field(), "responseTime");
}

#[test]
fn test_validation_field_paths() {
    assert_eq!(ValidationError::NotAnObject.field(), "$");
    assert_eq!(ValidationError::MissingParticipant.field(), "participant");
    assert_eq!(ValidationError::MissingExperiment.field(), "experiment");
    assert_eq!(ValidationError::DataNotArray.field(), "experiment.data");
    assert_eq!(ValidationError::EmptyData.field(), "experiment.data");
}

#[test]
fn test_index_out_of_range() {
    let error = Error::IndexOutOfRange { index: 4, len: 2 };
    let error_str = format!("{error}");
    assert!(error_str.contains("Session index 4"));
    assert!(error_str.contains("2 sessions"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("histogram_bin_width_ms must be positive".to_string());
    assert!(format!("{error}").contains("Invalid input"));
}

#[test]
fn test_storage_error() {
    let error = Error::StorageError("Failed to open Parquet file".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Storage error"));
    assert!(error_str.contains("Parquet"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "session.json");
    let error: Error = io_error.into();
    assert!(matches!(error, Error::Io(_)));
    assert!(format!("{error}").contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::Json(_)));
}

#[test]
fn test_error_debug() {
    let error = Error::ParseError("test".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("ParseError"));
}
