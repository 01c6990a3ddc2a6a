//! Session validator - raw JSON document to `SessionRecord`
//!
//! Checks run in a fixed order and the first failure is reported:
//!
//! 1. value is an object
//! 2. `participant` object present
//! 3. `participant.id` is a non-empty string
//! 4. `experiment` object present
//! 5. `experiment.data` is an array
//! 6. the array is non-empty
//! 7. the first trial has every field in [`REQUIRED_TRIAL_FIELDS`]
//!
//! Only the first trial is schema-checked. Later trials are parsed
//! leniently: malformed fields become `None` on the `TrialRecord`, which
//! keeps legacy exports importable.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use super::{Condition, Judgment, SessionRecord, TrialRecord};
use crate::{Error, Result, ValidationError};

/// Fields the first trial must carry, in check order.
pub const REQUIRED_TRIAL_FIELDS: [&str; 7] = [
    "trial",
    "sentence",
    "condition",
    "expected",
    "response",
    "responseTime",
    "correct",
];

/// Validate a parsed session document.
///
/// # Arguments
///
/// * `document` - Parsed JSON value of one session document
/// * `source_label` - File name, or the local slot label
///
/// # Errors
///
/// Returns the first failing [`ValidationError`] in check order
pub fn validate_session(
    document: &Value,
    source_label: &str,
) -> std::result::Result<SessionRecord, ValidationError> {
    let root = document.as_object().ok_or(ValidationError::NotAnObject)?;

    let participant = root
        .get("participant")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingParticipant)?;

    let participant_id = participant
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingParticipantId)?;

    let experiment = root
        .get("experiment")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingExperiment)?;

    let data = experiment
        .get("data")
        .and_then(Value::as_array)
        .ok_or(ValidationError::DataNotArray)?;

    let first = data.first().ok_or(ValidationError::EmptyData)?;
    check_first_trial(first)?;

    let trials: Vec<TrialRecord> = data.iter().map(parse_trial).collect();

    let session = SessionRecord::builder(participant_id, source_label)
        .language_group(optional_string(participant, "languageGroup"))
        .german_level(optional_string(participant, "germanLevel"))
        .config(experiment.get("config").filter(|c| c.is_object()).cloned())
        .end_time(
            experiment
                .get("endTime")
                .and_then(Value::as_str)
                .and_then(parse_timestamp),
        )
        .trials(trials)
        .build();

    debug!(
        participant_id = session.participant_id(),
        source = source_label,
        trials = session.trials().len(),
        "validated session"
    );

    Ok(session)
}

/// Parse and validate one session document from text.
///
/// # Errors
///
/// Returns `Error::ParseError` if the text is not JSON, or
/// `Error::Validation` if the document violates the schema
pub fn parse_session_document(text: &str, source_label: &str) -> Result<SessionRecord> {
    let document: Value = serde_json::from_str(text)
        .map_err(|e| Error::ParseError(format!("{source_label}: {e}")))?;
    Ok(validate_session(&document, source_label)?)
}

fn check_first_trial(first: &Value) -> std::result::Result<(), ValidationError> {
    let Some(fields) = first.as_object() else {
        return Err(ValidationError::MissingTrialField(REQUIRED_TRIAL_FIELDS[0]));
    };
    match REQUIRED_TRIAL_FIELDS
        .iter()
        .find(|field| !fields.contains_key(**field))
    {
        Some(missing) => Err(ValidationError::MissingTrialField(*missing)),
        None => Ok(()),
    }
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn parse_judgment(value: Option<&Value>) -> Option<Judgment> {
    value.and_then(Value::as_str).and_then(Judgment::from_wire)
}

fn parse_condition(value: Option<&Value>) -> Option<Condition> {
    match value? {
        Value::Null => None,
        Value::String(name) => Some(Condition::parse(name)),
        other => Some(Condition::Unknown(other.to_string())),
    }
}

/// Lenient trial parse: every unusable field becomes `None`.
fn parse_trial(value: &Value) -> TrialRecord {
    let get = |key: &str| value.get(key);

    let trial = TrialRecord::builder()
        .trial_index(get("trial").and_then(Value::as_u64))
        .sentence(get("sentence").and_then(Value::as_str).map(ToString::to_string))
        .condition(parse_condition(get("condition")))
        .expected(parse_judgment(get("expected")))
        .response(parse_judgment(get("response")))
        .response_time_ms(get("responseTime").and_then(Value::as_f64))
        .timestamp(get("timestamp").and_then(Value::as_str).map(ToString::to_string))
        .build();

    if let Some(recorded) = get("correct").and_then(Value::as_bool) {
        if recorded != trial.is_correct() {
            debug!(
                trial = trial.trial_index(),
                recorded,
                derived = trial.is_correct(),
                "recorded correct flag disagrees with judgment pair"
            );
        }
    }

    trial
}
