//! Trial Record - one sentence, one judgment, one latency

use serde::{Deserialize, Serialize};
use std::fmt;

/// Experimental condition (complexity x ambiguity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionId {
    /// Simple sentence, single reading
    SimpleNonAmbiguous,
    /// Complex sentence, single reading
    ComplexNonAmbiguous,
    /// Ambiguous sentence, easy to resolve
    AmbiguousEasy,
    /// Ambiguous sentence, hard to resolve
    AmbiguousDifficult,
}

impl ConditionId {
    /// All conditions in canonical order. Condition-keyed outputs follow
    /// this order.
    pub const ALL: [Self; 4] = [
        Self::SimpleNonAmbiguous,
        Self::ComplexNonAmbiguous,
        Self::AmbiguousEasy,
        Self::AmbiguousDifficult,
    ];

    /// Wire name as it appears in session documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SimpleNonAmbiguous => "simple_non_ambiguous",
            Self::ComplexNonAmbiguous => "complex_non_ambiguous",
            Self::AmbiguousEasy => "ambiguous_easy",
            Self::AmbiguousDifficult => "ambiguous_difficult",
        }
    }

    /// Parse a wire name. Returns `None` for unknown names.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Position in [`ConditionId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition of a trial as recorded.
///
/// Unknown names are kept verbatim so they survive export, but they never
/// contribute to condition-keyed aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// One of the fixed experimental conditions
    Known(ConditionId),
    /// Any other label
    Unknown(String),
}

impl Condition {
    /// Classify a wire name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        ConditionId::from_wire(name).map_or_else(|| Self::Unknown(name.to_string()), Self::Known)
    }

    /// The known condition, if any.
    #[must_use]
    pub const fn known(&self) -> Option<ConditionId> {
        match self {
            Self::Known(id) => Some(*id),
            Self::Unknown(_) => None,
        }
    }
}

/// Binary grammaticality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    /// Sentence judged (or expected to be) grammatical
    Grammatical,
    /// Sentence judged (or expected to be) ungrammatical
    Ungrammatical,
}

impl Judgment {
    /// Parse a wire value. Anything else is an invalid judgment.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "grammatical" => Some(Self::Grammatical),
            "ungrammatical" => Some(Self::Ungrammatical),
            _ => None,
        }
    }
}

/// Trial Record represents one stimulus-response event.
///
/// Only the first trial of a session is schema-checked, so every field of
/// later trials may be missing. Missing or invalid values surface here as
/// `None` rather than rejecting the session.
///
/// `correct` is always derived from the `expected`/`response` pair; an
/// incoming flag is never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TrialRecordWire")]
pub struct TrialRecord {
    trial_index: Option<u64>,
    sentence: Option<String>,
    condition: Option<Condition>,
    expected: Option<Judgment>,
    response: Option<Judgment>,
    response_time_ms: Option<f64>,
    correct: bool,
    timestamp: Option<String>,
}

/// Export shape of a trial; `correct` is read but ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrialRecordWire {
    #[serde(default)]
    trial_index: Option<u64>,
    #[serde(default)]
    sentence: Option<String>,
    #[serde(default)]
    condition: Option<Condition>,
    #[serde(default)]
    expected: Option<Judgment>,
    #[serde(default)]
    response: Option<Judgment>,
    #[serde(default)]
    response_time_ms: Option<f64>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<TrialRecordWire> for TrialRecord {
    fn from(wire: TrialRecordWire) -> Self {
        Self::builder()
            .trial_index(wire.trial_index)
            .sentence(wire.sentence)
            .condition(wire.condition)
            .expected(wire.expected)
            .response(wire.response)
            .response_time_ms(wire.response_time_ms)
            .timestamp(wire.timestamp)
            .build()
    }
}

impl TrialRecord {
    /// Create a fully-specified trial.
    ///
    /// # Arguments
    ///
    /// * `trial_index` - 1-based position reported by the presenter
    /// * `condition` - Experimental condition
    /// * `expected` - Correct judgment for the sentence
    /// * `response` - Judgment given, `None` if the participant did not answer
    /// * `response_time_ms` - Latency in milliseconds
    #[must_use]
    pub fn new(
        trial_index: u64,
        condition: ConditionId,
        expected: Judgment,
        response: Option<Judgment>,
        response_time_ms: f64,
    ) -> Self {
        Self::builder()
            .trial_index(Some(trial_index))
            .condition(Some(Condition::Known(condition)))
            .expected(Some(expected))
            .response(response)
            .response_time_ms(Some(response_time_ms))
            .build()
    }

    /// Create a builder with every field unset.
    #[must_use]
    pub fn builder() -> TrialRecordBuilder {
        TrialRecordBuilder::default()
    }

    /// Trial number as recorded.
    #[must_use]
    pub const fn trial_index(&self) -> Option<u64> {
        self.trial_index
    }

    /// Stimulus sentence.
    #[must_use]
    pub fn sentence(&self) -> Option<&str> {
        self.sentence.as_deref()
    }

    /// Recorded condition.
    #[must_use]
    pub const fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Known condition, if the recorded one is part of the fixed set.
    #[must_use]
    pub fn condition_id(&self) -> Option<ConditionId> {
        self.condition.as_ref().and_then(Condition::known)
    }

    /// Expected judgment, `None` if missing or invalid.
    #[must_use]
    pub const fn expected(&self) -> Option<Judgment> {
        self.expected
    }

    /// Given judgment, `None` if missing or invalid.
    #[must_use]
    pub const fn response(&self) -> Option<Judgment> {
        self.response
    }

    /// Latency as recorded.
    #[must_use]
    pub const fn response_time_ms(&self) -> Option<f64> {
        self.response_time_ms
    }

    /// Latency if it is usable for timing statistics (finite and > 0).
    #[must_use]
    pub fn valid_response_time_ms(&self) -> Option<f64> {
        self.response_time_ms.filter(|rt| rt.is_finite() && *rt > 0.0)
    }

    /// Whether the response matched the expected judgment.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.correct
    }

    /// ISO-8601 timestamp as recorded.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }
}

/// Builder for `TrialRecord`.
#[derive(Debug, Default)]
pub struct TrialRecordBuilder {
    trial_index: Option<u64>,
    sentence: Option<String>,
    condition: Option<Condition>,
    expected: Option<Judgment>,
    response: Option<Judgment>,
    response_time_ms: Option<f64>,
    timestamp: Option<String>,
}

impl TrialRecordBuilder {
    /// Set the trial number
    #[must_use]
    pub const fn trial_index(mut self, trial_index: Option<u64>) -> Self {
        self.trial_index = trial_index;
        self
    }

    /// Set the stimulus sentence
    #[must_use]
    pub fn sentence(mut self, sentence: Option<String>) -> Self {
        self.sentence = sentence;
        self
    }

    /// Set the condition
    #[must_use]
    pub fn condition(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }

    /// Set the expected judgment
    #[must_use]
    pub const fn expected(mut self, expected: Option<Judgment>) -> Self {
        self.expected = expected;
        self
    }

    /// Set the given judgment
    #[must_use]
    pub const fn response(mut self, response: Option<Judgment>) -> Self {
        self.response = response;
        self
    }

    /// Set the latency
    #[must_use]
    pub const fn response_time_ms(mut self, response_time_ms: Option<f64>) -> Self {
        self.response_time_ms = response_time_ms;
        self
    }

    /// Set the timestamp
    #[must_use]
    pub fn timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the `TrialRecord`, deriving `correct` from the judgment pair.
    #[must_use]
    pub fn build(self) -> TrialRecord {
        let correct = matches!(
            (self.expected, self.response),
            (Some(expected), Some(response)) if expected == response
        );
        TrialRecord {
            trial_index: self.trial_index,
            sentence: self.sentence,
            condition: self.condition,
            expected: self.expected,
            response: self.response,
            response_time_ms: self.response_time_ms,
            correct,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_wire_names() {
        for id in ConditionId::ALL {
            assert_eq!(ConditionId::from_wire(id.as_str()), Some(id));
        }
        assert_eq!(ConditionId::from_wire("filler"), None);
        assert_eq!(ConditionId::AmbiguousEasy.index(), 2);
    }

    #[test]
    fn test_unknown_condition_passes_through() {
        let condition = Condition::parse("filler");
        assert_eq!(condition, Condition::Unknown("filler".to_string()));
        assert_eq!(condition.known(), None);

        let json = serde_json::to_string(&condition).unwrap();
        assert_eq!(json, "\"filler\"");
    }

    #[test]
    fn test_correct_is_derived() {
        let hit = TrialRecord::new(
            1,
            ConditionId::SimpleNonAmbiguous,
            Judgment::Grammatical,
            Some(Judgment::Grammatical),
            800.0,
        );
        assert!(hit.is_correct());

        let miss = TrialRecord::new(
            2,
            ConditionId::SimpleNonAmbiguous,
            Judgment::Grammatical,
            Some(Judgment::Ungrammatical),
            800.0,
        );
        assert!(!miss.is_correct());

        let no_answer = TrialRecord::new(
            3,
            ConditionId::SimpleNonAmbiguous,
            Judgment::Grammatical,
            None,
            800.0,
        );
        assert!(!no_answer.is_correct());
    }

    #[test]
    fn test_missing_expected_is_never_correct() {
        let trial = TrialRecord::builder()
            .response(Some(Judgment::Grammatical))
            .build();
        assert!(!trial.is_correct());
    }

    #[test]
    fn test_deserialize_ignores_incoming_correct_flag() {
        let json = r#"{
            "trialIndex": 4,
            "condition": "ambiguous_easy",
            "expected": "ungrammatical",
            "response": "grammatical",
            "responseTimeMs": 950,
            "correct": true
        }"#;
        let trial: TrialRecord = serde_json::from_str(json).unwrap();
        assert!(!trial.is_correct());
        assert_eq!(trial.condition_id(), Some(ConditionId::AmbiguousEasy));
    }

    #[test]
    fn test_valid_response_time() {
        let trial = TrialRecord::builder().response_time_ms(Some(0.0)).build();
        assert_eq!(trial.valid_response_time_ms(), None);

        let trial = TrialRecord::builder().response_time_ms(Some(-3.0)).build();
        assert_eq!(trial.valid_response_time_ms(), None);

        let trial = TrialRecord::builder().response_time_ms(Some(f64::NAN)).build();
        assert_eq!(trial.valid_response_time_ms(), None);

        let trial = TrialRecord::builder().response_time_ms(Some(412.0)).build();
        assert_eq!(trial.valid_response_time_ms(), Some(412.0));
    }
}
