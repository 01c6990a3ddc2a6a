//! Session Record - one participant run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrialRecord;

/// Session Record represents one complete participant run.
///
/// Created only by successful validation of a raw document (or re-import
/// of an export); never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    participant_id: String,
    #[serde(default)]
    language_group: Option<String>,
    #[serde(default)]
    german_level: Option<String>,
    trials: Vec<TrialRecord>,
    source_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a session with no optional metadata.
    #[must_use]
    pub fn new(
        participant_id: impl Into<String>,
        trials: Vec<TrialRecord>,
        source_label: impl Into<String>,
    ) -> Self {
        Self::builder(participant_id, source_label).trials(trials).build()
    }

    /// Create a builder for constructing a session with optional fields.
    #[must_use]
    pub fn builder(
        participant_id: impl Into<String>,
        source_label: impl Into<String>,
    ) -> SessionRecordBuilder {
        SessionRecordBuilder::new(participant_id, source_label)
    }

    /// Participant identifier.
    #[must_use]
    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    /// Participant language group, if recorded.
    #[must_use]
    pub fn language_group(&self) -> Option<&str> {
        self.language_group.as_deref()
    }

    /// Participant German proficiency, if recorded.
    #[must_use]
    pub fn german_level(&self) -> Option<&str> {
        self.german_level.as_deref()
    }

    /// Trials in presentation order.
    #[must_use]
    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// File name the session came from, or the local slot label.
    #[must_use]
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Presenter configuration, if the document carried one.
    #[must_use]
    pub const fn config(&self) -> Option<&serde_json::Value> {
        self.config.as_ref()
    }

    /// Session end time, if recorded and parseable.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Copy of this session under a different source label.
    #[must_use]
    pub fn relabeled(&self, source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            ..self.clone()
        }
    }
}

/// Builder for `SessionRecord`.
#[derive(Debug)]
pub struct SessionRecordBuilder {
    participant_id: String,
    language_group: Option<String>,
    german_level: Option<String>,
    trials: Vec<TrialRecord>,
    source_label: String,
    config: Option<serde_json::Value>,
    end_time: Option<DateTime<Utc>>,
}

impl SessionRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(participant_id: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            language_group: None,
            german_level: None,
            trials: Vec::new(),
            source_label: source_label.into(),
            config: None,
            end_time: None,
        }
    }

    /// Set the language group.
    #[must_use]
    pub fn language_group(mut self, group: Option<String>) -> Self {
        self.language_group = group;
        self
    }

    /// Set the German proficiency level.
    #[must_use]
    pub fn german_level(mut self, level: Option<String>) -> Self {
        self.german_level = level;
        self
    }

    /// Set the trials.
    #[must_use]
    pub fn trials(mut self, trials: Vec<TrialRecord>) -> Self {
        self.trials = trials;
        self
    }

    /// Append one trial.
    #[must_use]
    pub fn trial(mut self, trial: TrialRecord) -> Self {
        self.trials.push(trial);
        self
    }

    /// Set the presenter configuration.
    #[must_use]
    pub fn config(mut self, config: Option<serde_json::Value>) -> Self {
        self.config = config;
        self
    }

    /// Set the end time.
    #[must_use]
    pub const fn end_time(mut self, end_time: Option<DateTime<Utc>>) -> Self {
        self.end_time = end_time;
        self
    }

    /// Build the `SessionRecord`.
    #[must_use]
    pub fn build(self) -> SessionRecord {
        SessionRecord {
            participant_id: self.participant_id,
            language_group: self.language_group,
            german_level: self.german_level,
            trials: self.trials,
            source_label: self.source_label,
            config: self.config,
            end_time: self.end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ConditionId, Judgment};

    #[test]
    fn test_session_builder() {
        let session = SessionRecord::builder("P1", "p1.json")
            .language_group(Some("L2".to_string()))
            .trial(TrialRecord::new(
                1,
                ConditionId::AmbiguousEasy,
                Judgment::Grammatical,
                Some(Judgment::Grammatical),
                700.0,
            ))
            .build();

        assert_eq!(session.participant_id(), "P1");
        assert_eq!(session.language_group(), Some("L2"));
        assert_eq!(session.german_level(), None);
        assert_eq!(session.trials().len(), 1);
        assert_eq!(session.source_label(), "p1.json");
    }

    #[test]
    fn test_relabeled_keeps_trials() {
        let session = SessionRecord::new("P1", vec![TrialRecord::builder().build()], "local");
        let copy = session.relabeled("backup.json");
        assert_eq!(copy.source_label(), "backup.json");
        assert_eq!(copy.trials(), session.trials());
    }

    #[test]
    fn test_serialization_shape() {
        let session = SessionRecord::new("P9", Vec::new(), "local");
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["participantId"], "P9");
        assert_eq!(value["sourceLabel"], "local");
        assert!(value["languageGroup"].is_null());
        assert!(value.get("endTime").is_none());
    }
}
