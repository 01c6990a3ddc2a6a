//! Cumulative accuracy curves
//!
//! Point `k` (1-based) is `correct_so_far / k * 100`. The curve follows the
//! trial array order of the session, never timestamps, so reordering trials
//! changes the curve.

use serde::{Deserialize, Serialize};

use super::grouping::group_sessions;
use super::tally::percentage;
use crate::config::ParticipantMergePolicy;
use crate::session::{SessionRecord, TrialRecord};

/// Cumulative accuracy series of one participant row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningCurve {
    /// Participant ID
    pub participant_id: String,
    /// Accuracy in percent after each trial
    pub points: Vec<f64>,
}

impl LearningCurve {
    /// Accuracy after the last trial, `None` for an empty curve.
    #[must_use]
    pub fn final_accuracy_pct(&self) -> Option<f64> {
        self.points.last().copied()
    }
}

/// Cumulative accuracy over `trials` in iteration order.
#[must_use]
pub fn cumulative_accuracy<'a>(trials: impl IntoIterator<Item = &'a TrialRecord>) -> Vec<f64> {
    let mut correct = 0;
    trials
        .into_iter()
        .enumerate()
        .map(|(position, trial)| {
            if trial.is_correct() {
                correct += 1;
            }
            percentage(correct, position + 1)
        })
        .collect()
}

/// One learning curve per participant group.
#[must_use]
pub fn learning_curves<S: AsRef<SessionRecord>>(
    sessions: &[S],
    policy: ParticipantMergePolicy,
) -> Vec<LearningCurve> {
    group_sessions(sessions, policy)
        .iter()
        .map(|group| LearningCurve {
            participant_id: group.participant_id().to_string(),
            points: cumulative_accuracy(group.trials()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ConditionId, Judgment};

    fn trial(correct: bool) -> TrialRecord {
        let response = if correct {
            Judgment::Ungrammatical
        } else {
            Judgment::Grammatical
        };
        TrialRecord::new(
            1,
            ConditionId::ComplexNonAmbiguous,
            Judgment::Ungrammatical,
            Some(response),
            700.0,
        )
    }

    #[test]
    fn test_cumulative_points() {
        let trials = [trial(true), trial(false), trial(true), trial(true)];
        let curve = cumulative_accuracy(&trials);
        assert_eq!(curve, vec![100.0, 50.0, percentage(2, 3), 75.0]);
    }

    #[test]
    fn test_order_sensitivity() {
        let forward = [trial(false), trial(true)];
        let reversed = [trial(true), trial(false)];
        assert_eq!(cumulative_accuracy(&forward), vec![0.0, 50.0]);
        assert_eq!(cumulative_accuracy(&reversed), vec![100.0, 50.0]);
    }

    #[test]
    fn test_empty_curve() {
        let curve = cumulative_accuracy(std::iter::empty());
        assert!(curve.is_empty());
        let named = LearningCurve {
            participant_id: "P1".to_string(),
            points: curve,
        };
        assert_eq!(named.final_accuracy_pct(), None);
    }

    #[test]
    fn test_curves_follow_merge_policy() {
        let sessions = vec![
            SessionRecord::new("P1", vec![trial(true)], "a"),
            SessionRecord::new("P1", vec![trial(false)], "b"),
        ];
        let separate = learning_curves(&sessions, ParticipantMergePolicy::PerSession);
        assert_eq!(separate.len(), 2);
        assert_eq!(separate[1].points, vec![0.0]);

        let merged = learning_curves(&sessions, ParticipantMergePolicy::MergeById);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].points, vec![100.0, 50.0]);
    }
}
