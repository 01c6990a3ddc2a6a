//! Global, per-condition, per-participant and speed/accuracy summaries

use serde::{Deserialize, Serialize};

use super::grouping::group_sessions;
use super::tally::Tally;
use crate::config::ParticipantMergePolicy;
use crate::session::{ConditionId, SessionRecord, TrialRecord};

/// Totals over every collated trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    /// Number of trials across all sessions
    pub total_trials: usize,
    /// Number of stored sessions (not distinct participant IDs)
    pub total_participants: usize,
    /// Percentage of correct trials
    pub accuracy_pct: f64,
    /// Mean of valid response times
    pub avg_response_time_ms: f64,
}

/// Summary of one condition that has at least one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionStats {
    /// The condition
    pub condition: ConditionId,
    /// Number of trials in the condition
    pub trials: usize,
    /// Percentage of correct trials
    pub accuracy_pct: f64,
    /// Mean of valid response times
    pub avg_response_time_ms: f64,
}

/// Summary of one participant row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    /// Participant ID
    pub participant_id: String,
    /// Language group, if recorded
    pub language_group: Option<String>,
    /// Number of sessions folded into this row
    pub sessions: usize,
    /// Number of trials in the row
    pub total_trials: usize,
    /// Percentage of correct trials
    pub accuracy_pct: f64,
    /// Mean of valid response times
    pub avg_response_time_ms: f64,
}

/// One (mean latency, accuracy) pair per participant row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedAccuracyPoint {
    /// Participant ID
    pub participant_id: String,
    /// Mean of valid response times
    pub avg_response_time_ms: f64,
    /// Percentage of correct trials
    pub accuracy_pct: f64,
}

/// Compute global totals.
///
/// `session_count` is reported as `total_participants`. With no trials every
/// numeric field is zero.
#[must_use]
pub fn global_stats<'a>(
    trials: impl IntoIterator<Item = &'a TrialRecord>,
    session_count: usize,
) -> GlobalStats {
    let tally = Tally::from_trials(trials);
    if tally.trials() == 0 {
        return GlobalStats::default();
    }
    GlobalStats {
        total_trials: tally.trials(),
        total_participants: session_count,
        accuracy_pct: tally.accuracy_pct(),
        avg_response_time_ms: tally.avg_response_time_ms(),
    }
}

/// Compute per-condition summaries in canonical condition order.
///
/// Conditions without trials are omitted, and trials with an unknown or
/// missing condition are ignored.
#[must_use]
pub fn condition_stats<'a>(trials: impl IntoIterator<Item = &'a TrialRecord>) -> Vec<ConditionStats> {
    let mut tallies = [Tally::default(); 4];
    for trial in trials {
        if let Some(condition) = trial.condition_id() {
            tallies[condition.index()].push(trial);
        }
    }

    ConditionId::ALL
        .into_iter()
        .zip(tallies)
        .filter(|(_, tally)| tally.trials() > 0)
        .map(|(condition, tally)| ConditionStats {
            condition,
            trials: tally.trials(),
            accuracy_pct: tally.accuracy_pct(),
            avg_response_time_ms: tally.avg_response_time_ms(),
        })
        .collect()
}

/// Compute one summary row per participant group.
#[must_use]
pub fn participant_stats<S: AsRef<SessionRecord>>(
    sessions: &[S],
    policy: ParticipantMergePolicy,
) -> Vec<ParticipantStats> {
    group_sessions(sessions, policy)
        .iter()
        .map(|group| {
            let tally = Tally::from_trials(group.trials());
            ParticipantStats {
                participant_id: group.participant_id().to_string(),
                language_group: group.language_group().map(ToString::to_string),
                sessions: group.session_count(),
                total_trials: tally.trials(),
                accuracy_pct: tally.accuracy_pct(),
                avg_response_time_ms: tally.avg_response_time_ms(),
            }
        })
        .collect()
}

/// Compute one speed/accuracy point per participant group.
#[must_use]
pub fn speed_accuracy_points<S: AsRef<SessionRecord>>(
    sessions: &[S],
    policy: ParticipantMergePolicy,
) -> Vec<SpeedAccuracyPoint> {
    group_sessions(sessions, policy)
        .iter()
        .map(|group| {
            let tally = Tally::from_trials(group.trials());
            SpeedAccuracyPoint {
                participant_id: group.participant_id().to_string(),
                avg_response_time_ms: tally.avg_response_time_ms(),
                accuracy_pct: tally.accuracy_pct(),
            }
        })
        .collect()
}
