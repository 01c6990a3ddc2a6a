//! Statistics engine - every derived view over one session list

use serde::{Deserialize, Serialize};

use super::{
    condition_stats, confusion_counts, global_stats, learning_curves, participant_stats,
    response_time_histogram, speed_accuracy_points, ConditionStats, ConfusionCounts, GlobalStats,
    LearningCurve, ParticipantStats, ResponseTimeHistogram, SpeedAccuracyPoint,
};
use crate::config::{AnalyticsConfig, ParticipantMergePolicy, DEFAULT_BIN_WIDTH_MS};
use crate::session::{SessionRecord, TrialCollator};

/// Every consumer view, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Totals over all trials
    pub global_stats: GlobalStats,
    /// Per-condition summaries (conditions with data only)
    pub condition_stats: Vec<ConditionStats>,
    /// Per-participant summaries
    pub participant_stats: Vec<ParticipantStats>,
    /// Cumulative accuracy curves
    pub learning_curves: Vec<LearningCurve>,
    /// Response-time distribution
    pub response_time_histogram: ResponseTimeHistogram,
    /// Condition grid
    pub confusion_counts: ConfusionCounts,
    /// Speed/accuracy trade-off points
    pub speed_accuracy_points: Vec<SpeedAccuracyPoint>,
}

/// Pure, stateless aggregation over a borrowed session list.
///
/// The engine borrows its input, so the sessions cannot change while it
/// computes. Identical input always yields identical output.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsEngine<'a, S> {
    collator: TrialCollator<'a, S>,
    merge_policy: ParticipantMergePolicy,
    bin_width_ms: f64,
}

impl<'a, S: AsRef<SessionRecord>> StatisticsEngine<'a, S> {
    /// Engine with default policy and bin width.
    #[must_use]
    pub const fn new(sessions: &'a [S]) -> Self {
        Self {
            collator: TrialCollator::new(sessions),
            merge_policy: ParticipantMergePolicy::PerSession,
            bin_width_ms: DEFAULT_BIN_WIDTH_MS,
        }
    }

    /// Engine using the policy and bin width from `config`.
    #[must_use]
    pub const fn with_config(sessions: &'a [S], config: &AnalyticsConfig) -> Self {
        Self {
            collator: TrialCollator::new(sessions),
            merge_policy: config.merge_policy(),
            bin_width_ms: config.histogram_bin_width_ms(),
        }
    }

    /// Collated trial view backing the global and condition aggregates.
    #[must_use]
    pub const fn collator(&self) -> &TrialCollator<'a, S> {
        &self.collator
    }

    /// Totals over all trials.
    #[must_use]
    pub fn global_stats(&self) -> GlobalStats {
        global_stats(
            self.collator.trials().map(|t| t.trial),
            self.collator.session_count(),
        )
    }

    /// Per-condition summaries.
    #[must_use]
    pub fn condition_stats(&self) -> Vec<ConditionStats> {
        condition_stats(self.collator.trials().map(|t| t.trial))
    }

    /// Per-participant summaries.
    #[must_use]
    pub fn participant_stats(&self) -> Vec<ParticipantStats> {
        participant_stats(self.collator.sessions(), self.merge_policy)
    }

    /// Cumulative accuracy curves.
    #[must_use]
    pub fn learning_curves(&self) -> Vec<LearningCurve> {
        learning_curves(self.collator.sessions(), self.merge_policy)
    }

    /// Response-time distribution.
    #[must_use]
    pub fn response_time_histogram(&self) -> ResponseTimeHistogram {
        response_time_histogram(self.collator.sessions(), self.merge_policy, self.bin_width_ms)
    }

    /// Condition grid.
    #[must_use]
    pub fn confusion_counts(&self) -> ConfusionCounts {
        confusion_counts(self.collator.trials().map(|t| t.trial))
    }

    /// Speed/accuracy points.
    #[must_use]
    pub fn speed_accuracy_points(&self) -> Vec<SpeedAccuracyPoint> {
        speed_accuracy_points(self.collator.sessions(), self.merge_policy)
    }

    /// All views at once.
    #[must_use]
    pub fn report(&self) -> AnalyticsReport {
        AnalyticsReport {
            global_stats: self.global_stats(),
            condition_stats: self.condition_stats(),
            participant_stats: self.participant_stats(),
            learning_curves: self.learning_curves(),
            response_time_histogram: self.response_time_histogram(),
            confusion_counts: self.confusion_counts(),
            speed_accuracy_points: self.speed_accuracy_points(),
        }
    }
}
