//! Statistics engine
//!
//! Descriptive aggregates over validated sessions. Every function is pure:
//! inputs are borrowed, nothing is cached, and the same input always yields
//! the same output. Empty input never errors; percentages and means fall
//! back to `0.0` and empty groups are omitted.
//!
//! | View | Input | Grouping |
//! |------|-------|----------|
//! | [`GlobalStats`] | collated trials | none |
//! | [`ConditionStats`] | collated trials | condition |
//! | [`ConfusionCounts`] | collated trials | condition |
//! | [`ParticipantStats`] | sessions | merge policy |
//! | [`LearningCurve`] | sessions | merge policy |
//! | [`ResponseTimeHistogram`] | sessions | merge policy |
//! | [`SpeedAccuracyPoint`] | sessions | merge policy |
//!
//! ## Usage
//!
//! ```rust
//! use judgment_analytics::session::{ConditionId, Judgment, SessionRecord, TrialRecord};
//! use judgment_analytics::stats::StatisticsEngine;
//!
//! let sessions = vec![SessionRecord::new(
//!     "P1",
//!     vec![TrialRecord::new(
//!         1,
//!         ConditionId::AmbiguousEasy,
//!         Judgment::Grammatical,
//!         Some(Judgment::Grammatical),
//!         640.0,
//!     )],
//!     "p1.json",
//! )];
//!
//! let report = StatisticsEngine::new(&sessions).report();
//! assert_eq!(report.global_stats.total_trials, 1);
//! assert_eq!(report.learning_curves[0].points, vec![100.0]);
//! ```

mod confusion;
mod engine;
mod grouping;
mod histogram;
mod learning_curve;
mod summary;
mod tally;

pub use confusion::{confusion_counts, ConfusionCounts};
pub use engine::{AnalyticsReport, StatisticsEngine};
pub use grouping::{group_sessions, ParticipantGroup};
pub use histogram::{response_time_histogram, HistogramBin, HistogramSeries, ResponseTimeHistogram};
pub use learning_curve::{cumulative_accuracy, learning_curves, LearningCurve};
pub use summary::{
    condition_stats, global_stats, participant_stats, speed_accuracy_points, ConditionStats,
    GlobalStats, ParticipantStats, SpeedAccuracyPoint,
};
pub use tally::{mean, percentage, Tally};
