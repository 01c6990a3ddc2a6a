//! Running counts shared by every aggregate
//!
//! All percentages and means go through [`percentage`] and [`mean`], so the
//! zero-division policy (empty input yields `0.0`) is applied uniformly.

use crate::session::TrialRecord;

/// `part / whole * 100`, or `0.0` when `whole` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// `sum / count`, or `0.0` when `count` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Accumulator for trial count, correct count and valid response times.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    trials: usize,
    correct: usize,
    response_time_sum_ms: f64,
    response_time_count: usize,
}

impl Tally {
    /// Tally an iterator of trials.
    pub fn from_trials<'a>(trials: impl IntoIterator<Item = &'a TrialRecord>) -> Self {
        let mut tally = Self::default();
        for trial in trials {
            tally.push(trial);
        }
        tally
    }

    /// Count one trial.
    pub fn push(&mut self, trial: &TrialRecord) {
        self.trials += 1;
        if trial.is_correct() {
            self.correct += 1;
        }
        if let Some(rt) = trial.valid_response_time_ms() {
            self.response_time_sum_ms += rt;
            self.response_time_count += 1;
        }
    }

    /// Number of trials counted, valid or not.
    #[must_use]
    pub const fn trials(&self) -> usize {
        self.trials
    }

    /// Number of correct trials.
    #[must_use]
    pub const fn correct(&self) -> usize {
        self.correct
    }

    /// Number of incorrect trials (including unanswered and invalid ones).
    #[must_use]
    pub const fn incorrect(&self) -> usize {
        self.trials - self.correct
    }

    /// Number of trials with a usable response time.
    #[must_use]
    pub const fn timed(&self) -> usize {
        self.response_time_count
    }

    /// Accuracy in percent.
    #[must_use]
    pub fn accuracy_pct(&self) -> f64 {
        percentage(self.correct, self.trials)
    }

    /// Mean of the valid response times.
    #[must_use]
    pub fn avg_response_time_ms(&self) -> f64 {
        mean(self.response_time_sum_ms, self.response_time_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ConditionId, Judgment};

    #[test]
    fn test_zero_division_guards() {
        assert!(percentage(0, 0).abs() < f64::EPSILON);
        assert!(mean(0.0, 0).abs() < f64::EPSILON);

        let tally = Tally::default();
        assert!(tally.accuracy_pct().abs() < f64::EPSILON);
        assert!(tally.avg_response_time_ms().abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_response_time_still_counts_as_trial() {
        let trials = [
            TrialRecord::new(
                1,
                ConditionId::AmbiguousDifficult,
                Judgment::Ungrammatical,
                Some(Judgment::Ungrammatical),
                0.0,
            ),
            TrialRecord::new(
                2,
                ConditionId::AmbiguousDifficult,
                Judgment::Ungrammatical,
                Some(Judgment::Grammatical),
                900.0,
            ),
        ];
        let tally = Tally::from_trials(&trials);
        assert_eq!(tally.trials(), 2);
        assert_eq!(tally.correct(), 1);
        assert_eq!(tally.incorrect(), 1);
        assert_eq!(tally.timed(), 1);
        assert!((tally.accuracy_pct() - 50.0).abs() < f64::EPSILON);
        assert!((tally.avg_response_time_ms() - 900.0).abs() < f64::EPSILON);
    }
}
