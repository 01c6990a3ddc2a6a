//! Condition confusion counts
//!
//! This is a compatibility grid, not a true confusion matrix: the diagonal
//! cell of a row holds the row condition's correct-trial count and every
//! off-diagonal cell of that row holds the same value, the row's incorrect
//! count. Responses are never cross-tabulated against other conditions.

use serde::{Deserialize, Serialize};

use super::tally::Tally;
use crate::session::{ConditionId, TrialRecord};

/// Fixed 4x4 grid over [`ConditionId::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    /// Row/column labels
    pub conditions: [ConditionId; 4],
    /// `cells[row][column]`
    pub cells: [[usize; 4]; 4],
}

impl ConfusionCounts {
    /// Cell at (`row`, `column`).
    #[must_use]
    pub const fn cell(&self, row: ConditionId, column: ConditionId) -> usize {
        self.cells[row.index()][column.index()]
    }

    /// Correct trials of `condition` (diagonal).
    #[must_use]
    pub const fn correct(&self, condition: ConditionId) -> usize {
        self.cell(condition, condition)
    }
}

/// Build the grid from trials with a known condition.
#[must_use]
pub fn confusion_counts<'a>(trials: impl IntoIterator<Item = &'a TrialRecord>) -> ConfusionCounts {
    let mut tallies = [Tally::default(); 4];
    for trial in trials {
        if let Some(condition) = trial.condition_id() {
            tallies[condition.index()].push(trial);
        }
    }

    let mut cells = [[0; 4]; 4];
    for (row, tally) in tallies.iter().enumerate() {
        for (column, cell) in cells[row].iter_mut().enumerate() {
            *cell = if row == column {
                tally.correct()
            } else {
                tally.incorrect()
            };
        }
    }

    ConfusionCounts {
        conditions: ConditionId::ALL,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Judgment;

    fn trial(condition: ConditionId, correct: bool) -> TrialRecord {
        let response = if correct {
            Judgment::Grammatical
        } else {
            Judgment::Ungrammatical
        };
        TrialRecord::new(1, condition, Judgment::Grammatical, Some(response), 600.0)
    }

    #[test]
    fn test_row_layout() {
        let trials = [
            trial(ConditionId::AmbiguousEasy, true),
            trial(ConditionId::AmbiguousEasy, true),
            trial(ConditionId::AmbiguousEasy, false),
            trial(ConditionId::SimpleNonAmbiguous, false),
        ];
        let grid = confusion_counts(&trials);

        assert_eq!(grid.correct(ConditionId::AmbiguousEasy), 2);
        for column in ConditionId::ALL {
            if column != ConditionId::AmbiguousEasy {
                assert_eq!(grid.cell(ConditionId::AmbiguousEasy, column), 1);
            }
        }

        assert_eq!(grid.correct(ConditionId::SimpleNonAmbiguous), 0);
        assert_eq!(
            grid.cell(ConditionId::SimpleNonAmbiguous, ConditionId::AmbiguousDifficult),
            1
        );
        assert_eq!(grid.cells[ConditionId::ComplexNonAmbiguous.index()], [0; 4]);
    }

    #[test]
    fn test_empty_grid() {
        let grid = confusion_counts(std::iter::empty());
        assert_eq!(grid.cells, [[0; 4]; 4]);
        assert_eq!(grid.conditions, ConditionId::ALL);
    }
}
