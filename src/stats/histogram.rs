//! Response-time histogram with shared bin edges
//!
//! Bin 0 starts at `floor(min)` of all valid response times and the bin
//! count is `ceil((max - min) / width) + 1`, capped at
//! [`MAX_HISTOGRAM_BINS`]. When capped, the last bin also holds every time
//! beyond its start. Invalid times (missing, NaN, zero or negative) are
//! dropped before binning.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::grouping::group_sessions;
use crate::config::{ParticipantMergePolicy, MAX_HISTOGRAM_BINS};
use crate::session::SessionRecord;

/// Half-open bin `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub start_ms: f64,
    /// Exclusive upper edge
    pub end_ms: f64,
}

/// Bin counts of one participant row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramSeries {
    /// Participant ID
    pub participant_id: String,
    /// Count per bin, aligned with `ResponseTimeHistogram::bins`
    pub counts: Vec<usize>,
}

impl HistogramSeries {
    /// Sum of all bin counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Response-time distribution, one series per participant row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeHistogram {
    /// Width of each bin
    pub bin_width_ms: f64,
    /// Shared bin edges (empty when there is no valid response time)
    pub bins: Vec<HistogramBin>,
    /// Series; a single-participant store yields exactly one
    pub series: Vec<HistogramSeries>,
}

impl ResponseTimeHistogram {
    /// Sum of all counts across series.
    #[must_use]
    pub fn total(&self) -> usize {
        self.series.iter().map(HistogramSeries::total).sum()
    }
}

/// `ceil((max - min) / width) + 1`, or `None` when that exceeds
/// [`MAX_HISTOGRAM_BINS`] or is not finite.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn uncapped_bin_count(min: f64, max: f64, bin_width_ms: f64) -> Option<usize> {
    let span = ((max - min) / bin_width_ms).ceil();
    if !span.is_finite() || span < 0.0 || span >= MAX_HISTOGRAM_BINS as f64 {
        return None;
    }
    (span as usize)
        .checked_add(1)
        .filter(|&count| count <= MAX_HISTOGRAM_BINS)
}

/// Build the histogram over every valid response time in `sessions`.
///
/// `bin_width_ms` must be positive and finite; `AnalyticsConfig` enforces
/// this.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn response_time_histogram<S: AsRef<SessionRecord>>(
    sessions: &[S],
    policy: ParticipantMergePolicy,
    bin_width_ms: f64,
) -> ResponseTimeHistogram {
    let groups = group_sessions(sessions, policy);

    let range = groups
        .iter()
        .flat_map(|g| g.trials().filter_map(|t| t.valid_response_time_ms()))
        .fold(None, |range: Option<(f64, f64)>, rt| match range {
            None => Some((rt, rt)),
            Some((lo, hi)) => Some((lo.min(rt), hi.max(rt))),
        });

    let Some((lo, max)) = range else {
        return ResponseTimeHistogram {
            bin_width_ms,
            bins: Vec::new(),
            series: Vec::new(),
        };
    };
    let min = lo.floor();
    let bin_count = uncapped_bin_count(min, max, bin_width_ms).unwrap_or_else(|| {
        warn!(
            min_ms = min,
            max_ms = max,
            bin_width_ms,
            max_bins = MAX_HISTOGRAM_BINS,
            "response-time range too wide; last bin absorbs the overflow"
        );
        MAX_HISTOGRAM_BINS
    });

    let bins = (0..bin_count)
        .map(|i| {
            let start_ms = (i as f64).mul_add(bin_width_ms, min);
            HistogramBin {
                start_ms,
                end_ms: start_ms + bin_width_ms,
            }
        })
        .collect();

    let series = groups
        .iter()
        .map(|group| {
            let mut counts = vec![0; bin_count];
            for rt in group.trials().filter_map(|t| t.valid_response_time_ms()) {
                let index = ((rt - min) / bin_width_ms).floor() as usize;
                counts[index.min(bin_count - 1)] += 1;
            }
            HistogramSeries {
                participant_id: group.participant_id().to_string(),
                counts,
            }
        })
        .collect();

    ResponseTimeHistogram {
        bin_width_ms,
        bins,
        series,
    }
}
