//! Result formatting for display and export
//!
//! Formatting is lossy and one-way; only the forward mapping is stable.
//!
//! Response-time strings:
//!
//! | Input (rounded ms) | Output |
//! |--------------------|--------|
//! | `<= 0`, NaN | `0ms` |
//! | `< 1000` | `812ms` |
//! | `< 60000` | `1.500s (1500ms)` |
//! | otherwise | `1:05 (65000ms)` |

use crate::config::{AnalyticsConfig, DEFAULT_DISPLAY_DECIMALS};
use crate::session::ConditionId;
use crate::stats::{ConditionStats, GlobalStats};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;

/// Human-readable response time.
///
/// # Examples
///
/// ```
/// use judgment_analytics::format::format_response_time;
///
/// assert_eq!(format_response_time(0.0), "0ms");
/// assert_eq!(format_response_time(812.0), "812ms");
/// assert_eq!(format_response_time(1500.0), "1.500s (1500ms)");
/// assert_eq!(format_response_time(65_000.0), "1:05 (65000ms)");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_response_time(ms: f64) -> String {
    let rounded = ms.round();
    if !rounded.is_finite() || rounded <= 0.0 {
        return "0ms".to_string();
    }
    let ms = rounded as u64;

    if ms < MS_PER_SECOND {
        format!("{ms}ms")
    } else if ms < MS_PER_MINUTE {
        format!(
            "{}.{:03}s ({ms}ms)",
            ms / MS_PER_SECOND,
            ms % MS_PER_SECOND
        )
    } else {
        format!(
            "{}:{:02} ({ms}ms)",
            ms / MS_PER_MINUTE,
            (ms % MS_PER_MINUTE) / MS_PER_SECOND
        )
    }
}

/// Round `value` to `decimals` places (half away from zero).
#[must_use]
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (value * factor).round() / factor
}

/// Display label of a condition.
#[must_use]
pub const fn condition_label(condition: ConditionId) -> &'static str {
    match condition {
        ConditionId::SimpleNonAmbiguous => "Simple, non-ambiguous",
        ConditionId::ComplexNonAmbiguous => "Complex, non-ambiguous",
        ConditionId::AmbiguousEasy => "Ambiguous, easy",
        ConditionId::AmbiguousDifficult => "Ambiguous, difficult",
    }
}

/// Formatter bound to a fixed number of display decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFormatter {
    decimals: u8,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_DECIMALS)
    }
}

impl ResultFormatter {
    /// Create a formatter rounding to `decimals` places.
    #[must_use]
    pub const fn new(decimals: u8) -> Self {
        Self { decimals }
    }

    /// Create a formatter from the configured display decimals.
    #[must_use]
    pub const fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.display_decimals())
    }

    /// Configured decimals.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Round a value to the configured decimals.
    #[must_use]
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.decimals)
    }

    /// `66.7%`
    #[must_use]
    pub fn percentage(&self, pct: f64) -> String {
        format!("{:.*}%", usize::from(self.decimals), self.round(pct))
    }

    /// `866.7ms`
    #[must_use]
    pub fn mean_ms(&self, ms: f64) -> String {
        format!("{:.*}ms", usize::from(self.decimals), self.round(ms))
    }

    /// Response time, see [`format_response_time`].
    #[must_use]
    pub fn response_time(&self, ms: f64) -> String {
        format_response_time(ms)
    }

    /// Global stats with rounded percentage and mean.
    #[must_use]
    pub fn round_global(&self, stats: &GlobalStats) -> GlobalStats {
        GlobalStats {
            accuracy_pct: self.round(stats.accuracy_pct),
            avg_response_time_ms: self.round(stats.avg_response_time_ms),
            ..*stats
        }
    }

    /// Condition stats with rounded percentages and means.
    #[must_use]
    pub fn round_conditions(&self, stats: &[ConditionStats]) -> Vec<ConditionStats> {
        stats
            .iter()
            .map(|s| ConditionStats {
                accuracy_pct: self.round(s.accuracy_pct),
                avg_response_time_ms: self.round(s.avg_response_time_ms),
                ..*s
            })
            .collect()
    }
}
