// Options and policy thresholds for regression comparison
//
// Thresholds are fixed policy, exposed as constants for tests and
// rendering. Only the user-code filter is a per-call option.

use serde::{Deserialize, Serialize};

/// Percent increase above which a change is a major regression
pub const MAJOR_REGRESSION_THRESHOLD_PCT: f64 = 20.0;

/// Percent increase above which a change is a minor regression
pub const MINOR_REGRESSION_THRESHOLD_PCT: f64 = 10.0;

/// Percent change below which (i.e. more negative than) a change is an improvement
pub const IMPROVEMENT_THRESHOLD_PCT: f64 = -10.0;

/// Options for comparing two flamegraphs
///
/// # Example
/// ```
/// use brasa::regression::ComparisonOptions;
///
/// let options = ComparisonOptions::default();
/// assert!(options.focus_on_user_code);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Drop comparisons whose current-run frame is not application code
    ///
    /// Only the current run's flag is consulted; a frame reclassified as
    /// library code since the baseline is dropped.
    pub focus_on_user_code: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            focus_on_user_code: true,
        }
    }
}

impl ComparisonOptions {
    /// Compare every matched frame, library code included
    pub fn all_frames() -> Self {
        Self {
            focus_on_user_code: false,
        }
    }
}
