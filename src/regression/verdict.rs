// Change classification for matched frames
//
// First match wins: > +20% major regression, > +10% minor regression,
// < -10% improvement, anything else no change.

use crate::regression::comparison::FrameComparison;
use crate::regression::config::{
    IMPROVEMENT_THRESHOLD_PCT, MAJOR_REGRESSION_THRESHOLD_PCT, MINOR_REGRESSION_THRESHOLD_PCT,
};
use serde::Serialize;
use std::fmt;

/// Severity class of a frame's duration change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    MajorRegression,
    MinorRegression,
    NoChange,
    Improvement,
}

impl ChangeType {
    /// Sort rank: most severe first
    pub fn severity_rank(&self) -> u8 {
        match self {
            ChangeType::MajorRegression => 0,
            ChangeType::MinorRegression => 1,
            ChangeType::NoChange => 2,
            ChangeType::Improvement => 3,
        }
    }

    /// Stable snake_case label
    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::MajorRegression => "major_regression",
            ChangeType::MinorRegression => "minor_regression",
            ChangeType::NoChange => "no_change",
            ChangeType::Improvement => "improvement",
        }
    }

    /// Status marker used in rendered tables
    pub fn marker(&self) -> &'static str {
        match self {
            ChangeType::MajorRegression => "🔴 Major regression",
            ChangeType::MinorRegression => "🟡 Minor regression",
            ChangeType::NoChange => "⚪ No change",
            ChangeType::Improvement => "🟢 Improvement",
        }
    }

    pub fn is_regression(&self) -> bool {
        matches!(
            self,
            ChangeType::MajorRegression | ChangeType::MinorRegression
        )
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percent change in aggregate duration from baseline to current
///
/// A zero baseline yields 0 (no change) rather than infinity or NaN.
pub fn percent_change(baseline_ns: u64, current_ns: u64) -> f64 {
    if baseline_ns == 0 {
        return 0.0;
    }
    (current_ns as f64 - baseline_ns as f64) / baseline_ns as f64 * 100.0
}

/// Classify a percent change
///
/// # Example
/// ```
/// use brasa::regression::{classify_change, ChangeType};
///
/// assert_eq!(classify_change(30.0), ChangeType::MajorRegression);
/// assert_eq!(classify_change(15.0), ChangeType::MinorRegression);
/// assert_eq!(classify_change(-20.0), ChangeType::Improvement);
/// assert_eq!(classify_change(5.0), ChangeType::NoChange);
/// ```
pub fn classify_change(percent_change: f64) -> ChangeType {
    if percent_change > MAJOR_REGRESSION_THRESHOLD_PCT {
        ChangeType::MajorRegression
    } else if percent_change > MINOR_REGRESSION_THRESHOLD_PCT {
        ChangeType::MinorRegression
    } else if percent_change < IMPROVEMENT_THRESHOLD_PCT {
        ChangeType::Improvement
    } else {
        ChangeType::NoChange
    }
}

/// Count of comparisons per change class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub major_regressions: usize,
    pub minor_regressions: usize,
    pub no_change: usize,
    pub improvements: usize,
}

impl ComparisonSummary {
    pub fn from_comparisons(comparisons: &[FrameComparison]) -> Self {
        let mut summary = Self::default();
        for comparison in comparisons {
            match comparison.change_type {
                ChangeType::MajorRegression => summary.major_regressions += 1,
                ChangeType::MinorRegression => summary.minor_regressions += 1,
                ChangeType::NoChange => summary.no_change += 1,
                ChangeType::Improvement => summary.improvements += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.major_regressions + self.minor_regressions + self.no_change + self.improvements
    }

    pub fn has_regressions(&self) -> bool {
        self.major_regressions + self.minor_regressions > 0
    }
}
