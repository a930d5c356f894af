//! Percentile-based performance insights
//!
//! Fixed-threshold rules over one frame's aggregate statistics. Rules are
//! evaluated independently, so a frame can be both `high_variance` and
//! `hot_function`; `consistent` is only a fallback when nothing else fired.

use crate::model::FrameInfo;
use serde::Serialize;
use std::fmt;

/// `p99 > p75 * HIGH_VARIANCE_RATIO` flags a long tail
pub const HIGH_VARIANCE_RATIO: f64 = 3.0;

/// `p75` above this many nanoseconds (100ms) is consistently slow
pub const SLOW_P75_THRESHOLD_NS: u64 = 100_000_000;

/// More samples than this makes a frame a hot function
pub const HOT_FUNCTION_COUNT: u64 = 1000;

/// `p99 <= p75 * CONSISTENT_RATIO` is a tight distribution
pub const CONSISTENT_RATIO: f64 = 1.5;

/// Qualitative label derived from a frame's percentile stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    HighVariance,
    ConsistentlySlow,
    HotFunction,
    Consistent,
}

impl Insight {
    /// Stable snake_case label
    pub fn label(&self) -> &'static str {
        match self {
            Insight::HighVariance => "high_variance",
            Insight::ConsistentlySlow => "consistently_slow",
            Insight::HotFunction => "hot_function",
            Insight::Consistent => "consistent",
        }
    }

    /// One-line human-readable explanation
    pub fn description(&self) -> &'static str {
        match self {
            Insight::HighVariance => {
                "High variance: p99 is more than 3x p75, some calls are much slower than typical"
            }
            Insight::ConsistentlySlow => "Consistently slow: p75 exceeds 100ms",
            Insight::HotFunction => "Hot function: appears in more than 1000 samples",
            Insight::Consistent => "Consistent performance: p99 within 1.5x of p75",
        }
    }

    /// Whether this insight calls for attention
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Insight::Consistent)
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derive insights from a frame's aggregate statistics
///
/// # Example
/// ```
/// use brasa::insights::{generate_performance_insights, Insight};
/// use brasa::model::FrameInfo;
///
/// let info = FrameInfo {
///     count: 5000,
///     p75_duration: 1_000_000,
///     p99_duration: 10_000_000,
///     ..Default::default()
/// };
/// let insights = generate_performance_insights(&info);
/// assert_eq!(insights, vec![Insight::HighVariance, Insight::HotFunction]);
/// ```
pub fn generate_performance_insights(frame_info: &FrameInfo) -> Vec<Insight> {
    let p75 = frame_info.p75_duration as f64;
    let p99 = frame_info.p99_duration as f64;

    let mut insights = Vec::new();

    if p99 > p75 * HIGH_VARIANCE_RATIO {
        insights.push(Insight::HighVariance);
    }
    if frame_info.p75_duration > SLOW_P75_THRESHOLD_NS {
        insights.push(Insight::ConsistentlySlow);
    }
    if frame_info.count > HOT_FUNCTION_COUNT {
        insights.push(Insight::HotFunction);
    }
    if insights.is_empty() && p99 <= p75 * CONSISTENT_RATIO {
        insights.push(Insight::Consistent);
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(count: u64, p75: u64, p99: u64) -> FrameInfo {
        FrameInfo {
            count,
            p75_duration: p75,
            p95_duration: p75,
            p99_duration: p99,
            ..Default::default()
        }
    }

    #[test]
    fn test_high_variance() {
        let insights = generate_performance_insights(&info(10, 1_000_000, 3_000_001));
        assert_eq!(insights, vec![Insight::HighVariance]);
    }

    #[test]
    fn test_exactly_three_times_is_not_high_variance() {
        let insights = generate_performance_insights(&info(10, 1_000_000, 3_000_000));
        // Not consistent either: 3x > 1.5x
        assert!(insights.is_empty());
    }

    #[test]
    fn test_consistently_slow() {
        let insights = generate_performance_insights(&info(10, 150_000_000, 160_000_000));
        assert_eq!(insights, vec![Insight::ConsistentlySlow]);
    }

    #[test]
    fn test_slow_threshold_is_exclusive() {
        let insights = generate_performance_insights(&info(10, 100_000_000, 100_000_000));
        assert_eq!(insights, vec![Insight::Consistent]);
    }

    #[test]
    fn test_hot_function() {
        assert_eq!(
            generate_performance_insights(&info(1001, 1_000, 1_000)),
            vec![Insight::HotFunction]
        );
        assert_eq!(
            generate_performance_insights(&info(1000, 1_000, 1_000)),
            vec![Insight::Consistent]
        );
    }

    #[test]
    fn test_rules_are_independent() {
        let insights = generate_performance_insights(&info(5000, 200_000_000, 900_000_000));
        assert_eq!(
            insights,
            vec![
                Insight::HighVariance,
                Insight::ConsistentlySlow,
                Insight::HotFunction
            ]
        );
    }

    #[test]
    fn test_consistent_boundary() {
        assert_eq!(
            generate_performance_insights(&info(10, 1_000_000, 1_500_000)),
            vec![Insight::Consistent]
        );
        assert!(generate_performance_insights(&info(10, 1_000_000, 1_500_001)).is_empty());
    }

    #[test]
    fn test_zero_stats_are_consistent() {
        assert_eq!(
            generate_performance_insights(&FrameInfo::default()),
            vec![Insight::Consistent]
        );
    }

    #[test]
    fn test_labels_and_serialization() {
        assert_eq!(Insight::HighVariance.label(), "high_variance");
        assert_eq!(Insight::ConsistentlySlow.to_string(), "consistently_slow");
        assert_eq!(
            serde_json::to_string(&Insight::HotFunction).unwrap(),
            "\"hot_function\""
        );
        assert!(!Insight::Consistent.is_actionable());
        assert!(Insight::HighVariance.is_actionable());
    }
}
