//! Percentile statistics over raw duration samples
//!
//! Used where the payload carries raw observations instead of precomputed
//! aggregates (profile chunks). Percentiles are linearly interpolated
//! between the closest ranks.

use serde::Serialize;

/// Calculate a percentile (0-100) from ascending-sorted data
///
/// Returns 0 for empty input.
pub fn calculate_percentile(sorted_data: &[f64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    if sorted_data.len() == 1 {
        return sorted_data[0];
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f64;
        sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight
    }
}

/// Tail percentiles of a duration distribution, in nanoseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DurationPercentiles {
    pub p75: u64,
    pub p95: u64,
    pub p99: u64,
}

impl DurationPercentiles {
    /// Compute percentiles from unsorted nanosecond durations
    pub fn from_durations(durations: &[u64]) -> Self {
        if durations.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<f64> = durations.iter().map(|&d| d as f64).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Self {
            p75: calculate_percentile(&sorted, 75.0).round() as u64,
            p95: calculate_percentile(&sorted, 95.0).round() as u64,
            p99: calculate_percentile(&sorted, 99.0).round() as u64,
        }
    }
}
