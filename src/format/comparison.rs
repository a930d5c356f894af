// Baseline vs. current comparison report

use crate::config::AnalysisOptions;
use crate::format::{escape_cell, format_duration, table_header};
use crate::model::{has_profile_data, Flamegraph};
use crate::regression::{
    compare_frame_stats, ChangeType, ComparisonSummary, FrameComparison,
    IMPROVEMENT_THRESHOLD_PCT, MAJOR_REGRESSION_THRESHOLD_PCT, MINOR_REGRESSION_THRESHOLD_PCT,
};

/// Returned when either flamegraph has no profiles or frames
pub const NO_COMPARISON_DATA_MESSAGE: &str =
    "Cannot compare profiles: baseline or current flamegraph has no profile data.";

/// Render a markdown comparison of two flamegraphs
///
/// Only fingerprint-matched frames are reported. Regressions are listed
/// most severe first, improvements largest first.
pub fn format_flamegraph_comparison(
    baseline: &Flamegraph,
    current: &Flamegraph,
    options: &AnalysisOptions,
) -> String {
    if !has_profile_data(baseline) || !has_profile_data(current) {
        return NO_COMPARISON_DATA_MESSAGE.to_string();
    }

    let comparisons = compare_frame_stats(baseline, current, &options.comparison_options());
    let summary = ComparisonSummary::from_comparisons(&comparisons);

    let mut report = String::new();
    report.push_str(&format!(
        "# Profile Comparison: {}\n\n",
        current.transaction_name
    ));
    report.push_str(&summary_section(baseline, current, &summary));

    let regressions: Vec<&FrameComparison> = comparisons
        .iter()
        .filter(|c| c.change_type.is_regression())
        .collect();
    // Ranked order puts improvements last, smallest drop first.
    let improvements: Vec<&FrameComparison> = comparisons
        .iter()
        .rev()
        .take_while(|c| c.change_type == ChangeType::Improvement)
        .collect();

    if regressions.is_empty() && improvements.is_empty() {
        report.push_str("No significant performance changes detected.\n");
        return report;
    }

    if !regressions.is_empty() {
        report.push_str("## Regressions\n\n");
        report.push_str(&comparison_table(&regressions));
        report.push('\n');
    }
    if !improvements.is_empty() {
        report.push_str("## Improvements\n\n");
        report.push_str(&comparison_table(&improvements));
        report.push('\n');
    }
    report
}

fn summary_section(
    baseline: &Flamegraph,
    current: &Flamegraph,
    summary: &ComparisonSummary,
) -> String {
    let mut section = String::from("## Summary\n\n");
    section.push_str(&format!(
        "- **Baseline Samples**: {}\n",
        baseline.total_samples_all_profiles()
    ));
    section.push_str(&format!(
        "- **Current Samples**: {}\n",
        current.total_samples_all_profiles()
    ));
    section.push_str(&format!("- **Matched Functions**: {}\n", summary.total()));
    section.push_str(&format!(
        "- **Major Regressions** (>{:.0}%): {}\n",
        MAJOR_REGRESSION_THRESHOLD_PCT, summary.major_regressions
    ));
    section.push_str(&format!(
        "- **Minor Regressions** (>{:.0}%): {}\n",
        MINOR_REGRESSION_THRESHOLD_PCT, summary.minor_regressions
    ));
    section.push_str(&format!(
        "- **Improvements** (<{:.0}%): {}\n",
        IMPROVEMENT_THRESHOLD_PCT, summary.improvements
    ));
    section.push_str(&format!("- **No Change**: {}\n\n", summary.no_change));
    section
}

fn comparison_table(rows: &[&FrameComparison]) -> String {
    let mut table = table_header(&[
        "Function", "Location", "Baseline", "Current", "Change", "Status",
    ]);
    for comparison in rows {
        table.push_str(&format!(
            "| `{}` | `{}` | {} | {} | {:+.1}% | {} |\n",
            escape_cell(&comparison.frame.name),
            escape_cell(&comparison.frame.location()),
            format_duration(comparison.baseline.sum_duration),
            format_duration(comparison.current.sum_duration),
            comparison.percent_change,
            comparison.change_type.marker(),
        ));
    }
    table
}
