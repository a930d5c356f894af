//! Markdown rendering of analysis results
//!
//! Output is consumed by LLM tool responses and checked by literal snapshot
//! tests, so table layout, tree glyphs and section order are stable.

mod analysis;
mod chunk;
mod comparison;

pub use analysis::{format_flamegraph_analysis, NO_PROFILE_DATA_MESSAGE};
pub use chunk::{format_profile_chunk_analysis, NO_CHUNK_DATA_MESSAGE};
pub use comparison::{format_flamegraph_comparison, NO_COMPARISON_DATA_MESSAGE};

/// Format a nanosecond duration for display
///
/// Below 1ms in whole microseconds, below 1s in whole milliseconds,
/// otherwise seconds with one decimal.
///
/// # Example
/// ```
/// use brasa::format::format_duration;
///
/// assert_eq!(format_duration(500_000), "500µs");
/// assert_eq!(format_duration(50_000_000), "50ms");
/// assert_eq!(format_duration(1_500_000_000), "1.5s");
/// ```
pub fn format_duration(ns: u64) -> String {
    if ns < 1_000_000 {
        format!("{}µs", (ns as f64 / 1_000.0).round() as u64)
    } else if ns < 1_000_000_000 {
        format!("{}ms", (ns as f64 / 1_000_000.0).round() as u64)
    } else {
        format!("{:.1}s", ns as f64 / 1_000_000_000.0)
    }
}

/// Format a percentage: two decimals below 1%, one decimal otherwise
///
/// # Example
/// ```
/// use brasa::format::format_percentage;
///
/// assert_eq!(format_percentage(0.53), "0.53%");
/// assert_eq!(format_percentage(45.2), "45.2%");
/// ```
pub fn format_percentage(value: f64) -> String {
    if value < 1.0 {
        format!("{:.2}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

/// Escape a value for use inside a markdown table cell
pub(crate) fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Markdown table header plus separator row
pub(crate) fn table_header(columns: &[&str]) -> String {
    let mut header = format!("| {} |\n", columns.join(" | "));
    header.push('|');
    for _ in columns {
        header.push_str("---|");
    }
    header.push('\n');
    header
}
