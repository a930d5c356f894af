// Raw profile chunk report

use crate::chunk::{analyze_profile_chunk, has_chunk_data, ChunkAnalysis, ChunkOptions, ProfileChunk};
use crate::format::{escape_cell, format_duration, format_percentage, table_header};

/// Returned when a chunk has no samples or frames
pub const NO_CHUNK_DATA_MESSAGE: &str = "No samples or frames found in this profile chunk.";

/// Render a markdown inspection of one profile chunk
pub fn format_profile_chunk_analysis(chunk: &ProfileChunk, options: &ChunkOptions) -> String {
    if !has_chunk_data(chunk) {
        return NO_CHUNK_DATA_MESSAGE.to_string();
    }

    let analysis = analyze_profile_chunk(chunk, options);

    let mut report = String::from("# Profile Chunk Analysis\n\n");
    report.push_str(&summary_section(&analysis));
    report.push_str(&threads_section(&analysis));
    report.push_str(&frames_section(&analysis, options));
    report
}

fn summary_section(analysis: &ChunkAnalysis) -> String {
    let mut section = String::from("## Summary\n\n");
    let optional = [
        ("Chunk ID", &analysis.chunk_id),
        ("Profiler ID", &analysis.profiler_id),
        ("Release", &analysis.release),
        ("Environment", &analysis.environment),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            section.push_str(&format!("- **{}**: {}\n", label, value));
        }
    }
    section.push_str(&format!("- **Platform**: {}\n", analysis.platform));
    section.push_str(&format!(
        "- **Samples**: {} ({} invalid)\n",
        analysis.total_samples, analysis.invalid_samples
    ));
    section.push_str(&format!("- **Unique Stacks**: {}\n", analysis.unique_stacks));
    section.push_str(&format!(
        "- **Frames**: {} ({} application)\n",
        analysis.frame_count, analysis.application_frame_count
    ));
    section.push_str(&format!(
        "- **Duration**: {}\n\n",
        format_duration((analysis.time_span_seconds * 1e9).round() as u64)
    ));
    section
}

fn threads_section(analysis: &ChunkAnalysis) -> String {
    let mut section = String::from("## Threads\n\n");
    section.push_str(&table_header(&["Thread ID", "Name", "Samples", "% of Samples"]));
    for thread in &analysis.threads {
        let share = if analysis.total_samples > 0 {
            thread.sample_count as f64 / analysis.total_samples as f64 * 100.0
        } else {
            0.0
        };
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&thread.thread_id),
            escape_cell(thread.name.as_deref().unwrap_or("-")),
            thread.sample_count,
            format_percentage(share),
        ));
    }
    section.push('\n');
    section
}

fn frames_section(analysis: &ChunkAnalysis, options: &ChunkOptions) -> String {
    let mut section = String::from("## Top Frames\n\n");
    if analysis.top_frames.is_empty() {
        let scope = if options.focus_on_user_code {
            "application frames"
        } else {
            "frames"
        };
        section.push_str(&format!("No sampled {} found.\n", scope));
        return section;
    }

    section.push_str(&table_header(&[
        "Function",
        "Location",
        "Self Samples",
        "Total Samples",
        "Self %",
        "p75 Interval",
        "p99 Interval",
    ]));
    for stats in &analysis.top_frames {
        section.push_str(&format!(
            "| `{}` | `{}` | {} | {} | {} | {} | {} |\n",
            escape_cell(stats.frame.display_name()),
            escape_cell(&stats.frame.location()),
            stats.self_samples,
            stats.total_samples,
            format_percentage(stats.self_percent),
            format_duration(stats.interval.p75),
            format_duration(stats.interval.p99),
        ));
    }
    section
}
