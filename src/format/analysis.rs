// Single-flamegraph analysis report

use crate::config::AnalysisOptions;
use crate::format::{escape_cell, format_duration, format_percentage, table_header};
use crate::hot_path::{analyze_hot_paths, HotPath};
use crate::hotspot::{identify_hotspot_frames, HotspotFrame};
use crate::insights::generate_performance_insights;
use crate::model::{has_profile_data, Flamegraph, Frame, FrameInfo};

/// Returned instead of a report when the flamegraph has no profiles or frames
pub const NO_PROFILE_DATA_MESSAGE: &str = "No profile data available for this transaction.";

/// Render a full markdown analysis of one flamegraph
///
/// Sections, in order: summary, top slow functions (by total duration),
/// CPU hotspots (by weight), hot paths (by accumulated duration) and
/// performance insights for the slow functions.
pub fn format_flamegraph_analysis(flamegraph: &Flamegraph, options: &AnalysisOptions) -> String {
    if !has_profile_data(flamegraph) {
        return NO_PROFILE_DATA_MESSAGE.to_string();
    }

    let slow = top_slow_functions(flamegraph, options);
    let hotspots = identify_hotspot_frames(flamegraph, &options.hotspot_options());
    let hot_paths = analyze_hot_paths(flamegraph, &options.hot_path_options());

    let mut report = String::new();
    report.push_str(&format!(
        "# Profile Analysis: {}\n\n",
        flamegraph.transaction_name
    ));
    report.push_str(&summary_section(flamegraph, options));
    report.push_str(&slow_functions_section(&slow));
    report.push_str(&hotspots_section(&hotspots));
    report.push_str(&hot_paths_section(&hot_paths, options.focus_on_user_code));
    report.push_str(&insights_section(&slow));
    report
}

/// Frames with samples, ranked by total inclusive duration
fn top_slow_functions<'a>(
    flamegraph: &'a Flamegraph,
    options: &AnalysisOptions,
) -> Vec<(&'a Frame, FrameInfo)> {
    let mut slow: Vec<(&Frame, FrameInfo)> = (0..flamegraph.frames().len())
        .filter_map(|i| flamegraph.frame_at(i))
        .filter(|(frame, info)| {
            info.count > 0 && (!options.focus_on_user_code || frame.is_application)
        })
        .collect();
    slow.sort_by(|a, b| b.1.sum_duration.cmp(&a.1.sum_duration));
    slow.truncate(options.max_slow_functions);
    slow
}

fn summary_section(flamegraph: &Flamegraph, options: &AnalysisOptions) -> String {
    let view = if options.focus_on_user_code {
        "User code only"
    } else {
        "All frames"
    };

    let mut section = String::from("## Summary\n\n");
    section.push_str(&format!("- **Platform**: {}\n", flamegraph.platform));
    section.push_str(&format!("- **Threads**: {}\n", flamegraph.profiles.len()));
    section.push_str(&format!(
        "- **Total Samples**: {}\n",
        flamegraph.total_samples_all_profiles()
    ));
    section.push_str(&format!(
        "- **Frames**: {} ({} application)\n",
        flamegraph.frames().len(),
        flamegraph.application_frame_count()
    ));
    section.push_str(&format!("- **View**: {}\n\n", view));
    section
}

fn slow_functions_section(slow: &[(&Frame, FrameInfo)]) -> String {
    let mut section = String::from("## Top Slow Functions\n\n");
    if slow.is_empty() {
        section.push_str("No functions with samples.\n\n");
        return section;
    }

    section.push_str(&table_header(&[
        "Function", "Location", "Samples", "Total", "p75", "p95", "p99",
    ]));
    for (frame, info) in slow {
        section.push_str(&format!(
            "| `{}` | `{}` | {} | {} | {} | {} | {} |\n",
            escape_cell(&frame.name),
            escape_cell(&frame.location()),
            info.count,
            format_duration(info.sum_duration),
            format_duration(info.p75_duration),
            format_duration(info.p95_duration),
            format_duration(info.p99_duration),
        ));
    }
    section.push('\n');
    section
}

fn hotspots_section(hotspots: &[HotspotFrame]) -> String {
    let mut section = String::from("## CPU Hotspots\n\n");
    if hotspots.is_empty() {
        section.push_str("No hotspots found.\n\n");
        return section;
    }

    section.push_str(&table_header(&[
        "Function",
        "Location",
        "% of Samples",
        "Weight",
        "Self Time",
    ]));
    for hotspot in hotspots {
        section.push_str(&format!(
            "| `{}` | `{}` | {} | {:.1} | {} |\n",
            escape_cell(&hotspot.frame.name),
            escape_cell(&hotspot.frame.location()),
            format_percentage(hotspot.percent_of_total),
            hotspot.frame_info.weight,
            format_duration(hotspot.frame_info.sum_self_time),
        ));
    }
    section.push('\n');
    section
}

fn hot_paths_section(hot_paths: &[HotPath], focus_on_user_code: bool) -> String {
    let mut section = String::from("## Hot Paths\n\n");
    if hot_paths.is_empty() {
        section.push_str("No hot paths found.\n\n");
        return section;
    }

    for (i, path) in hot_paths.iter().enumerate() {
        section.push_str(&format!(
            "### Path {}: {} of samples, {}\n\n",
            i + 1,
            format_percentage(path.percent_of_total),
            format_duration(path.duration)
        ));
        section.push_str("```\n");
        section.push_str(&render_tree(path, focus_on_user_code));
        section.push_str("```\n\n");
    }
    section
}

/// Render a path root-first as an indented tree
fn render_tree(path: &HotPath, focus_on_user_code: bool) -> String {
    let mut tree = String::new();
    for (level, entry) in path.visible_frames(focus_on_user_code).iter().rev().enumerate() {
        if level > 0 {
            tree.push_str(&"   ".repeat(level - 1));
            tree.push_str("└─ ");
        }
        tree.push_str(&format!("{} ({})\n", entry.frame.name, entry.frame.location()));
    }
    tree
}

fn insights_section(slow: &[(&Frame, FrameInfo)]) -> String {
    let mut section = String::from("## Performance Insights\n\n");
    let mut any = false;

    for (frame, info) in slow {
        let insights: Vec<_> = generate_performance_insights(info)
            .into_iter()
            .filter(|i| i.is_actionable())
            .collect();
        if insights.is_empty() {
            continue;
        }
        any = true;

        let labels: Vec<&str> = insights.iter().map(|i| i.label()).collect();
        section.push_str(&format!(
            "- **`{}`** (`{}`): {}\n",
            frame.name,
            frame.location(),
            labels.join(", ")
        ));
        for insight in &insights {
            section.push_str(&format!("  - {}\n", insight.description()));
        }
    }

    if !any {
        section.push_str("No performance concerns detected in the top functions.\n");
    }
    section
}
