use anyhow::{Context, Result};
use brasa::chunk::{analyze_profile_chunk, ProfileChunk};
use brasa::cli::{Cli, Command, OutputFormat};
use brasa::config::BrasaConfig;
use brasa::format::{
    format_flamegraph_analysis, format_flamegraph_comparison, format_profile_chunk_analysis,
};
use brasa::hot_path::{analyze_hot_paths, HotPath};
use brasa::hotspot::{identify_hotspot_frames, HotspotFrame};
use brasa::insights::{generate_performance_insights, Insight};
use brasa::model::{require_profile_data, Flamegraph};
use brasa::regression::{compare_frame_stats, ComparisonSummary, FrameComparison};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise `RUST_LOG` or warn
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Structured output of `brasa analyze --format json`
#[derive(Serialize)]
struct AnalysisRecord<'a> {
    transaction_name: &'a str,
    platform: &'a str,
    has_profile_data: bool,
    hot_paths: Vec<HotPath>,
    hotspots: Vec<HotspotInsights>,
}

#[derive(Serialize)]
struct HotspotInsights {
    #[serde(flatten)]
    hotspot: HotspotFrame,
    insights: Vec<Insight>,
}

/// Structured output of `brasa compare --format json`
#[derive(Serialize)]
struct ComparisonRecord {
    has_profile_data: bool,
    summary: ComparisonSummary,
    comparisons: Vec<FrameComparison>,
}

fn load_config(path: Option<&Path>) -> Result<BrasaConfig> {
    match path {
        Some(path) => BrasaConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(BrasaConfig::default()),
    }
}

fn load_flamegraph(path: &Path) -> Result<Flamegraph> {
    Flamegraph::from_json_file(path)
        .with_context(|| format!("Failed to load flamegraph from {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_analyze(
    config: &BrasaConfig,
    file: &Path,
    all_frames: bool,
    max_hot_paths: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut options = config.analysis;
    if all_frames {
        options.focus_on_user_code = false;
    }
    if let Some(max) = max_hot_paths {
        options.max_hot_paths = max;
    }
    options.validate().map_err(anyhow::Error::msg)?;

    let flamegraph = load_flamegraph(file)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_flamegraph_analysis(&flamegraph, &options));
            Ok(())
        }
        OutputFormat::Json => {
            if let Err(err) = require_profile_data(&flamegraph) {
                tracing::warn!(%err, "skipping analysis");
                return print_json(&AnalysisRecord {
                    transaction_name: &flamegraph.transaction_name,
                    platform: &flamegraph.platform,
                    has_profile_data: false,
                    hot_paths: Vec::new(),
                    hotspots: Vec::new(),
                });
            }

            let hotspots = identify_hotspot_frames(&flamegraph, &options.hotspot_options())
                .into_iter()
                .map(|hotspot| HotspotInsights {
                    insights: generate_performance_insights(&hotspot.frame_info),
                    hotspot,
                })
                .collect();
            print_json(&AnalysisRecord {
                transaction_name: &flamegraph.transaction_name,
                platform: &flamegraph.platform,
                has_profile_data: true,
                hot_paths: analyze_hot_paths(&flamegraph, &options.hot_path_options()),
                hotspots,
            })
        }
    }
}

fn run_compare(
    config: &BrasaConfig,
    baseline: &Path,
    current: &Path,
    all_frames: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut options = config.analysis;
    if all_frames {
        options.focus_on_user_code = false;
    }

    let baseline = load_flamegraph(baseline)?;
    let current = load_flamegraph(current)?;

    match format {
        OutputFormat::Text => {
            print!(
                "{}",
                format_flamegraph_comparison(&baseline, &current, &options)
            );
            Ok(())
        }
        OutputFormat::Json => {
            if let Err(err) =
                require_profile_data(&baseline).and_then(|()| require_profile_data(&current))
            {
                tracing::warn!(%err, "skipping comparison");
                return print_json(&ComparisonRecord {
                    has_profile_data: false,
                    summary: ComparisonSummary::default(),
                    comparisons: Vec::new(),
                });
            }

            let comparisons =
                compare_frame_stats(&baseline, &current, &options.comparison_options());
            print_json(&ComparisonRecord {
                has_profile_data: true,
                summary: ComparisonSummary::from_comparisons(&comparisons),
                comparisons,
            })
        }
    }
}

fn run_chunk(
    config: &BrasaConfig,
    file: &Path,
    user_code: bool,
    max_frames: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut options = config.chunk;
    if user_code {
        options.focus_on_user_code = true;
    }
    if let Some(max) = max_frames {
        anyhow::ensure!(max > 0, "--max-frames must be at least 1");
        options.max_frames = max;
    }

    let chunk = ProfileChunk::from_json_file(file)
        .with_context(|| format!("Failed to load profile chunk from {}", file.display()))?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_profile_chunk_analysis(&chunk, &options));
            Ok(())
        }
        OutputFormat::Json => print_json(&analyze_profile_chunk(&chunk, &options)),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Analyze {
            file,
            all_frames,
            max_hot_paths,
            format,
        } => run_analyze(&config, &file, all_frames, max_hot_paths, format),
        Command::Compare {
            baseline,
            current,
            all_frames,
            format,
        } => run_compare(&config, &baseline, &current, all_frames, format),
        Command::Chunk {
            file,
            user_code,
            max_frames,
            format,
        } => run_chunk(&config, &file, user_code, max_frames, format),
    }
}
