//! CLI argument parsing for Brasa

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown report (default)
    Text,
    /// JSON records for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "brasa")]
#[command(version)]
#[command(about = "Flamegraph profile analysis: hot paths, hotspots and regressions", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    /// Load analysis options from a TOML file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a saved flamegraph payload
    Analyze {
        /// Flamegraph JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include library and system frames
        #[arg(long = "all-frames")]
        all_frames: bool,

        /// Number of hot paths to report
        #[arg(long = "max-hot-paths", value_name = "N")]
        max_hot_paths: Option<usize>,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare a baseline flamegraph against a current one
    Compare {
        /// Baseline flamegraph JSON file
        #[arg(value_name = "BASELINE")]
        baseline: PathBuf,

        /// Current flamegraph JSON file
        #[arg(value_name = "CURRENT")]
        current: PathBuf,

        /// Include library and system frames
        #[arg(long = "all-frames")]
        all_frames: bool,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Inspect a raw profile chunk
    Chunk {
        /// Profile chunk JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only list application frames
        #[arg(long = "user-code")]
        user_code: bool,

        /// Number of frames to list
        #[arg(long = "max-frames", value_name = "N")]
        max_frames: Option<usize>,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
