//! Brasa - Flamegraph profile analysis for LLM-facing tooling
//!
//! This library turns already-fetched sampled CPU profiles into ranked hot
//! paths, ranked hotspot functions, percentile-based insights and cross-run
//! regression comparisons, and renders them as markdown.
//!
//! Every analysis is a pure function over an immutable snapshot: no I/O, no
//! shared state, safe to run concurrently without synchronization.
//!
//! # Example
//! ```
//! use brasa::config::AnalysisOptions;
//! use brasa::format::format_flamegraph_analysis;
//! use brasa::model::{has_profile_data, Flamegraph};
//!
//! let flamegraph = Flamegraph::from_json_str(r#"{"platform": "python"}"#).unwrap();
//! assert!(!has_profile_data(&flamegraph));
//!
//! let report = format_flamegraph_analysis(&flamegraph, &AnalysisOptions::default());
//! assert_eq!(report, "No profile data available for this transaction.");
//! ```

pub mod call_stack;
pub mod chunk;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod hot_path;
pub mod hotspot;
pub mod insights;
pub mod model;
pub mod regression;
pub mod stats;

pub use error::{BrasaError, Result};
