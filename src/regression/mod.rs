// Cross-run regression comparison for flamegraphs
//
// Matches frames between a baseline and a current flamegraph by their
// stable fingerprint and classifies the change in aggregate duration.
//
// Frames present in only one run (added or removed code paths) are not
// reported: this measures performance change of matched code, not a code
// diff. Array positions are never compared across runs.

mod comparison;
mod config;
mod verdict;

pub use comparison::{compare_frame_stats, FrameComparison};
pub use config::{
    ComparisonOptions, IMPROVEMENT_THRESHOLD_PCT, MAJOR_REGRESSION_THRESHOLD_PCT,
    MINOR_REGRESSION_THRESHOLD_PCT,
};
pub use verdict::{classify_change, percent_change, ChangeType, ComparisonSummary};
