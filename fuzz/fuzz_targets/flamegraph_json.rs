#![no_main]

use brasa::config::AnalysisOptions;
use brasa::format::{format_flamegraph_analysis, format_flamegraph_comparison};
use brasa::model::Flamegraph;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Any payload that decodes must analyze without panicking,
        // whatever its frame indices and array lengths look like
        if let Ok(flamegraph) = Flamegraph::from_json_str(input) {
            let _ = format_flamegraph_analysis(&flamegraph, &AnalysisOptions::default());
            let _ = format_flamegraph_analysis(&flamegraph, &AnalysisOptions::all_frames());
            let _ = format_flamegraph_comparison(
                &flamegraph,
                &flamegraph,
                &AnalysisOptions::default(),
            );
        }
    }
});
