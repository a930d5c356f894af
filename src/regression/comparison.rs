// Fingerprint-matched frame comparison between two flamegraphs

use crate::model::{Flamegraph, Frame, FrameInfo};
use crate::regression::config::ComparisonOptions;
use crate::regression::verdict::{classify_change, percent_change, ChangeType};
use serde::Serialize;
use std::collections::HashMap;

/// Change in one fingerprint-matched frame between two runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameComparison {
    /// Frame as it appears in the current run
    pub frame: Frame,
    pub baseline: FrameInfo,
    pub current: FrameInfo,

    /// Percent change in `sum_duration` (positive is slower)
    pub percent_change: f64,
    pub change_type: ChangeType,
}

/// Map each fingerprint to its first index in the frame table
fn index_by_fingerprint(frames: &[Frame]) -> HashMap<u64, usize> {
    let mut index = HashMap::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        index.entry(frame.fingerprint).or_insert(i);
    }
    index
}

/// Compare per-frame aggregate durations between two flamegraphs
///
/// # Arguments
/// * `baseline` - Earlier (reference) flamegraph
/// * `current` - Later flamegraph
/// * `options` - Whether to keep only frames that are application code in `current`
///
/// # Returns
/// One comparison per fingerprint present in both runs, most severe first;
/// within a class, larger percent change first.
///
/// # Example
/// ```
/// use brasa::model::{Flamegraph, Frame, FrameInfo};
/// use brasa::regression::{compare_frame_stats, ChangeType, ComparisonOptions};
///
/// let frame = Frame::new("app.py", "query", 7, true);
/// let mut baseline = Flamegraph::default();
/// baseline.shared.frames = vec![frame.clone()];
/// baseline.shared.frame_infos = vec![FrameInfo { sum_duration: 100, ..Default::default() }];
///
/// let mut current = baseline.clone();
/// current.shared.frame_infos[0].sum_duration = 150;
///
/// let comparisons = compare_frame_stats(&baseline, &current, &ComparisonOptions::default());
/// assert_eq!(comparisons[0].change_type, ChangeType::MajorRegression);
/// ```
pub fn compare_frame_stats(
    baseline: &Flamegraph,
    current: &Flamegraph,
    options: &ComparisonOptions,
) -> Vec<FrameComparison> {
    let baseline_index = index_by_fingerprint(baseline.frames());
    let current_index = index_by_fingerprint(current.frames());

    let mut matched = 0usize;
    let mut comparisons: Vec<FrameComparison> = current_index
        .iter()
        .filter_map(|(fingerprint, &current_i)| {
            let &baseline_i = baseline_index.get(fingerprint)?;
            matched += 1;

            let (frame, current_info) = current.frame_at(current_i)?;
            if options.focus_on_user_code && !frame.is_application {
                return None;
            }
            let (_, baseline_info) = baseline.frame_at(baseline_i)?;

            let change = percent_change(baseline_info.sum_duration, current_info.sum_duration);
            tracing::trace!(
                name = %frame.name,
                fingerprint,
                change,
                "matched frame"
            );

            Some(FrameComparison {
                frame: frame.clone(),
                baseline: baseline_info,
                current: current_info,
                percent_change: change,
                change_type: classify_change(change),
            })
        })
        .collect();

    // Fingerprint breaks the last tie so output is independent of map order.
    comparisons.sort_by(|a, b| {
        a.change_type
            .severity_rank()
            .cmp(&b.change_type.severity_rank())
            .then_with(|| b.percent_change.total_cmp(&a.percent_change))
            .then_with(|| a.frame.fingerprint.cmp(&b.frame.fingerprint))
    });

    tracing::debug!(
        baseline_frames = baseline.frames().len(),
        current_frames = current.frames().len(),
        matched,
        reported = comparisons.len(),
        "compared frame stats"
    );

    comparisons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SharedData;

    fn flamegraph(frames: Vec<Frame>, durations: &[u64]) -> Flamegraph {
        let frame_infos = durations
            .iter()
            .map(|&d| FrameInfo {
                sum_duration: d,
                ..Default::default()
            })
            .collect();
        Flamegraph {
            shared: SharedData {
                frames,
                frame_infos,
                profiles: vec![],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_index_by_fingerprint_keeps_first() {
        let a = Frame::new("a.py", "f", 1, true).with_fingerprint(7);
        let b = Frame::new("b.py", "g", 2, true).with_fingerprint(7);
        let index = index_by_fingerprint(&[a, b]);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&7], 0);
    }

    #[test]
    fn test_matches_by_fingerprint_not_position() {
        let f = Frame::new("app.py", "f", 1, true);
        let g = Frame::new("app.py", "g", 2, true);
        let baseline = flamegraph(vec![f.clone(), g.clone()], &[100, 200]);
        let current = flamegraph(vec![g, f], &[200, 150]);

        let comparisons = compare_frame_stats(&baseline, &current, &ComparisonOptions::default());
        assert_eq!(comparisons.len(), 2);

        let f_cmp = comparisons.iter().find(|c| c.frame.name == "f").unwrap();
        assert_eq!(f_cmp.baseline.sum_duration, 100);
        assert_eq!(f_cmp.current.sum_duration, 150);

        let g_cmp = comparisons.iter().find(|c| c.frame.name == "g").unwrap();
        assert_eq!(g_cmp.percent_change, 0.0);
    }

    #[test]
    fn test_unmatched_frames_excluded() {
        let baseline = flamegraph(vec![Frame::new("app.py", "removed", 1, true)], &[100]);
        let current = flamegraph(vec![Frame::new("app.py", "added", 1, true)], &[100]);
        assert!(compare_frame_stats(&baseline, &current, &ComparisonOptions::default()).is_empty());
    }

    #[test]
    fn test_user_code_filter_checks_current_flag_only() {
        let fp = 99;
        let baseline = flamegraph(
            vec![Frame::new("lib.py", "f", 1, false).with_fingerprint(fp)],
            &[100],
        );
        let current = flamegraph(
            vec![Frame::new("lib.py", "f", 1, true).with_fingerprint(fp)],
            &[300],
        );
        let comparisons = compare_frame_stats(&baseline, &current, &ComparisonOptions::default());
        assert_eq!(comparisons.len(), 1);

        // And the reverse: library in current is dropped
        let comparisons = compare_frame_stats(&current, &baseline, &ComparisonOptions::default());
        assert!(comparisons.is_empty());
        let comparisons = compare_frame_stats(&current, &baseline, &ComparisonOptions::all_frames());
        assert_eq!(comparisons.len(), 1);
    }

    #[test]
    fn test_zero_baseline_is_no_change() {
        let f = Frame::new("app.py", "f", 1, true);
        let baseline = flamegraph(vec![f.clone()], &[0]);
        let current = flamegraph(vec![f], &[1_000_000]);

        let comparisons = compare_frame_stats(&baseline, &current, &ComparisonOptions::default());
        assert_eq!(comparisons[0].percent_change, 0.0);
        assert_eq!(comparisons[0].change_type, ChangeType::NoChange);
    }
}
