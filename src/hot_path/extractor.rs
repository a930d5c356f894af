// Hot path merging and ranking
//
// Samples are grouped by their exact ordered frame-index sequence, so
// [a, b] and [b, a] are different paths. Ranking is by accumulated
// duration, which reflects wall-clock cost under variable sample weights.

use crate::call_stack::{count_unresolved, reconstruct_call_stack, CallStackFrame};
use crate::model::{Flamegraph, Frame, FrameInfo, Profile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Options for hot path extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotPathOptions {
    /// Render only application frames of each path
    pub focus_on_user_code: bool,

    /// Maximum number of paths returned
    pub max_hot_paths: usize,
}

impl Default for HotPathOptions {
    fn default() -> Self {
        Self {
            focus_on_user_code: true,
            max_hot_paths: 10,
        }
    }
}

/// A merged, ranked call-stack shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotPath {
    /// Frame indices, leaf-first
    pub stack_indices: Vec<usize>,

    /// Sum of `sample_counts` over every merged sample
    pub sample_count: u64,

    /// Sum of `sample_durations_ns` over every merged sample
    pub duration: u64,

    /// Sum of `weights` over every merged sample
    pub weight: f64,

    /// Share of the analyzed profile's samples (0-100)
    pub percent_of_total: f64,

    /// Reconstructed stack, leaf-first
    pub call_stack: Vec<CallStackFrame>,

    /// `call_stack` restricted to application frames
    pub user_code_frames: Vec<CallStackFrame>,
}

impl HotPath {
    /// Frames to render for this path
    ///
    /// With `focus_on_user_code`, the application frames; a path with no
    /// application code at all falls back to the full stack.
    pub fn visible_frames(&self, focus_on_user_code: bool) -> &[CallStackFrame] {
        if focus_on_user_code && !self.user_code_frames.is_empty() {
            &self.user_code_frames
        } else {
            &self.call_stack
        }
    }

    /// The innermost frame, if the stack is non-empty
    pub fn leaf(&self) -> Option<&CallStackFrame> {
        self.call_stack.first()
    }
}

/// Accumulator for one distinct stack shape
struct PathGroup {
    root_first: Vec<usize>,
    sample_count: u64,
    duration: u64,
    weight: f64,
}

/// Extract the top hot paths of the designated profile
///
/// # Arguments
/// * `flamegraph` - Flamegraph payload; only `profiles[0]` is analyzed
/// * `options` - Path count cap and rendered view selection
///
/// # Returns
/// Paths sorted by accumulated duration (descending), at most
/// `options.max_hot_paths` of them. Empty when there are no profiles or the
/// designated profile has no samples.
///
/// # Example
/// ```
/// use brasa::hot_path::{analyze_hot_paths, HotPathOptions};
/// use brasa::model::{Flamegraph, Frame, FrameInfo, Profile};
///
/// let mut fg = Flamegraph::default();
/// fg.shared.frames = vec![Frame::new("app.py", "main", 1, true)];
/// fg.shared.frame_infos = vec![FrameInfo::default()];
/// fg.profiles.push(Profile {
///     samples: vec![vec![0], vec![0]],
///     sample_counts: vec![1, 3],
///     sample_durations_ns: vec![10, 30],
///     weights: vec![1.0, 3.0],
///     ..Default::default()
/// });
///
/// let paths = analyze_hot_paths(&fg, &HotPathOptions::default());
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].sample_count, 4);
/// assert_eq!(paths[0].percent_of_total, 100.0);
/// ```
pub fn analyze_hot_paths(flamegraph: &Flamegraph, options: &HotPathOptions) -> Vec<HotPath> {
    let Some(profile) = flamegraph.profiles.first() else {
        return Vec::new();
    };

    let mut paths = merge_hot_paths(profile, flamegraph.frames(), flamegraph.frame_infos());
    paths.truncate(options.max_hot_paths);
    paths
}

/// Merge every sample of `profile` into hot paths, sorted but not truncated
pub fn merge_hot_paths(
    profile: &Profile,
    frames: &[Frame],
    frame_infos: &[FrameInfo],
) -> Vec<HotPath> {
    let total_samples = profile.total_samples();
    if total_samples == 0 {
        return Vec::new();
    }

    let mut groups: Vec<PathGroup> = Vec::new();
    let mut by_stack: HashMap<&[usize], usize> = HashMap::new();

    for i in 0..profile.sample_len() {
        let stack = profile.samples[i].as_slice();
        let slot = *by_stack.entry(stack).or_insert_with(|| {
            groups.push(PathGroup {
                root_first: stack.to_vec(),
                sample_count: 0,
                duration: 0,
                weight: 0.0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.sample_count = group.sample_count.saturating_add(profile.sample_counts[i]);
        group.duration = group.duration.saturating_add(profile.duration_at(i));
        group.weight += profile.weight_at(i);
    }

    let mut unresolved = 0;
    let mut paths: Vec<HotPath> = groups
        .into_iter()
        .map(|group| {
            // Payload stacks are root-first; call stacks are leaf-first.
            let mut stack_indices = group.root_first;
            stack_indices.reverse();
            unresolved += count_unresolved(&stack_indices, frames.len());

            let call_stack = reconstruct_call_stack(&stack_indices, frames, frame_infos);
            let user_code_frames = call_stack
                .iter()
                .filter(|f| f.frame.is_application)
                .cloned()
                .collect();

            HotPath {
                stack_indices,
                sample_count: group.sample_count,
                duration: group.duration,
                weight: group.weight,
                percent_of_total: group.sample_count as f64 / total_samples as f64 * 100.0,
                call_stack,
                user_code_frames,
            }
        })
        .collect();

    if unresolved > 0 {
        tracing::warn!(
            unresolved,
            frames = frames.len(),
            "hot path stacks reference frames outside the frame table"
        );
    }

    // Stable sort: equal durations keep first-seen order.
    paths.sort_by(|a, b| b.duration.cmp(&a.duration));

    tracing::debug!(
        samples = profile.sample_len(),
        total_samples,
        merged_paths = paths.len(),
        "merged hot paths"
    );

    paths
}
