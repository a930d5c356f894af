// Hotspot identification for flamegraph profiles
//
// Ranks individual functions by aggregate cost across every stack they
// appear in, irrespective of stack shape. Percentages here answer "share of
// total CPU time for a function", so the denominator is the sample total
// across all profiles, not just the designated one used for hot paths.

use crate::model::{Flamegraph, Frame, FrameInfo};
use serde::{Deserialize, Serialize};

/// Maximum number of hotspot frames reported
pub const HOTSPOT_LIMIT: usize = 20;

/// Options for hotspot identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HotspotOptions {
    /// Only report application frames
    pub focus_on_user_code: bool,
}

/// A function ranked by its aggregate cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotFrame {
    pub frame: Frame,
    pub frame_info: FrameInfo,

    /// `frame_info.count` as a share of all samples across all profiles (0-100)
    pub percent_of_total: f64,

    /// Index into the shared frame table
    pub frame_index: usize,
}

/// Identify the most expensive functions in a flamegraph
///
/// # Arguments
/// * `flamegraph` - Flamegraph payload
/// * `options` - Whether to restrict to application frames
///
/// # Returns
/// Up to [`HOTSPOT_LIMIT`] frames sorted by `frame_info.weight` (descending)
///
/// # Example
/// ```
/// use brasa::hotspot::{identify_hotspot_frames, HotspotOptions};
/// use brasa::model::{Flamegraph, Frame, FrameInfo, Profile};
///
/// let mut fg = Flamegraph::default();
/// fg.shared.frames = vec![
///     Frame::new("app.py", "cheap", 1, true),
///     Frame::new("app.py", "expensive", 2, true),
/// ];
/// fg.shared.frame_infos = vec![
///     FrameInfo { count: 2, weight: 1.0, ..Default::default() },
///     FrameInfo { count: 8, weight: 9.0, ..Default::default() },
/// ];
/// fg.profiles.push(Profile { sample_counts: vec![10], ..Default::default() });
///
/// let hotspots = identify_hotspot_frames(&fg, &HotspotOptions::default());
/// assert_eq!(hotspots[0].frame.name, "expensive");
/// assert_eq!(hotspots[0].percent_of_total, 80.0);
/// ```
pub fn identify_hotspot_frames(
    flamegraph: &Flamegraph,
    options: &HotspotOptions,
) -> Vec<HotspotFrame> {
    let total_samples = flamegraph.total_samples_all_profiles();

    let mut hotspots: Vec<HotspotFrame> = flamegraph
        .frames()
        .iter()
        .enumerate()
        .filter(|(_, frame)| !options.focus_on_user_code || frame.is_application)
        .map(|(frame_index, frame)| {
            let frame_info = flamegraph
                .frame_infos()
                .get(frame_index)
                .copied()
                .unwrap_or_default();
            let percent_of_total = if total_samples > 0 {
                frame_info.count as f64 / total_samples as f64 * 100.0
            } else {
                0.0
            };

            HotspotFrame {
                frame: frame.clone(),
                frame_info,
                percent_of_total,
                frame_index,
            }
        })
        .collect();

    hotspots.sort_by(|a, b| b.frame_info.weight.total_cmp(&a.frame_info.weight));
    hotspots.truncate(HOTSPOT_LIMIT);

    tracing::debug!(
        total_samples,
        hotspots = hotspots.len(),
        focus_on_user_code = options.focus_on_user_code,
        "identified hotspot frames"
    );

    hotspots
}
