//! Call stack reconstruction
//!
//! Expands a flat sequence of frame indices into a structured call stack.
//! Input is leaf-first: index 0 is the innermost (currently executing)
//! frame, the last index is the root.

use crate::model::{Frame, FrameInfo};
use serde::Serialize;

/// One entry of a reconstructed call stack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallStackFrame {
    pub frame: Frame,
    pub frame_info: FrameInfo,

    /// Distance from the leaf (leaf is 0)
    pub depth: usize,

    /// Outermost frame of the stack
    pub is_root: bool,

    /// Innermost frame of the stack
    pub is_leaf: bool,

    /// Index into the shared frame table as recorded in the sample
    pub frame_index: usize,
}

/// Reconstruct a call stack from leaf-first frame indices
///
/// Out-of-range indices resolve to [`Frame::unknown`] with zeroed stats, so
/// one malformed sample never aborts an analysis.
///
/// # Example
/// ```
/// use brasa::call_stack::reconstruct_call_stack;
/// use brasa::model::{Frame, FrameInfo};
///
/// let frames = vec![Frame::new("app.py", "handler", 12, true)];
/// let infos = vec![FrameInfo::default()];
///
/// let stack = reconstruct_call_stack(&[0, 7], &frames, &infos);
/// assert_eq!(stack.len(), 2);
/// assert!(stack[0].is_leaf);
/// assert_eq!(stack[1].frame.file, "unknown");
/// ```
pub fn reconstruct_call_stack(
    indices: &[usize],
    frames: &[Frame],
    frame_infos: &[FrameInfo],
) -> Vec<CallStackFrame> {
    let last = indices.len().saturating_sub(1);

    indices
        .iter()
        .enumerate()
        .map(|(depth, &frame_index)| {
            let (frame, frame_info) = resolve_frame(frame_index, frames, frame_infos);
            CallStackFrame {
                frame,
                frame_info,
                depth,
                is_root: depth == last,
                is_leaf: depth == 0,
                frame_index,
            }
        })
        .collect()
}

/// Look up a frame and its stats, substituting the sentinel when out of range
pub(crate) fn resolve_frame(
    index: usize,
    frames: &[Frame],
    frame_infos: &[FrameInfo],
) -> (Frame, FrameInfo) {
    match frames.get(index) {
        Some(frame) => {
            let info = frame_infos.get(index).copied().unwrap_or_default();
            (frame.clone(), info)
        }
        None => {
            tracing::trace!(index, frames = frames.len(), "frame index out of range");
            (Frame::unknown(), FrameInfo::default())
        }
    }
}

/// Count indices that do not resolve within a frame table of `frame_count`
pub(crate) fn count_unresolved(indices: &[usize], frame_count: usize) -> usize {
    indices.iter().filter(|&&i| i >= frame_count).count()
}
