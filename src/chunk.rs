//! Profile chunk inspection
//!
//! A profile chunk is a raw continuous-profiling segment: its own frame
//! table, a table of leaf-first stacks, and timestamped samples pointing at
//! a stack and a thread. Unlike a flamegraph, nothing is pre-aggregated, so
//! per-frame counts and sample-interval percentiles are computed here.
//!
//! Payloads come either nested (`{"profile": {"frames": ...}}`) or flat
//! (`{"frames": ...}`); both decode to the same [`ProfileChunk`].

use crate::call_stack::count_unresolved;
use crate::error::{BrasaError, Result};
use crate::model::{thread_id_from_any, UNKNOWN_FRAME_NAME};
use crate::stats::DurationPercentiles;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// One frame of a profile chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_app: Option<bool>,
}

impl ChunkFrame {
    /// Function name, or `unknown`
    pub fn display_name(&self) -> &str {
        self.function.as_deref().unwrap_or(UNKNOWN_FRAME_NAME)
    }

    /// `file:line` using the best available file attribute
    pub fn location(&self) -> String {
        let file = self
            .filename
            .as_deref()
            .or(self.abs_path.as_deref())
            .or(self.module.as_deref())
            .unwrap_or(UNKNOWN_FRAME_NAME);
        match self.lineno {
            Some(line) if line > 0 => format!("{}:{}", file, line),
            _ => file.to_string(),
        }
    }

    pub fn is_application(&self) -> bool {
        self.in_app.unwrap_or(false)
    }
}

/// One timestamped observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSample {
    /// Index into the stack table
    pub stack_id: usize,

    /// Thread the sample was taken on
    #[serde(deserialize_with = "thread_id_from_any")]
    pub thread_id: String,

    /// Seconds since the epoch
    pub timestamp: f64,
}

/// Descriptive metadata for one thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Sampled data of a chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkProfile {
    pub frames: Vec<ChunkFrame>,
    pub samples: Vec<ChunkSample>,

    /// Frame-index stacks, leaf-first
    pub stacks: Vec<Vec<usize>>,

    /// Thread id → metadata
    pub thread_metadata: BTreeMap<String, ThreadMetadata>,
}

/// A raw continuous-profiling chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawChunk")]
pub struct ProfileChunk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiler_id: Option<String>,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub profile: ChunkProfile,
}

#[derive(Deserialize)]
struct RawChunk {
    #[serde(default)]
    chunk_id: Option<String>,
    #[serde(default)]
    profiler_id: Option<String>,
    #[serde(default)]
    platform: String,
    #[serde(default)]
    release: Option<String>,
    #[serde(default)]
    environment: Option<String>,
    #[serde(default)]
    profile: Option<ChunkProfile>,
    #[serde(flatten)]
    flat: ChunkProfile,
}

impl From<RawChunk> for ProfileChunk {
    fn from(raw: RawChunk) -> Self {
        ProfileChunk {
            chunk_id: raw.chunk_id,
            profiler_id: raw.profiler_id,
            platform: raw.platform,
            release: raw.release,
            environment: raw.environment,
            profile: raw.profile.unwrap_or(raw.flat),
        }
    }
}

impl ProfileChunk {
    /// Parse a chunk payload from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let chunk: ProfileChunk = serde_json::from_str(json)?;
        tracing::debug!(
            platform = %chunk.platform,
            samples = chunk.profile.samples.len(),
            stacks = chunk.profile.stacks.len(),
            frames = chunk.profile.frames.len(),
            "parsed profile chunk"
        );
        Ok(chunk)
    }

    /// Read and parse a chunk payload saved to disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BrasaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

/// Whether a chunk carries enough data to analyze
pub fn has_chunk_data(chunk: &ProfileChunk) -> bool {
    !chunk.profile.samples.is_empty() && !chunk.profile.frames.is_empty()
}

/// Options for chunk analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkOptions {
    /// Only list application frames
    pub focus_on_user_code: bool,

    /// Maximum number of frames listed
    pub max_frames: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            focus_on_user_code: false,
            max_frames: 10,
        }
    }
}

/// Per-thread sample count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    pub name: Option<String>,
    pub sample_count: usize,
}

/// Aggregated statistics for one chunk frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkFrameStats {
    pub frame: ChunkFrame,
    pub frame_index: usize,

    /// Samples where this frame was the leaf
    pub self_samples: usize,

    /// Samples where this frame appeared anywhere in the stack
    pub total_samples: usize,

    /// `self_samples` as a share of valid samples (0-100)
    pub self_percent: f64,

    /// Percentiles of the gap to the next sample on the same thread
    pub interval: DurationPercentiles,
}

/// Result of inspecting a profile chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkAnalysis {
    pub chunk_id: Option<String>,
    pub profiler_id: Option<String>,
    pub platform: String,
    pub release: Option<String>,
    pub environment: Option<String>,

    pub total_samples: usize,
    pub valid_samples: usize,

    /// Samples whose `stack_id` does not resolve
    pub invalid_samples: usize,

    pub unique_stacks: usize,
    pub frame_count: usize,
    pub application_frame_count: usize,

    /// Last minus first sample timestamp
    pub time_span_seconds: f64,

    /// Threads by sample count, descending
    pub threads: Vec<ThreadSummary>,

    /// Frames by self samples, then total samples
    pub top_frames: Vec<ChunkFrameStats>,
}

#[derive(Default)]
struct FrameAccumulator {
    self_samples: usize,
    total_samples: usize,
    intervals_ns: Vec<u64>,
}

/// Gap from each sample to the next sample on the same thread, in nanoseconds
///
/// Keyed by sample position. The last sample of each thread has no gap.
fn sample_intervals(samples: &[ChunkSample]) -> HashMap<usize, u64> {
    let mut by_thread: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, sample) in samples.iter().enumerate() {
        by_thread.entry(sample.thread_id.as_str()).or_default().push(i);
    }

    let mut intervals = HashMap::with_capacity(samples.len());
    for mut positions in by_thread.into_values() {
        positions.sort_by(|&a, &b| samples[a].timestamp.total_cmp(&samples[b].timestamp));
        for pair in positions.windows(2) {
            let gap = samples[pair[1]].timestamp - samples[pair[0]].timestamp;
            intervals.insert(pair[0], (gap.max(0.0) * 1e9).round() as u64);
        }
    }
    intervals
}

/// Inspect a profile chunk
///
/// Invalid stack ids are counted in `invalid_samples` and skipped; frame
/// indices outside the frame table are ignored for per-frame statistics.
pub fn analyze_profile_chunk(chunk: &ProfileChunk, options: &ChunkOptions) -> ChunkAnalysis {
    let profile = &chunk.profile;
    let intervals = sample_intervals(&profile.samples);

    let mut accumulators: Vec<FrameAccumulator> = Vec::new();
    accumulators.resize_with(profile.frames.len(), FrameAccumulator::default);

    let mut thread_counts: HashMap<&str, usize> = HashMap::new();
    let mut invalid_samples = 0usize;
    let mut unresolved_frames = 0usize;

    for (i, sample) in profile.samples.iter().enumerate() {
        *thread_counts.entry(sample.thread_id.as_str()).or_default() += 1;

        let Some(stack) = profile.stacks.get(sample.stack_id) else {
            invalid_samples += 1;
            continue;
        };
        unresolved_frames += count_unresolved(stack, profile.frames.len());

        if let Some(acc) = stack.first().and_then(|&leaf| accumulators.get_mut(leaf)) {
            acc.self_samples += 1;
        }

        // Recursive frames count once per sample.
        let mut seen = HashSet::with_capacity(stack.len());
        for &frame_index in stack {
            if !seen.insert(frame_index) {
                continue;
            }
            if let Some(acc) = accumulators.get_mut(frame_index) {
                acc.total_samples += 1;
                if let Some(&gap) = intervals.get(&i) {
                    acc.intervals_ns.push(gap);
                }
            }
        }
    }

    if invalid_samples > 0 || unresolved_frames > 0 {
        tracing::warn!(
            invalid_samples,
            unresolved_frames,
            "profile chunk references stacks or frames that do not exist"
        );
    }

    let total_samples = profile.samples.len();
    let valid_samples = total_samples - invalid_samples;

    let mut threads: Vec<ThreadSummary> = thread_counts
        .into_iter()
        .map(|(thread_id, sample_count)| ThreadSummary {
            thread_id: thread_id.to_string(),
            name: profile
                .thread_metadata
                .get(thread_id)
                .and_then(|m| m.name.clone()),
            sample_count,
        })
        .collect();
    threads.sort_by(|a, b| {
        b.sample_count
            .cmp(&a.sample_count)
            .then_with(|| a.thread_id.cmp(&b.thread_id))
    });

    let mut top_frames: Vec<ChunkFrameStats> = accumulators
        .into_iter()
        .enumerate()
        .filter(|(_, acc)| acc.total_samples > 0)
        .filter(|(i, _)| !options.focus_on_user_code || profile.frames[*i].is_application())
        .map(|(frame_index, acc)| ChunkFrameStats {
            frame: profile.frames[frame_index].clone(),
            frame_index,
            self_samples: acc.self_samples,
            total_samples: acc.total_samples,
            self_percent: if valid_samples > 0 {
                acc.self_samples as f64 / valid_samples as f64 * 100.0
            } else {
                0.0
            },
            interval: DurationPercentiles::from_durations(&acc.intervals_ns),
        })
        .collect();
    top_frames.sort_by(|a, b| {
        b.self_samples
            .cmp(&a.self_samples)
            .then_with(|| b.total_samples.cmp(&a.total_samples))
            .then_with(|| a.frame_index.cmp(&b.frame_index))
    });
    top_frames.truncate(options.max_frames);

    let time_span_seconds = time_span(&profile.samples);

    tracing::debug!(
        total_samples,
        invalid_samples,
        threads = threads.len(),
        top_frames = top_frames.len(),
        "analyzed profile chunk"
    );

    ChunkAnalysis {
        chunk_id: chunk.chunk_id.clone(),
        profiler_id: chunk.profiler_id.clone(),
        platform: chunk.platform.clone(),
        release: chunk.release.clone(),
        environment: chunk.environment.clone(),
        total_samples,
        valid_samples,
        invalid_samples,
        unique_stacks: profile.stacks.len(),
        frame_count: profile.frames.len(),
        application_frame_count: profile.frames.iter().filter(|f| f.is_application()).count(),
        time_span_seconds,
        threads,
        top_frames,
    }
}

fn time_span(samples: &[ChunkSample]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.timestamp), hi.max(s.timestamp))
        });
    (max - min).max(0.0)
}
