//! Flamegraph data model
//!
//! Mirrors the aggregated flamegraph payload returned by the profiling
//! backend: a shared frame table (`shared.frames`) with a parallel table of
//! per-frame aggregates (`shared.frame_infos`), referenced by index from the
//! per-thread sample stacks in `profiles`.
//!
//! Array position is only meaningful inside one payload. Cross-run identity
//! of a code location is the frame `fingerprint`.

use crate::error::{BrasaError, Result};
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use std::path::Path;

/// File and function name used for frames that cannot be resolved
pub const UNKNOWN_FRAME_NAME: &str = "unknown";

/// One function/call-site definition from the shared frame table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFrame")]
pub struct Frame {
    /// Source file (or image) the frame belongs to
    pub file: String,

    /// Function name
    pub name: String,

    /// Line number (0 when unknown)
    pub line: u32,

    /// Whether this frame is application code (vs. library/system code)
    pub is_application: bool,

    /// Stable content hash identifying this code location across payloads
    pub fingerprint: u64,

    /// Module or namespace, when the platform reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Package (library, crate, dylib) the frame was resolved in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Absolute path of the source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Wire shape of a frame; `fingerprint` may be absent in older payloads
#[derive(Deserialize)]
struct RawFrame {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    is_application: bool,
    #[serde(default)]
    fingerprint: Option<u64>,
    #[serde(default)]
    module: Option<String>,
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

impl From<RawFrame> for Frame {
    fn from(raw: RawFrame) -> Self {
        let file = raw.file.unwrap_or_else(|| UNKNOWN_FRAME_NAME.to_string());
        let name = raw.name.unwrap_or_else(|| UNKNOWN_FRAME_NAME.to_string());
        let line = raw.line.unwrap_or(0);
        let fingerprint = raw
            .fingerprint
            .unwrap_or_else(|| derive_fingerprint(&file, &name, line));

        Frame {
            file,
            name,
            line,
            is_application: raw.is_application,
            fingerprint,
            module: raw.module,
            package: raw.package,
            path: raw.path,
        }
    }
}

impl Frame {
    /// Build an application or library frame with a derived fingerprint
    pub fn new(
        file: impl Into<String>,
        name: impl Into<String>,
        line: u32,
        is_application: bool,
    ) -> Self {
        let file = file.into();
        let name = name.into();
        let fingerprint = derive_fingerprint(&file, &name, line);

        Frame {
            file,
            name,
            line,
            is_application,
            fingerprint,
            module: None,
            package: None,
            path: None,
        }
    }

    /// Override the fingerprint (payloads normally supply their own)
    pub fn with_fingerprint(mut self, fingerprint: u64) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Sentinel frame substituted for out-of-range frame indices
    pub fn unknown() -> Self {
        Frame {
            file: UNKNOWN_FRAME_NAME.to_string(),
            name: UNKNOWN_FRAME_NAME.to_string(),
            line: 0,
            is_application: false,
            fingerprint: 0,
            module: None,
            package: None,
            path: None,
        }
    }

    /// `file:line`, or just `file` when the line is unknown
    pub fn location(&self) -> String {
        if self.line > 0 {
            format!("{}:{}", self.file, self.line)
        } else {
            self.file.clone()
        }
    }
}

/// Derive a stable fingerprint from a frame's identifying content
///
/// 64-bit FNV-1a over `file`, `name` and `line`, with a separator byte
/// between fields so `("ab", "c")` and `("a", "bc")` differ.
pub fn derive_fingerprint(file: &str, name: &str, line: u32) -> u64 {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(file.as_bytes());
    hasher.write_u8(0);
    hasher.write(name.as_bytes());
    hasher.write_u8(0);
    hasher.write_u32(line);
    hasher.finish()
}

/// Per-frame aggregate statistics, parallel to the frame table
///
/// All durations are nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameInfo {
    /// Number of samples this frame appeared in
    pub count: u64,

    /// The flamegraph's own normalized cost metric
    pub weight: f64,

    /// Total inclusive time spent in this frame
    pub sum_duration: u64,

    /// Total self time (excluding callees)
    pub sum_self_time: u64,

    /// 75th percentile inclusive duration
    pub p75_duration: u64,

    /// 95th percentile inclusive duration
    pub p95_duration: u64,

    /// 99th percentile inclusive duration
    pub p99_duration: u64,
}

/// One thread's sampled data
///
/// `samples`, `sample_counts`, `sample_durations_ns` and `weights` are indexed
/// in lockstep by sample position. Each sample is stored root-first, as the
/// flamegraph payload encodes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Thread identifier, when the payload reports one
    #[serde(rename = "threadID", alias = "thread_id", skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<u64>,

    /// Thread name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered frame-index sequences, one per observed stack (root-first)
    pub samples: Vec<Vec<usize>>,

    /// How many times each stack was observed
    pub sample_counts: Vec<u64>,

    /// Total nanoseconds attributed to each stack
    pub sample_durations_ns: Vec<u64>,

    /// Weight of each stack
    pub weights: Vec<f64>,
}

impl Profile {
    /// Sum of `sample_counts`, saturating
    pub fn total_samples(&self) -> u64 {
        self.sample_counts
            .iter()
            .fold(0u64, |total, &count| total.saturating_add(count))
    }

    /// Number of sample positions that can be read (shortest stack/count array)
    ///
    /// Durations and weights missing for a position read as zero.
    pub fn sample_len(&self) -> usize {
        self.samples.len().min(self.sample_counts.len())
    }

    /// Duration at sample position `i`, zero when absent
    pub fn duration_at(&self, i: usize) -> u64 {
        self.sample_durations_ns.get(i).copied().unwrap_or(0)
    }

    /// Weight at sample position `i`, zero when absent
    pub fn weight_at(&self, i: usize) -> f64 {
        self.weights.get(i).copied().unwrap_or(0.0)
    }
}

/// Descriptive metadata for one profile in the `shared.profiles` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiler_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,

    /// Sent as a number or a string depending on the profiler
    #[serde(
        deserialize_with = "optional_thread_id_from_any",
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

/// Thread id as it appears on the wire
#[derive(Deserialize)]
#[serde(untagged)]
enum AnyThreadId {
    Text(String),
    Number(u64),
}

impl From<AnyThreadId> for String {
    fn from(id: AnyThreadId) -> Self {
        match id {
            AnyThreadId::Text(s) => s,
            AnyThreadId::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize a thread id sent as either a string or a number
pub(crate) fn thread_id_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    AnyThreadId::deserialize(deserializer).map(String::from)
}

fn optional_thread_id_from_any<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<AnyThreadId>::deserialize(deserializer).map(|id| id.map(String::from))
}

/// Shared tables referenced by every profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedData {
    pub frames: Vec<Frame>,
    pub frame_infos: Vec<FrameInfo>,
    pub profiles: Vec<ProfileMeta>,
}

/// Aggregated sampled profiling dataset for one transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flamegraph {
    pub platform: String,

    #[serde(rename = "transactionName")]
    pub transaction_name: String,

    pub profiles: Vec<Profile>,

    pub shared: SharedData,
}

impl Flamegraph {
    /// Parse a flamegraph payload from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let flamegraph: Flamegraph = serde_json::from_str(json)?;
        tracing::debug!(
            platform = %flamegraph.platform,
            profiles = flamegraph.profiles.len(),
            frames = flamegraph.shared.frames.len(),
            "parsed flamegraph"
        );
        Ok(flamegraph)
    }

    /// Read and parse a flamegraph payload saved to disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BrasaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Shared frame table
    pub fn frames(&self) -> &[Frame] {
        &self.shared.frames
    }

    /// Per-frame aggregates, parallel to [`Flamegraph::frames`]
    pub fn frame_infos(&self) -> &[FrameInfo] {
        &self.shared.frame_infos
    }

    /// Frame and its aggregate at `index`, or `None` when out of range
    ///
    /// A frame without a matching aggregate pairs with a zeroed [`FrameInfo`].
    pub fn frame_at(&self, index: usize) -> Option<(&Frame, FrameInfo)> {
        let frame = self.shared.frames.get(index)?;
        let info = self.shared.frame_infos.get(index).copied().unwrap_or_default();
        Some((frame, info))
    }

    /// Sum of `sample_counts` across every profile (all threads)
    pub fn total_samples_all_profiles(&self) -> u64 {
        self.profiles
            .iter()
            .map(Profile::total_samples)
            .fold(0u64, u64::saturating_add)
    }

    /// Number of frames flagged as application code
    pub fn application_frame_count(&self) -> usize {
        self.shared.frames.iter().filter(|f| f.is_application).count()
    }
}

/// Whether a flamegraph carries enough data to analyze
///
/// Callers should short-circuit to a "no data" message when this is false.
pub fn has_profile_data(flamegraph: &Flamegraph) -> bool {
    !flamegraph.profiles.is_empty() && !flamegraph.shared.frames.is_empty()
}

/// Require profile data, for callers that prefer an error to a message
pub fn require_profile_data(flamegraph: &Flamegraph) -> Result<()> {
    if has_profile_data(flamegraph) {
        Ok(())
    } else {
        Err(BrasaError::NoProfileData {
            transaction: flamegraph.transaction_name.clone(),
        })
    }
}
