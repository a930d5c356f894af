// Hot path extraction for flamegraph profiles
//
// A hot path is one distinct call-stack shape, ranked by the aggregate cost
// of every sample that recorded exactly that shape. Identical stacks seen at
// different sample ticks are one logical path, not N low-weight ones.
//
// Only the designated (first) profile is analyzed. Other threads are
// excluded from hot-path ranking.

mod extractor;

pub use extractor::{analyze_hot_paths, merge_hot_paths, HotPath, HotPathOptions};
