//! Analysis throughput benchmark
//!
//! Measures hot path merging, hotspot ranking, frame comparison and full
//! report rendering over synthetic flamegraphs of increasing size.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench analysis_throughput
//! ```
//!
//! # Performance Targets
//!
//! - **Hot path merge:** linear in sample count, <5ms for 10K samples
//! - **Full report:** <10ms for 10K samples and 1K frames

use brasa::config::AnalysisOptions;
use brasa::format::{format_flamegraph_analysis, format_flamegraph_comparison};
use brasa::hot_path::{analyze_hot_paths, HotPathOptions};
use brasa::hotspot::{identify_hotspot_frames, HotspotOptions};
use brasa::model::{Flamegraph, Frame, FrameInfo, Profile, SharedData};
use brasa::regression::{compare_frame_stats, ComparisonOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Build a flamegraph with `frame_count` frames and `sample_count` samples
///
/// Stacks repeat every 64 samples so merging has real work to do.
fn synthetic_flamegraph(frame_count: usize, sample_count: usize, scale: u64) -> Flamegraph {
    let frames = (0..frame_count)
        .map(|i| Frame::new(format!("src/mod_{}.py", i % 17), format!("fn_{}", i), i as u32, i % 3 != 0))
        .collect();
    let frame_infos = (0..frame_count as u64)
        .map(|i| FrameInfo {
            count: i % 500,
            weight: (i % 500) as f64,
            sum_duration: (i + 1) * 1_000_000 * scale,
            sum_self_time: i * 100_000,
            p75_duration: (i + 1) * 10_000,
            p95_duration: (i + 1) * 25_000,
            p99_duration: (i + 1) * 40_000,
        })
        .collect();

    let samples: Vec<Vec<usize>> = (0..sample_count)
        .map(|i| {
            let shape = i % 64;
            let depth = 3 + shape % 12;
            (0..depth).map(|d| (shape * 13 + d * 7) % frame_count).collect()
        })
        .collect();

    Flamegraph {
        platform: "python".to_string(),
        transaction_name: "/bench".to_string(),
        profiles: vec![Profile {
            sample_counts: vec![1; samples.len()],
            sample_durations_ns: vec![10_000_000; samples.len()],
            weights: vec![1.0; samples.len()],
            samples,
            ..Default::default()
        }],
        shared: SharedData {
            frames,
            frame_infos,
            profiles: vec![],
        },
    }
}

fn bench_hot_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_hot_paths");

    for sample_count in [100, 1_000, 10_000] {
        let fg = synthetic_flamegraph(1_000, sample_count, 1);
        group.bench_with_input(BenchmarkId::from_parameter(sample_count), &fg, |b, fg| {
            b.iter(|| black_box(analyze_hot_paths(black_box(fg), &HotPathOptions::default())));
        });
    }

    group.finish();
}

fn bench_hotspots(c: &mut Criterion) {
    let fg = synthetic_flamegraph(1_000, 1_000, 1);

    c.bench_function("identify_hotspot_frames", |b| {
        b.iter(|| black_box(identify_hotspot_frames(black_box(&fg), &HotspotOptions::default())));
    });
}

fn bench_comparison(c: &mut Criterion) {
    let baseline = synthetic_flamegraph(1_000, 1_000, 1);
    let current = synthetic_flamegraph(1_000, 1_000, 2);

    c.bench_function("compare_frame_stats", |b| {
        b.iter(|| {
            black_box(compare_frame_stats(
                black_box(&baseline),
                black_box(&current),
                &ComparisonOptions::all_frames(),
            ))
        });
    });
}

fn bench_reports(c: &mut Criterion) {
    let baseline = synthetic_flamegraph(1_000, 10_000, 1);
    let current = synthetic_flamegraph(1_000, 10_000, 2);
    let options = AnalysisOptions::default();

    c.bench_function("format_flamegraph_analysis", |b| {
        b.iter(|| black_box(format_flamegraph_analysis(black_box(&baseline), &options)));
    });

    c.bench_function("format_flamegraph_comparison", |b| {
        b.iter(|| {
            black_box(format_flamegraph_comparison(
                black_box(&baseline),
                black_box(&current),
                &options,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_hot_paths,
    bench_hotspots,
    bench_comparison,
    bench_reports
);
criterion_main!(benches);
