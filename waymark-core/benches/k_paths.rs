//! Criterion benchmarks for the alternative-route searches.
//!
//! Compares Yen's exact algorithm with the penalisation heuristic on square
//! grids of increasing size, and measures the approximate batch driver.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package waymark-core
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use waymark_core::test_support::{grid, grid_id};
use waymark_core::{approx_batch, k_shortest_paths, k_shortest_paths_heuristic};

/// Grid widths to benchmark; each grid is square.
const GRID_WIDTHS: &[u32] = &[10, 20, 40];

/// Alternatives requested per query.
const ROUTES: usize = 5;

/// Overlap allowed between diverse alternatives, in percent.
const OVERLAP_THRESHOLD: f64 = 60.0;

fn bench_alternatives(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_paths");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for &width in GRID_WIDTHS {
        let graph = grid(width, width);
        let target = grid_id(width, width - 1, width - 1);

        group.bench_with_input(BenchmarkId::new("yen", width), &graph, |b, graph| {
            b.iter(|| k_shortest_paths(black_box(graph), 1, target, ROUTES));
        });
        group.bench_with_input(BenchmarkId::new("heuristic", width), &graph, |b, graph| {
            b.iter(|| {
                k_shortest_paths_heuristic(black_box(graph), 1, target, ROUTES, OVERLAP_THRESHOLD)
            });
        });
    }
    group.finish();
}

fn bench_approx_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("approx_batch");
    let width = 40;
    let graph = grid(width, width);
    let pairs: Vec<_> = (0..width)
        .map(|row| (grid_id(width, row, 0), grid_id(width, width - 1 - row, width - 1)))
        .collect();
    group.throughput(Throughput::Elements(u64::try_from(pairs.len()).unwrap_or(u64::MAX)));

    for error_pct in [0.0, 10.0, 50.0] {
        group.bench_with_input(
            BenchmarkId::from_parameter(error_pct),
            &error_pct,
            |b, &error_pct| {
                b.iter(|| approx_batch(&graph, black_box(&pairs), Duration::from_secs(60), error_pct));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_alternatives, bench_approx_batch);
criterion_main!(benches);
