//! Criterion benchmark for search index builds over large line sets.

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use runlog::view_state::SearchIndex;

fn wrapped_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            if i % 13 == 0 {
                format!("step {}: error: upstream timeout", i)
            } else {
                format!("step {}: completed in {}ms", i, i % 211)
            }
        })
        .collect()
}

fn bench_search_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_build");
    for count in [10_000usize, 100_000, 500_000] {
        let lines = wrapped_lines(count);
        group.bench_with_input(BenchmarkId::new("rare_hit", count), &lines, |b, lines| {
            b.iter(|| SearchIndex::build(black_box("upstream timeout"), black_box(lines)));
        });
        group.bench_with_input(BenchmarkId::new("common_hit", count), &lines, |b, lines| {
            b.iter(|| SearchIndex::build(black_box("step"), black_box(lines)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search_build);
criterion_main!(benches);
