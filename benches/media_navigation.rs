// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for media navigation operations.
//!
//! Measures the performance of:
//! - Random index selection against a full recency window
//! - Navigation operations (next/previous) on a populated engine
//! - Folder scanning into batches

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use media_deck::application::navigation::{generate_smart_random_index, NavigationEngine};
use media_deck::application::scanner::{cancellation_token, Scanner};
use media_deck::domain::media::{MediaFilter, MediaItem};
use media_deck::domain::playlist::Source;
use media_deck::infrastructure::FsPathResolver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::sync::Arc;

fn items(count: usize) -> Vec<MediaItem> {
    (0..count)
        .map(|i| MediaItem::new(format!("/media/item_{i:05}.jpg")))
        .collect()
}

/// Benchmark the repeat-avoiding selection for several set sizes.
fn bench_random_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_selection");

    for len in [4usize, 10, 100, 10_000] {
        let mut rng = StdRng::seed_from_u64(17);
        let history: Vec<usize> = (0..200).map(|_| rng.random_range(0..len)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut draw = |n: usize| rng.random_range(0..n);
            b.iter(|| black_box(generate_smart_random_index(len, &history, &mut draw)));
        });
    }

    group.finish();
}

/// Benchmark navigation operations (next/previous).
fn bench_navigate(c: &mut Criterion) {
    let mut group = c.benchmark_group("media_navigation");

    let engine = NavigationEngine::with_seed(5);
    engine.append(items(5_000));

    group.bench_function("next", |b| {
        b.iter(|| black_box(engine.next()));
    });

    group.bench_function("previous", |b| {
        b.iter(|| black_box(engine.previous()));
    });

    group.bench_function("append_batch", |b| {
        b.iter(|| {
            let engine = NavigationEngine::with_seed(5);
            for _ in 0..10 {
                engine.append(items(50));
            }
            black_box(engine.len());
        });
    });

    group.finish();
}

/// Benchmark scanning a flat folder of 500 files.
fn bench_scan_folder(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    for i in 0..500 {
        let extension = if i % 5 == 0 { "mp4" } else { "jpg" };
        std::fs::write(temp_dir.path().join(format!("{i:04}.{extension}")), b"x")
            .expect("failed to write bench file");
    }
    let scanner = Scanner::new(Arc::new(FsPathResolver::new()));
    let sources = vec![Source::folder(temp_dir.path().to_string_lossy(), false)];

    group.bench_function("scan_flat_500", |b| {
        b.iter(|| {
            let mut total = 0;
            scanner.scan_blocking(&sources, MediaFilter::Mixed, &cancellation_token(), &mut |batch| {
                total += batch.len();
                true
            });
            black_box(total)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_random_selection, bench_navigate, bench_scan_folder);
criterion_main!(benches);
