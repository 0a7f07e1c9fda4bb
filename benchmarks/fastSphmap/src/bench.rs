//! Kernel smoothing benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Scalability (10K to 200K sources)
//! - Image size (128 to 1024 pixels per side)
//! - Streaming chunk sizes
//! - Particle preparation (neighbour search, full pipeline)
//! - Pathological cases (dense core, out-of-range sources)
//!
//! For serial execution, use `FASTSPHMAP_MODE=serial cargo bench`.
//! For parallel execution, use `FASTSPHMAP_MODE=parallel cargo bench`.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fastSphmap::prelude::*;
use sphmap_bench_data::{dense_core, exponential_disc, out_of_range, plummer_sphere};
use std::env;
use std::hint::black_box;

// ============================================================================
// Helper Functions
// ============================================================================

fn get_config() -> (bool, &'static str) {
    match env::var("FASTSPHMAP_MODE").ok().as_deref() {
        Some("serial") => (false, "serial"),
        Some("parallel") | _ => (true, "parallel"),
    }
}

// ============================================================================
// Benchmark Functions
// ============================================================================

fn bench_scalability(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("scalability_{}", mode_name));
    group.sample_size(20);

    for size in [10_000, 50_000, 200_000] {
        group.throughput(Throughput::Elements(size as u64));

        let s = exponential_disc(size, 42);
        let model = Smoothing::new()
            .num_rhalfs(7.5)
            .npixels(256)
            .adapter(Batch)
            .parallel(use_parallel)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("batch", size), &size, |b, _| {
            b.iter(|| {
                model
                    .render(
                        black_box(&s.x),
                        black_box(&s.y),
                        black_box(&s.hsml),
                        Some(&s.weights[..]),
                    )
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_npixels(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("npixels_{}", mode_name));
    group.sample_size(20);

    let s = exponential_disc(50_000, 42);

    for npixels in [128, 256, 512, 1024] {
        group.throughput(Throughput::Elements((npixels * npixels) as u64));

        let model = Smoothing::new()
            .num_rhalfs(7.5)
            .npixels(npixels)
            .adapter(Batch)
            .parallel(use_parallel)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("batch", npixels), &npixels, |b, _| {
            b.iter(|| {
                model
                    .render(
                        black_box(&s.x),
                        black_box(&s.y),
                        black_box(&s.hsml),
                        Some(&s.weights[..]),
                    )
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("streaming_{}", mode_name));
    group.sample_size(20);

    let size = 100_000;
    let s = exponential_disc(size, 42);
    group.throughput(Throughput::Elements(size as u64));

    for chunk_size in [1_000, 10_000, 65_536] {
        group.bench_with_input(
            BenchmarkId::new("chunk_size", chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                let mut stream = Smoothing::new()
                    .num_rhalfs(7.5)
                    .npixels(256)
                    .chunk_size(chunk_size)
                    .adapter(Streaming)
                    .parallel(use_parallel)
                    .build()
                    .unwrap();

                b.iter(|| {
                    stream
                        .process_chunk(
                            black_box(&s.x),
                            black_box(&s.y),
                            black_box(&s.hsml),
                            Some(&s.weights[..]),
                        )
                        .unwrap();
                    stream.finalize().unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_particles(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("particles_{}", mode_name));
    group.sample_size(10);

    let model = Smoothing::new()
        .num_rhalfs(7.5)
        .npixels(256)
        .pixel_units(PerPixel)
        .adapter(Batch)
        .parallel(use_parallel)
        .build()
        .unwrap();

    for size in [1_000, 5_000] {
        group.throughput(Throughput::Elements(size as u64));
        let positions = plummer_sphere(size, 42);

        group.bench_with_input(
            BenchmarkId::new("smoothing_lengths", size),
            &size,
            |b, _| b.iter(|| model.smoothing_lengths(black_box(&positions), 16).unwrap()),
        );

        let frame = ParticleFrame::new([0.0, 0.0, 0.0], 1.0)
            .projection(Projection::EdgeOn([0.3, 0.9, 0.1]));
        group.bench_with_input(BenchmarkId::new("render_particles", size), &size, |b, _| {
            b.iter(|| {
                model
                    .render_particles(&frame, black_box(&positions), None, 16)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let (use_parallel, mode_name) = get_config();
    let mut group = c.benchmark_group(format!("pathological_{}", mode_name));
    group.sample_size(20);

    let size = 20_000;
    let model = Smoothing::new()
        .num_rhalfs(2.0)
        .npixels(256)
        .adapter(Batch)
        .parallel(use_parallel)
        .build()
        .unwrap();

    // Every source covers most of the image
    let core = dense_core(size, 42);
    group.bench_function("dense_core", |b| {
        b.iter(|| {
            model
                .render(
                    black_box(&core.x),
                    black_box(&core.y),
                    black_box(&core.hsml),
                    None,
                )
                .unwrap()
        })
    });

    // Everything culled before deposition
    let far = out_of_range(size, 2.0, 42);
    group.bench_function("out_of_range", |b| {
        b.iter(|| {
            model
                .render(
                    black_box(&far.x),
                    black_box(&far.y),
                    black_box(&far.hsml),
                    None,
                )
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_scalability,
    bench_npixels,
    bench_streaming,
    bench_particles,
    bench_pathological,
);

criterion_main!(benches);
