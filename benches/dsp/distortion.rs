//! Benchmarks for the master bus soft clipper.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan::dsp::distortion;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        // Hot signal, well into the curved part of tanh
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin() * 8.0).collect();

        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("soft_clip", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                distortion::soft_clip_buffer(black_box(&mut buffer), black_box(1.0));
            })
        });
    }

    group.finish();
}
