//! Benchmarks for gain and frame fan-out.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        let mut buffer = signal.clone();
        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&signal);
                mix::apply_gain(black_box(&mut buffer), black_box(2.5));
            })
        });

        let mut frame = [0.0f32; 2];
        group.bench_with_input(BenchmarkId::new("add_to_frame", size), &size, |b, _| {
            b.iter(|| {
                for &sample in &signal {
                    mix::add_to_frame(black_box(&mut frame), black_box(sample));
                }
            })
        });
    }

    group.finish();
}
