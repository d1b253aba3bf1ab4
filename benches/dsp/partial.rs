//! Benchmarks for a single decaying partial.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan::dsp::partial::Partial;

use crate::BLOCK_SIZES;

pub fn bench_partial(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/partial");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        // Decay close to 1.0 keeps the amplitude out of denormal range
        let mut partial = Partial::silent();
        partial.strike(220.0, 48_000.0, 1.0, 0.999_999_9);

        group.bench_with_input(BenchmarkId::new("sine_decay", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = partial.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
