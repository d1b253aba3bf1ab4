//! Full render callbacks with a varying number of sounding voices.
//!
//! Stereo interleaved output, as a typical device callback would request.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use rtrb::RingBuffer;
use steelpan::{
    engine::Renderer, notes::NOTE_FREQUENCIES, synth::mixer::Mixer, NoteId, VoicePool,
    MAX_POLYPHONY,
};

use crate::BLOCK_SIZES;

const CHANNELS: usize = 2;

fn strike_all(pool: &VoicePool, count: usize) {
    for id in 0..count {
        let note = NoteId::new(id as i32).unwrap();
        pool.allocate(NOTE_FREQUENCIES[id], note).unwrap();
    }
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        for voices in [1, 4, MAX_POLYPHONY] {
            let pool = Arc::new(VoicePool::default());
            pool.set_sample_rate(48_000.0);
            let (events, _rx) = RingBuffer::new(64);
            let mut renderer = Renderer::new(Arc::clone(&pool), Mixer::default(), events, None);

            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        // Keep the voices ringing for the whole measurement
                        if pool.active_count() < voices {
                            strike_all(&pool, voices);
                        }
                        renderer.render_block(black_box(&mut buffer), CHANNELS);
                    })
                },
            );
        }
    }

    group.finish();
}
