//! Cost of one allocation, fresh and stolen.
//!
//! This is the critical section the caller thread holds, so it bounds how
//! long a note-on can delay another note-on.

use std::hint::black_box;

use criterion::Criterion;
use steelpan::{NoteId, VoicePool, MAX_POLYPHONY};

pub fn bench_note_on(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/note_on");
    let note = NoteId::new(11).unwrap();

    // Full pool: every allocation is a steal
    let pool = VoicePool::default();
    for _ in 0..MAX_POLYPHONY {
        pool.allocate(261.63, note).unwrap();
    }
    group.bench_function("steal_oldest", |b| {
        b.iter(|| black_box(pool.allocate(black_box(261.63), note)))
    });

    // Fresh pool per iteration: the first idle slot is taken
    group.bench_function("first_fit", |b| {
        b.iter_batched(
            VoicePool::default,
            |pool| black_box(pool.allocate(black_box(261.63), note)),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}
