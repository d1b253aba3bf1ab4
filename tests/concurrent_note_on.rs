//! Note-ons from another thread while the render path keeps pulling blocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use steelpan::{
    io::OfflineDriver, notes::NOTE_FREQUENCIES, synth::message::VoiceEvent, Engine, EngineConfig,
    NoteId, VoicePool, MAX_POLYPHONY,
};

#[test]
fn caller_and_render_threads_share_the_pool() {
    let driver = OfflineDriver::new(48_000);
    let handle = driver.handle();
    let mut engine = Engine::new(driver, EngineConfig::default());
    engine.start().unwrap();

    let trigger = engine.trigger();
    let done = Arc::new(AtomicBool::new(false));

    let render = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut buffer = vec![0.0f32; 128 * 2];
            let mut blocks = 0usize;
            loop {
                assert!(handle.pull_into(&mut buffer));
                assert!(buffer.iter().all(|s| s.abs() < 1.0 && s.is_finite()));
                blocks += 1;
                if done.load(Ordering::Acquire) {
                    return blocks;
                }
            }
        })
    };

    let mut last_generation = 0;
    for i in 0..2_000 {
        let alloc = trigger.note_on(i % 20).unwrap();
        assert!(alloc.generation > last_generation);
        assert!(alloc.slot < MAX_POLYPHONY);
        last_generation = alloc.generation;
        assert!(engine.active_voices() <= MAX_POLYPHONY);
    }

    done.store(true, Ordering::Release);
    let blocks = render.join().unwrap();
    assert!(blocks > 0);
    assert_eq!(last_generation, 2_000);
}

#[test]
fn voice_inspection_never_skips_a_render_block() {
    let pool = Arc::new(VoicePool::default());
    for id in 0..MAX_POLYPHONY {
        let note = NoteId::new(id as i32).unwrap();
        pool.allocate(NOTE_FREQUENCIES[id], note).unwrap();
    }

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let pool = Arc::clone(&pool);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut reads = 0usize;
            loop {
                for voice in pool.voices() {
                    assert!(voice.snapshot().playing);
                }
                reads += 1;
                if done.load(Ordering::Acquire) {
                    return reads;
                }
            }
        })
    };

    // 300 blocks of 64 frames is far shorter than any voice's ring-out
    let mut events = Vec::new();
    let mut buffer = vec![0.0f32; 64 * 2];
    for _ in 0..300 {
        buffer.fill(0.0);
        pool.render(&mut buffer, 2, |event| events.push(event));
    }

    done.store(true, Ordering::Release);
    assert!(reader.join().unwrap() > 0);
    assert_eq!(events, Vec::<VoiceEvent>::new());
    assert_eq!(pool.active_count(), MAX_POLYPHONY);
}
