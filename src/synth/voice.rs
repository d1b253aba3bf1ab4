use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError, TryLockError};

use crate::{
    dsp::{mix, partial::Partial},
    notes::NoteId,
};

/*
Steelpan Voice
==============

A voice is three decaying partials summed together. The partial tunings are
hand-picked to sound like a struck steel drum rather than derived from any
analysis:

   partial   ratio    start amp   decay / sample
   -------   -----    ---------   --------------
   1         1.000    1.0         0.99995      fundamental
   2         2.001    0.6         0.99992      octave, slightly sharp
   3         3.5      0.4         0.99985      inharmonic

The sharp octave beats slowly against the fundamental, which gives the
shimmer of a real pan. The 3.5x partial is the metallic "clang" and dies
first.

There is no note-off. A voice rings until the fundamental falls below
SILENCE_THRESHOLD (-60 dB), checked once at the end of each rendered block.


Sharing Between Threads
-----------------------

Two threads touch a voice:

  caller thread   start()  - re-strikes the partials for a new note
  render thread   render() - advances the partials, may end the voice

`playing` is the publication flag. start() writes the partials first and
stores `playing = true` with Release ordering; render() loads it with
Acquire before touching anything else. A voice that has never been
published is never rendered.

The partials live behind a per-voice mutex that only start() and render()
ever take. The render thread only ever uses try_lock(): if a note-on is
re-striking this exact voice at that moment (a steal), the voice is skipped
for one callback instead of making the audio thread wait. That skipped
block is the accepted cost of stealing without blocking the render thread.

Everything the host reads for meters is mirrored into atomics instead:

  sample_rate          written by set_sample_rate(), read by start()
  phase_increments     written by start()
  fundamental          written by start(), then by render() once per block

so inspecting a voice never holds the mutex and never costs a block.
*/

/// Number of partials per voice.
pub const HARMONIC_COUNT: usize = 3;

/// Fundamental amplitude below which a voice stops sounding.
pub const SILENCE_THRESHOLD: f64 = 0.001;

/// Sample rate assumed until the stream reports the real one.
pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

const NO_NOTE: u8 = u8::MAX;

/// Static description of one partial of the voice model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialShape {
    /// Frequency relative to the fundamental
    pub ratio: f64,
    /// Linear amplitude at the strike
    pub amplitude: f64,
    /// Per-sample amplitude multiplier
    pub decay: f64,
}

/// The steelpan partial stack.
pub const STEELPAN_PARTIALS: [PartialShape; HARMONIC_COUNT] = [
    PartialShape { ratio: 1.0, amplitude: 1.0, decay: 0.99995 },
    PartialShape { ratio: 2.001, amplitude: 0.6, decay: 0.99992 },
    PartialShape { ratio: 3.5, amplitude: 0.4, decay: 0.99985 },
];

/// Result of asking a voice to render one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Not playing, nothing was written.
    Idle,
    /// Rendered and still above the silence threshold.
    Sounding,
    /// Rendered and dropped below the threshold; the voice is now free.
    /// Carries the note and generation that just ended.
    Finished {
        note: Option<NoteId>,
        generation: u64,
    },
    /// A note-on held the voice; skipped for this block.
    Contended,
}

/// Host-side view of a voice, for meters and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSnapshot {
    pub playing: bool,
    pub note: Option<NoteId>,
    pub generation: u64,
    pub fundamental_amplitude: f64,
    pub phase_increments: [f64; HARMONIC_COUNT],
}

struct PartialBank {
    partials: [Partial; HARMONIC_COUNT],
}

impl PartialBank {
    fn strike(&mut self, frequency: f64, sample_rate: f64) {
        for (partial, shape) in self.partials.iter_mut().zip(STEELPAN_PARTIALS.iter()) {
            partial.strike(
                frequency * shape.ratio,
                sample_rate,
                shape.amplitude,
                shape.decay,
            );
        }
    }

    fn render(&mut self, buffer: &mut [f32], channels: usize) {
        for frame in buffer.chunks_exact_mut(channels) {
            let sample: f64 = self.partials.iter_mut().map(Partial::next_sample).sum();
            mix::add_to_frame(frame, sample as f32);
        }
    }

    fn fundamental_amplitude(&self) -> f64 {
        self.partials[0].amplitude
    }
}

/// One additive voice slot.
///
/// Voices are created once and re-struck in place; they are never moved or
/// dropped while the engine runs.
pub struct Voice {
    playing: AtomicBool,
    generation: AtomicU64,
    note: AtomicU8,
    // f64 bit patterns, see "Sharing Between Threads"
    sample_rate: AtomicU64,
    fundamental: AtomicU64,
    phase_increments: [AtomicU64; HARMONIC_COUNT],
    bank: Mutex<PartialBank>,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            playing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            note: AtomicU8::new(NO_NOTE),
            sample_rate: AtomicU64::new(DEFAULT_SAMPLE_RATE.to_bits()),
            fundamental: AtomicU64::new(0.0f64.to_bits()),
            phase_increments: std::array::from_fn(|_| AtomicU64::new(0.0f64.to_bits())),
            bank: Mutex::new(PartialBank {
                partials: [Partial::silent(); HARMONIC_COUNT],
            }),
        }
    }

    /// Set the sample rate used by subsequent strikes.
    pub fn set_sample_rate(&self, sample_rate: f64) {
        store_f64(&self.sample_rate, sample_rate);
    }

    /// Re-strike this voice for a new note and publish it to the render thread.
    ///
    /// Blocks only while the render thread is inside this voice's render()
    /// call, which is bounded by one block.
    pub fn start(&self, frequency: f64, generation: u64, note: NoteId) {
        let mut bank = self.bank.lock().unwrap_or_else(PoisonError::into_inner);
        bank.strike(frequency, load_f64(&self.sample_rate));
        for (published, partial) in self.phase_increments.iter().zip(bank.partials.iter()) {
            store_f64(published, partial.phase_increment);
        }
        store_f64(&self.fundamental, bank.fundamental_amplitude());
        self.note.store(note.index() as u8, Ordering::Relaxed);
        self.generation.store(generation, Ordering::Relaxed);
        self.playing.store(true, Ordering::Release);
    }

    /// Add this voice into an interleaved buffer.
    ///
    /// Never blocks and never allocates. The silence check runs once, after
    /// the whole block.
    pub fn render(&self, buffer: &mut [f32], channels: usize) -> RenderOutcome {
        if channels == 0 || !self.playing.load(Ordering::Acquire) {
            return RenderOutcome::Idle;
        }

        let mut bank = match self.bank.try_lock() {
            Ok(bank) => bank,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return RenderOutcome::Contended,
        };

        bank.render(buffer, channels);

        let fundamental = bank.fundamental_amplitude();
        store_f64(&self.fundamental, fundamental);

        if fundamental < SILENCE_THRESHOLD {
            // Read while still holding the bank so a restrike can't swap them
            let outcome = RenderOutcome::Finished {
                note: self.note(),
                generation: self.generation(),
            };
            self.playing.store(false, Ordering::Release);
            outcome
        } else {
            RenderOutcome::Sounding
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Allocation stamp of the current (or last) note; 0 if never started.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Note the voice was last struck with.
    pub fn note(&self) -> Option<NoteId> {
        match self.note.load(Ordering::Relaxed) {
            NO_NOTE => None,
            id => NoteId::new(id as i32),
        }
    }

    /// Fundamental amplitude as of the last strike or rendered block.
    pub fn fundamental_amplitude(&self) -> f64 {
        load_f64(&self.fundamental)
    }

    /// Copy of the published voice state. Never touches the voice lock, so
    /// it is safe to call while the render thread is running.
    pub fn snapshot(&self) -> VoiceSnapshot {
        VoiceSnapshot {
            playing: self.is_playing(),
            note: self.note(),
            generation: self.generation(),
            fundamental_amplitude: self.fundamental_amplitude(),
            phase_increments: std::array::from_fn(|i| load_f64(&self.phase_increments[i])),
        }
    }
}

#[inline]
fn store_f64(cell: &AtomicU64, value: f64) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

#[inline]
fn load_f64(cell: &AtomicU64) -> f64 {
    f64::from_bits(cell.load(Ordering::Relaxed))
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("playing", &self.is_playing())
            .field("note", &self.note())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
