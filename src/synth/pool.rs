use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::{
    notes::NoteId,
    synth::{
        message::VoiceEvent,
        voice::{RenderOutcome, Voice},
    },
};

/*
Voice Allocation
================

The pool owns a fixed array of voices and a generation counter. Every
allocation stamps the chosen voice with the next generation, so generations
act as "birth times": smaller means older.

    note_on(n)
       │
       ├─ any voice idle?  ──yes──→ first idle voice in slot order
       │
       └─ no ─→ playing voice with the smallest generation
                (first slot wins a tie)

The counter starts at 1 (0 means "never started") and only ever grows, for
fresh and stolen allocations alike. It is a u64: at 1000 notes per second it
would take half a billion years to wrap.

The allocation lock guards the counter and serialises note-ons against
each other. The render thread never takes it; it reads each voice's
`playing` flag and renders through the voice's own try_lock.
*/

/// Maximum simultaneously sounding voices.
pub const MAX_POLYPHONY: usize = 10;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The pool was built with no voices. A configuration bug, never a
    /// transient condition.
    #[error("voice pool has no voices to allocate")]
    NoVoiceAvailable,
}

/// The note cut short when a voice was stolen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StolenVoice {
    pub note: Option<NoteId>,
    pub generation: u64,
}

/// Where a note-on landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub slot: usize,
    pub generation: u64,
    pub stolen: Option<StolenVoice>,
}

pub struct VoicePool {
    voices: Box<[Voice]>,
    next_generation: Mutex<u64>,
}

impl VoicePool {
    pub fn new(capacity: usize) -> Self {
        let voices = (0..capacity).map(|_| Voice::new()).collect();

        Self {
            voices,
            next_generation: Mutex::new(1),
        }
    }

    /// Propagate the stream's sample rate to every voice.
    pub fn set_sample_rate(&self, sample_rate: f64) {
        for voice in self.voices.iter() {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Pick a voice for `note` and strike it at `frequency`.
    ///
    /// Linear in the number of voices. Holds the allocation lock for the
    /// whole scan + strike, and must stay free of I/O and logging.
    pub fn allocate(&self, frequency: f64, note: NoteId) -> Result<Allocation, PoolError> {
        let mut next_generation = self
            .next_generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (slot, stolen) = match self.voices.iter().position(|v| !v.is_playing()) {
            Some(slot) => (slot, None),
            None => {
                let slot = self.oldest_slot().ok_or(PoolError::NoVoiceAvailable)?;
                let victim = &self.voices[slot];
                let stolen = StolenVoice {
                    note: victim.note(),
                    generation: victim.generation(),
                };
                (slot, Some(stolen))
            }
        };

        let generation = *next_generation;
        *next_generation += 1;
        self.voices[slot].start(frequency, generation, note);

        Ok(Allocation {
            slot,
            generation,
            stolen,
        })
    }

    /// Render every playing voice into `buffer`, reporting lifecycle events.
    ///
    /// `buffer` must already be zeroed (or hold content to mix over).
    pub fn render<F>(&self, buffer: &mut [f32], channels: usize, mut on_event: F)
    where
        F: FnMut(VoiceEvent),
    {
        if channels == 0 {
            return;
        }

        for (slot, voice) in self.voices.iter().enumerate() {
            match voice.render(buffer, channels) {
                RenderOutcome::Finished { note, generation } => on_event(VoiceEvent::Finished {
                    slot,
                    note,
                    generation,
                }),
                RenderOutcome::Contended => on_event(VoiceEvent::Skipped { slot }),
                RenderOutcome::Idle | RenderOutcome::Sounding => {}
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_playing()).count()
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Generation the next allocation will receive.
    pub fn next_generation(&self) -> u64 {
        *self
            .next_generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // min_by_key keeps the first of equal minima, so slot order breaks ties.
    fn oldest_slot(&self) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.generation())
            .map(|(slot, _)| slot)
    }
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new(MAX_POLYPHONY)
    }
}

impl std::fmt::Debug for VoicePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoicePool")
            .field("capacity", &self.capacity())
            .field("active", &self.active_count())
            .field("next_generation", &self.next_generation())
            .finish()
    }
}
