//! The engine facade: a voice pool, a note table and an output stream.
//!
//! Lifecycle is explicit and owned by the host:
//!
//! ```text
//!   Engine::new ──→ start() ──→ note_on()* ──→ stop() ──→ drop
//!                      │                          ▲
//!                      └── driver calls Renderer ─┘  (realtime thread)
//! ```
//!
//! # Example
//!
//! ```
//! use steelpan::{Engine, EngineConfig, io::OfflineDriver};
//!
//! let driver = OfflineDriver::new(48_000);
//! let pull = driver.handle();
//! let mut engine = Engine::new(driver, EngineConfig::default());
//!
//! engine.start()?;
//! engine.note_on(11)?; // C4
//! let block = pull.pull(256).unwrap();
//! assert!(block.iter().any(|s| *s != 0.0));
//! engine.stop();
//! # Ok::<(), steelpan::EngineError>(())
//! ```

pub mod config;
pub mod renderer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, RingBuffer};
use thiserror::Error;

use crate::{
    io::{AudioDriver, DriverError, StreamInfo},
    notes::{NoteFrequencyTable, NoteId},
    synth::{
        message::{EventReceiver, VoiceEvent},
        pool::{Allocation, PoolError, VoicePool, MAX_POLYPHONY},
        voice::VoiceSnapshot,
    },
};

pub use config::EngineConfig;
pub use renderer::Renderer;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Note-on arrived while no stream was open.
    #[error("engine is not running")]
    NotRunning,

    /// Note id outside the playable range.
    #[error("invalid note id {0}")]
    InvalidNote(i32),

    /// The output stream could not be opened.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// The voice pool has no voices. Fatal.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Cloneable, thread-safe note-on entry point.
///
/// Lets any thread strike notes without owning the engine (and its stream).
#[derive(Clone)]
pub struct NoteTrigger {
    pool: Arc<VoicePool>,
    running: Arc<AtomicBool>,
    notes: NoteFrequencyTable,
}

impl NoteTrigger {
    /// Strike note `note_id` (0-19).
    ///
    /// Rejected notes are reported through `tracing` and leave every voice
    /// untouched.
    pub fn note_on(&self, note_id: i32) -> Result<Allocation, EngineError> {
        let Some(note) = NoteId::new(note_id) else {
            tracing::warn!(note_id, "note-on rejected: invalid note id");
            return Err(EngineError::InvalidNote(note_id));
        };

        if !self.running.load(Ordering::Acquire) {
            tracing::warn!(note_id, "note-on rejected: engine not running");
            return Err(EngineError::NotRunning);
        }

        self.pool
            .allocate(self.notes.frequency(note), note)
            .map_err(|err| {
                tracing::error!(%err, "voice pool misconfigured");
                EngineError::from(err)
            })
    }
}

pub struct Engine<D: AudioDriver> {
    config: EngineConfig,
    driver: D,
    trigger: NoteTrigger,
    stream: Option<StreamInfo>,
    events: Option<Consumer<VoiceEvent>>,
    scope: Option<Consumer<f32>>,
}

impl<D: AudioDriver> Engine<D> {
    pub fn new(driver: D, config: EngineConfig) -> Self {
        Self {
            config,
            driver,
            trigger: NoteTrigger {
                pool: Arc::new(VoicePool::new(MAX_POLYPHONY)),
                running: Arc::new(AtomicBool::new(false)),
                notes: NoteFrequencyTable::new(),
            },
            stream: None,
            events: None,
            scope: None,
        }
    }

    /// Open the output stream and propagate its sample rate to every voice.
    ///
    /// Already running: returns the current stream without reopening.
    pub fn start(&mut self) -> Result<StreamInfo, EngineError> {
        if let Some(info) = self.stream {
            return Ok(info);
        }

        let (event_tx, event_rx) = RingBuffer::new(self.config.event_capacity.max(1));
        let (scope_tx, scope_rx) = match self.config.scope_capacity {
            0 => (None, None),
            capacity => {
                let (tx, rx) = RingBuffer::new(capacity);
                (Some(tx), Some(rx))
            }
        };

        let renderer = Renderer::new(
            Arc::clone(&self.trigger.pool),
            self.config.mixer(),
            event_tx,
            scope_tx,
        );

        let info = self
            .driver
            .open(&self.config.stream_request(), Box::new(renderer))
            .map_err(|err| {
                tracing::error!(%err, "failed to open output stream");
                EngineError::from(err)
            })?;

        self.trigger.pool.set_sample_rate(info.sample_rate as f64);
        self.stream = Some(info);
        self.events = Some(event_rx);
        self.scope = scope_rx;
        self.trigger.running.store(true, Ordering::Release);

        tracing::info!(
            sample_rate = info.sample_rate,
            channels = info.channels,
            polyphony = MAX_POLYPHONY,
            "engine started"
        );
        Ok(info)
    }

    /// Stop and release the stream. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.stream.take().is_none() {
            return;
        }
        self.trigger.running.store(false, Ordering::Release);
        self.driver.close();
        tracing::info!("engine stopped");
    }

    /// Strike note `note_id` (0-19). See [`NoteTrigger::note_on`].
    pub fn note_on(&self, note_id: i32) -> Result<Allocation, EngineError> {
        self.trigger.note_on(note_id)
    }

    /// A handle other threads can use to strike notes.
    pub fn trigger(&self) -> NoteTrigger {
        self.trigger.clone()
    }

    /// Pop and log every pending render-thread event. Returns how many.
    pub fn drain_events(&mut self) -> usize {
        let Some(events) = self.events.as_mut() else {
            return 0;
        };

        let mut count = 0;
        while let Some(event) = EventReceiver::pop(events) {
            match event {
                VoiceEvent::Finished {
                    slot,
                    note,
                    generation,
                } => tracing::debug!(slot, ?note, generation, "voice finished"),
                VoiceEvent::Skipped { slot } => {
                    tracing::debug!(slot, "voice skipped during restrike")
                }
            }
            count += 1;
        }
        count
    }

    /// Take the oscilloscope tap, if one was configured.
    pub fn take_scope(&mut self) -> Option<Consumer<f32>> {
        self.scope.take()
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.stream
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> &VoicePool {
        &self.trigger.pool
    }

    pub fn active_voices(&self) -> usize {
        self.trigger.pool.active_count()
    }

    /// Per-slot state, for meters. Host side only.
    pub fn voice_snapshots(&self) -> [VoiceSnapshot; MAX_POLYPHONY] {
        let voices = self.trigger.pool.voices();
        std::array::from_fn(|slot| voices[slot].snapshot())
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: AudioDriver> Drop for Engine<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::OfflineDriver;

    fn engine() -> (Engine<OfflineDriver>, crate::io::OfflineHandle) {
        let driver = OfflineDriver::new(48_000);
        let handle = driver.handle();
        (Engine::new(driver, EngineConfig::default()), handle)
    }

    #[test]
    fn note_on_before_start_is_rejected() {
        let (engine, _) = engine();
        assert!(matches!(engine.note_on(3), Err(EngineError::NotRunning)));
        assert_eq!(engine.active_voices(), 0);
    }

    #[test]
    fn start_is_idempotent() {
        let (mut engine, _) = engine();
        let first = engine.start().unwrap();
        let second = engine.start().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.sample_rate, 48_000);
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut engine, handle) = engine();
        engine.start().unwrap();
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
        assert!(!handle.is_open());
        assert!(matches!(engine.note_on(3), Err(EngineError::NotRunning)));
    }

    #[test]
    fn failed_open_is_reported() {
        let mut engine = Engine::new(OfflineDriver::unavailable(), EngineConfig::default());
        assert!(matches!(
            engine.start(),
            Err(EngineError::Driver(DriverError::NoDevice))
        ));
        assert!(!engine.is_running());
    }

    #[test]
    fn drain_reports_finished_voices() {
        let (mut engine, handle) = engine();
        engine.start().unwrap();
        engine.note_on(0).unwrap();

        while engine.active_voices() > 0 {
            handle.pull(4096).unwrap();
        }

        assert_eq!(engine.drain_events(), 1);
        assert_eq!(engine.drain_events(), 0);
    }

    #[test]
    fn snapshots_follow_allocation() {
        let (mut engine, _) = engine();
        engine.start().unwrap();
        engine.note_on(5).unwrap();

        let snaps = engine.voice_snapshots();
        assert!(snaps[0].playing);
        assert_eq!(snaps[0].note, NoteId::new(5));
        assert!(snaps[1..].iter().all(|s| !s.playing));
    }
}
