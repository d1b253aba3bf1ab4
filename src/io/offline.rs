//! Pull-based driver with no audio device.
//!
//! Instead of a hardware clock calling the sink, the owner of an
//! [`OfflineHandle`] pulls blocks whenever it wants them. Useful for
//! bouncing to a buffer and for exercising the engine in tests.

use std::sync::{Arc, Mutex, PoisonError};

use super::{AudioDriver, DriverError, RenderSink, StreamInfo, StreamRequest};

struct OpenStream {
    sink: Box<dyn RenderSink>,
    channels: usize,
}

type StreamSlot = Arc<Mutex<Option<OpenStream>>>;

pub struct OfflineDriver {
    sample_rate: u32,
    available: bool,
    stream: StreamSlot,
}

impl OfflineDriver {
    /// A driver that always opens at `sample_rate` unless the request names
    /// a rate of its own.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            available: true,
            stream: Arc::new(Mutex::new(None)),
        }
    }

    /// A driver whose device is missing; every open fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(48_000)
        }
    }

    /// Handle for pulling audio out of the currently open stream.
    pub fn handle(&self) -> OfflineHandle {
        OfflineHandle {
            stream: Arc::clone(&self.stream),
        }
    }
}

impl AudioDriver for OfflineDriver {
    fn open(
        &mut self,
        request: &StreamRequest,
        sink: Box<dyn RenderSink>,
    ) -> Result<StreamInfo, DriverError> {
        if !self.available {
            return Err(DriverError::NoDevice);
        }
        if request.channels == 0 {
            return Err(DriverError::UnsupportedConfig(
                "zero output channels".to_string(),
            ));
        }

        *self.stream.lock().unwrap_or_else(PoisonError::into_inner) = Some(OpenStream {
            sink,
            channels: request.channels as usize,
        });

        Ok(StreamInfo {
            sample_rate: request.sample_rate.unwrap_or(self.sample_rate),
            channels: request.channels,
        })
    }

    fn close(&mut self) {
        self.stream
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Pulls rendered blocks from an [`OfflineDriver`].
#[derive(Clone)]
pub struct OfflineHandle {
    stream: StreamSlot,
}

impl OfflineHandle {
    /// Render `frames` interleaved frames at the open channel count.
    /// Returns `None` when no stream is open.
    pub fn pull(&self, frames: usize) -> Option<Vec<f32>> {
        let mut slot = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        let stream = slot.as_mut()?;
        let mut buffer = vec![0.0; frames * stream.channels];
        stream.sink.render(&mut buffer, stream.channels);
        Some(buffer)
    }

    /// Render into a caller-provided interleaved buffer. Returns false when
    /// no stream is open (the buffer is left untouched).
    pub fn pull_into(&self, buffer: &mut [f32]) -> bool {
        let mut slot = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_mut() {
            Some(stream) => {
                stream.sink.render(buffer, stream.channels);
                true
            }
            None => false,
        }
    }

    /// Channel count of the open stream.
    pub fn channels(&self) -> Option<usize> {
        self.stream
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|stream| stream.channels)
    }

    pub fn is_open(&self) -> bool {
        self.channels().is_some()
    }
}
