// Purpose - the boundary to whatever drives the audio callback

pub mod cpal_driver;
pub mod offline;

use thiserror::Error;

pub use cpal_driver::CpalDriver;
pub use offline::{OfflineDriver, OfflineHandle};

/// Something that can fill an interleaved f32 output buffer.
///
/// Drivers call this from their realtime thread. Implementations must not
/// block, allocate, or fail partway through a buffer.
pub trait RenderSink: Send {
    fn render(&mut self, buffer: &mut [f32], channels: usize);
}

/// What the engine asks of the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    pub channels: u16,
    /// None lets the device pick its native rate.
    pub sample_rate: Option<u32>,
}

/// What the driver actually opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Error)]
pub enum DriverError {
    /// No output device available on the system.
    #[error("no audio output device available")]
    NoDevice,

    /// The device cannot provide the requested format.
    #[error("unsupported stream configuration: {0}")]
    UnsupportedConfig(String),

    /// The stream could not be built.
    #[error("failed to build output stream: {0}")]
    Build(String),

    /// The stream was built but would not start.
    #[error("failed to start output stream: {0}")]
    Play(String),
}

/// An output stream provider: opens a stream that periodically calls the
/// sink, and tears it down again.
pub trait AudioDriver {
    /// Open and start a stream. The sink is owned by the stream from here on.
    fn open(
        &mut self,
        request: &StreamRequest,
        sink: Box<dyn RenderSink>,
    ) -> Result<StreamInfo, DriverError>;

    /// Stop and release the stream. Calling it with nothing open is a no-op.
    fn close(&mut self);
}
