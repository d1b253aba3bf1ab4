//! cpal output stream adapter.
//!
//! Opens the default output device in f32, hands every device callback to
//! the sink, and keeps the [`cpal::Stream`] alive until [`close`] is called.
//! cpal covers ALSA, CoreAudio, WASAPI and Oboe/AAudio on Android.
//!
//! [`close`]: AudioDriver::close

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig};

use super::{AudioDriver, DriverError, RenderSink, StreamInfo, StreamRequest};

pub struct CpalDriver {
    host: cpal::Host,
    stream: Option<cpal::Stream>,
}

impl CpalDriver {
    /// Use the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal driver initialised");
        Self { host, stream: None }
    }
}

impl Default for CpalDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDriver for CpalDriver {
    fn open(
        &mut self,
        request: &StreamRequest,
        mut sink: Box<dyn RenderSink>,
    ) -> Result<StreamInfo, DriverError> {
        let device = self
            .host
            .default_output_device()
            .ok_or(DriverError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| DriverError::UnsupportedConfig(e.to_string()))?;

        if supported.sample_format() != SampleFormat::F32 {
            return Err(DriverError::UnsupportedConfig(format!(
                "device prefers {:?} samples, f32 required",
                supported.sample_format()
            )));
        }

        let sample_rate = request
            .sample_rate
            .unwrap_or_else(|| supported.sample_rate().0);
        let channels = request.channels;
        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: BufferSize::Default,
        };
        let frame_channels = channels as usize;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| sink.render(data, frame_channels),
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| DriverError::Build(e.to_string()))?;

        stream.play().map_err(|e| DriverError::Play(e.to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "<unknown>".to_string());
        tracing::info!(
            device = %device_name,
            sample_rate,
            channels,
            "output stream started"
        );

        // Replacing an existing stream drops (and stops) it.
        self.stream = Some(stream);

        Ok(StreamInfo {
            sample_rate,
            channels,
        })
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                tracing::warn!(%err, "failed to pause output stream");
            }
        }
    }
}
