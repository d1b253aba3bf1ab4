#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    io::StreamRequest,
    synth::mixer::{Mixer, DRIVE, MAKEUP_GAIN},
};

/// Construction-time settings for an [`Engine`](super::Engine).
///
/// The voice model itself (partials, decay, polyphony) is fixed; this only
/// covers the stream request, the master bus and the host notification rings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Interleaved output channels; every channel carries the same signal.
    pub channels: u16,
    /// Requested sample rate. None = device default.
    pub sample_rate: Option<u32>,
    pub makeup_gain: f32,
    pub drive: f32,
    /// Capacity of the render-thread event ring.
    pub event_capacity: usize,
    /// Capacity of the oscilloscope tap in samples. 0 disables it.
    pub scope_capacity: usize,
}

impl EngineConfig {
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_scope(mut self, capacity: usize) -> Self {
        self.scope_capacity = capacity;
        self
    }

    pub(crate) fn stream_request(&self) -> StreamRequest {
        StreamRequest {
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }

    pub(crate) fn mixer(&self) -> Mixer {
        Mixer::new(self.makeup_gain, self.drive)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: None,
            makeup_gain: MAKEUP_GAIN,
            drive: DRIVE,
            event_capacity: 64,
            scope_capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_master_bus() {
        let config = EngineConfig::default();
        assert_eq!(config.channels, 2);
        assert_eq!(config.mixer(), Mixer::default());
        assert_eq!(config.stream_request().sample_rate, None);
    }

    #[test]
    fn builders_override_fields() {
        let config = EngineConfig::default()
            .with_channels(1)
            .with_sample_rate(44_100)
            .with_scope(2048);
        assert_eq!(
            config.stream_request(),
            StreamRequest {
                channels: 1,
                sample_rate: Some(44_100)
            }
        );
        assert_eq!(config.scope_capacity, 2048);
    }
}
