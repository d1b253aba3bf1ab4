//! Master bus: makeup gain followed by a tanh soft clipper.
//!
//! Runs once per callback on the summed voices. It is stateless, so every
//! block is processed on its own with no look-ahead or smoothing.

use crate::dsp::{distortion, mix};

/// Gain applied to the voice sum before clipping.
pub const MAKEUP_GAIN: f32 = 2.5;

/// Drive into the tanh curve.
pub const DRIVE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    makeup_gain: f32,
    drive: f32,
}

impl Mixer {
    pub fn new(makeup_gain: f32, drive: f32) -> Self {
        Self { makeup_gain, drive }
    }

    /// Apply gain and soft clipping in place. Output is strictly inside (-1, 1).
    pub fn process(&self, buffer: &mut [f32]) {
        mix::apply_gain(buffer, self.makeup_gain);
        distortion::soft_clip_buffer(buffer, self.drive);
    }

    pub fn makeup_gain(&self) -> f32 {
        self.makeup_gain
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(MAKEUP_GAIN, DRIVE)
    }
}
