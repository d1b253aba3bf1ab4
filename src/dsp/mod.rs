//! Low-level DSP primitives used by the voice and mixer layers.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! call from the audio callback. They stay focused on the signal-processing
//! math; voice lifecycle and threading live in [`crate::synth`].

/// Tanh soft clipping and the output ceiling.
pub mod distortion;
/// Summing and gain for interleaved buffers.
pub mod mix;
/// A single exponentially decaying sine partial.
pub mod partial;
