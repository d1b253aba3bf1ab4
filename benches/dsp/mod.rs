//! Benchmarks for low-level DSP primitives.

mod distortion;
mod mix;
mod partial;

pub use distortion::bench_distortion;
pub use mix::bench_mix;
pub use partial::bench_partial;
