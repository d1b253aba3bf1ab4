//! Benchmarks for complete render callbacks and note-on.

mod note_on;
mod render;

pub use note_on::bench_note_on;
pub use render::bench_render;
