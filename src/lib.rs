pub mod dsp;
pub mod engine; // Engine facade and the realtime renderer
pub mod io;
pub mod notes;
pub mod synth; // Voice model, allocation, master bus

pub use engine::{Engine, EngineConfig, EngineError, NoteTrigger};
pub use notes::{NoteFrequencyTable, NoteId, NOTE_COUNT};
pub use synth::pool::{Allocation, VoicePool, MAX_POLYPHONY};
