// Purpose: voice model, voice allocation and the master bus
// This layer sits between the DSP primitives and the engine facade

pub mod message;
pub mod mixer;
pub mod pool;
pub mod voice;
