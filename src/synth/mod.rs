// Purpose: Voice management, polyphony, control/render hand-off
// This layer sits above the dsp primitives and manages a pool of voices

pub mod bank;
pub mod engine;
pub mod message;
pub mod voice;
