//! Low-level DSP primitives used by the voice engine.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside voice structs.

/// Attack/sustain/release amplitude envelope.
pub mod envelope;
/// Capability trait for anything a voice can read samples from.
pub mod source;
/// Shared single-cycle waveform with interpolated lookup.
pub mod wavetable;

pub use envelope::{Envelope, EnvelopeStage};
pub use source::SampleSource;
pub use wavetable::WaveformTable;
