//! Benchmarks for low-level DSP primitives.

mod envelope;
mod wavetable;

pub use envelope::bench_envelope;
pub use wavetable::bench_wavetable;
