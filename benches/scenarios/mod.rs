//! Real-world scenario benchmarks.
//!
//! These model how a host drives the bank: chords held across many blocks,
//! and streams of notes forcing allocation and stealing.

mod bank;

pub use bank::bench_bank;
