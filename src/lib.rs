pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod synth; // Voice management and polyphony

pub use config::BankConfig;
pub use dsp::{SampleSource, WaveformTable};
pub use error::{BankError, Result};
pub use synth::{
    bank::VoiceBank,
    engine::{oscillator_bank, BankController, BankRenderer},
    message::BankMessage,
};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
