use thiserror::Error;

/// Errors reported to the control context.
///
/// Nothing on the render path returns these; render-time problems degrade the
/// affected voice to silence instead.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BankError {
    #[error("waveform size must be greater than zero (requested {requested})")]
    InvalidSize { requested: usize },

    #[error("sample index {index} is out of range for a table of {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no waveform has been configured yet")]
    UninitializedTable,

    #[error("frequency must be finite and positive, got {0} Hz")]
    InvalidFrequency(f32),

    #[error("sample rate must be finite and positive, got {0} Hz")]
    InvalidSampleRate(f32),

    #[error("envelope time must be finite, got {0} s")]
    InvalidTime(f32),

    #[error("control queue is full")]
    QueueFull,
}

pub type Result<T> = std::result::Result<T, BankError>;
