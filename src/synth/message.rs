use std::sync::Arc;

use crate::dsp::wavetable::WaveformTable;

/// Control commands carried from the control context to the renderer.
///
/// The renderer drains these at the start of each block, so a block sees
/// every command either fully applied or not at all.
#[derive(Debug)]
pub enum BankMessage<S = WaveformTable> {
    NoteOn {
        note: u16,
        velocity: u8,
        /// Explicit pitch in Hz; `None` derives it from the note number.
        frequency: Option<f32>,
    },
    NoteOff {
        note: u16,
    },
    AllNotesOff,
    /// `BankController` raises its reset generation instead of queueing this,
    /// so a reset can't be lost to a full queue.
    ResetAll,
    SetSampleRate(f32),
    /// Replace the shared sample source wholesale.
    PublishSource(Arc<S>),
}
