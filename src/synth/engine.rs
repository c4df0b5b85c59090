//! Control/render split for a wavetable oscillator bank.
//!
//! [`oscillator_bank`] returns two halves. The [`BankController`] lives on
//! whatever thread handles notes and editing; the [`BankRenderer`] is moved
//! into the audio callback. They talk only through lock-free ring buffers
//! and one atomic counter:
//!
//! ```text
//!   control thread                         audio thread
//!   ──────────────                         ────────────
//!   BankController ── BankMessage ───────→ BankRenderer
//!         │  └─────── reset generation ────────→ │
//!         ↑                                      │
//!         └────── retired WaveformTable ─────────┘
//! ```
//!
//! A new waveform is built on the control side and published as an `Arc`;
//! the renderer swaps it in between blocks and sends the old one back so it
//! is freed on the control side.
//!
//! Reset bypasses the queue so a full queue can never swallow it. Every
//! queued command is stamped with the reset generation it was sent in; note
//! commands from before the latest reset are dropped when they are drained.
//!
//! ```
//! use oscbank::{oscillator_bank, BankConfig};
//!
//! let (mut controller, mut renderer) = oscillator_bank(BankConfig::default())?;
//! controller.configure_waveform(4)?;
//! for (index, value) in [0.0, 1.0, 0.0, -1.0].into_iter().enumerate() {
//!     controller.set_waveform_sample(value, index)?;
//! }
//! controller.note_on(69, 127)?;
//!
//! let mut block = [0.0f32; 256];
//! renderer.render_block(&mut block);
//! assert!(block.iter().any(|&s| s != 0.0));
//! # Ok::<(), oscbank::BankError>(())
//! ```

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use log::{debug, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::BankConfig,
    dsp::wavetable::WaveformTable,
    error::{BankError, Result},
    io::{converter::midi_to_message, midi::MidiEvent},
    synth::{bank::VoiceBank, message::BankMessage},
    MAX_BLOCK_SIZE,
};

/// A queued command and the reset generation it was sent in.
struct Command {
    generation: u64,
    message: BankMessage,
}

/// Build a connected controller/renderer pair.
pub fn oscillator_bank(config: BankConfig) -> Result<(BankController, BankRenderer)> {
    config.validate()?;

    let (tx, rx) = RingBuffer::<Command>::new(config.queue_capacity);
    // One retired table per published table, plus the initial empty one.
    let (retire_tx, retire_rx) =
        RingBuffer::<Arc<WaveformTable>>::new(config.queue_capacity + 1);

    let resets = Arc::new(AtomicU64::new(0));
    let bank = VoiceBank::new(&config, Arc::new(WaveformTable::empty()));

    debug!(
        "oscillator bank ready: {} voices at {} Hz",
        config.polyphony, config.sample_rate
    );

    let controller = BankController {
        tx,
        retired: retire_rx,
        resets: Arc::clone(&resets),
        generation: 0,
        table: None,
        sample_rate: config.sample_rate,
    };
    let renderer = BankRenderer {
        bank,
        rx,
        retired: retire_tx,
        resets,
        generation: 0,
        scratch: vec![0.0; MAX_BLOCK_SIZE],
    };

    Ok((controller, renderer))
}

/// Control-context half: notes, waveform editing, reset.
///
/// Every method returns immediately. Errors are reported here and never reach
/// the audio thread.
pub struct BankController {
    tx: Producer<Command>,
    retired: Consumer<Arc<WaveformTable>>,
    resets: Arc<AtomicU64>,
    generation: u64,
    table: Option<Arc<WaveformTable>>,
    sample_rate: f32,
}

impl BankController {
    /// Replace the waveform with `sample_count` samples of silence.
    pub fn configure_waveform(&mut self, sample_count: usize) -> Result<()> {
        let table = Arc::new(WaveformTable::new(sample_count).inspect_err(|err| {
            warn!("rejected waveform configuration: {err}");
        })?);

        self.collect_retired();
        self.send(BankMessage::PublishSource(Arc::clone(&table)))?;
        self.table = Some(table);

        debug!("published {sample_count}-sample waveform");
        Ok(())
    }

    /// Overwrite one sample of the current waveform.
    ///
    /// The write lands in the table the renderer is already reading, so it
    /// takes effect on the next lookup without going through the queue.
    pub fn set_waveform_sample(&mut self, value: f32, index: usize) -> Result<()> {
        let len = self.waveform_len();
        let table = self
            .table
            .as_ref()
            .ok_or(BankError::IndexOutOfRange { index, len })?;
        table.set_sample(value, index)
    }

    /// Start or retrigger `note`, pitched from its note number.
    pub fn note_on(&mut self, note: u16, velocity: u8) -> Result<()> {
        self.start(note, velocity, None)
    }

    /// Start or retrigger `note` at an explicit frequency.
    pub fn note_on_with_frequency(
        &mut self,
        note: u16,
        velocity: u8,
        frequency_hz: f32,
    ) -> Result<()> {
        if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
            warn!("rejected note {note}: invalid frequency {frequency_hz} Hz");
            return Err(BankError::InvalidFrequency(frequency_hz));
        }
        self.start(note, velocity, Some(frequency_hz))
    }

    /// Release `note`. Harmless if the note isn't sounding.
    pub fn note_off(&mut self, note: u16) -> Result<()> {
        self.send(BankMessage::NoteOff { note })
    }

    /// Release every sounding note through its normal tail.
    pub fn release_all(&mut self) -> Result<()> {
        self.send(BankMessage::AllNotesOff)
    }

    /// Silence everything on the next block and forget all notes.
    ///
    /// Never fails: the request does not go through the command queue, and
    /// note commands still queued from before it are discarded.
    pub fn reset_all(&mut self) {
        self.generation += 1;
        self.resets.store(self.generation, Ordering::Release);
        debug!("reset requested (generation {})", self.generation);
    }

    /// Tell the renderer the host's sample rate changed.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<()> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            warn!("rejected sample rate {sample_rate} Hz");
            return Err(BankError::InvalidSampleRate(sample_rate));
        }
        self.send(BankMessage::SetSampleRate(sample_rate))?;
        self.sample_rate = sample_rate;
        debug!("sample rate set to {sample_rate} Hz");
        Ok(())
    }

    /// Apply a MIDI event received on `channel`. Irrelevant events are ignored.
    pub fn handle_midi(&mut self, event: MidiEvent, channel: u8) -> Result<()> {
        match midi_to_message(event, channel) {
            Some(BankMessage::NoteOn {
                note,
                velocity,
                frequency,
            }) => self.start(note, velocity, frequency),
            Some(BankMessage::ResetAll) => {
                self.reset_all();
                Ok(())
            }
            Some(message) => self.send(message),
            None => Ok(()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.table.is_some()
    }

    pub fn waveform_len(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.len())
    }

    /// The waveform most recently published by this controller.
    pub fn waveform(&self) -> Option<&Arc<WaveformTable>> {
        self.table.as_ref()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn start(&mut self, note: u16, velocity: u8, frequency: Option<f32>) -> Result<()> {
        if self.table.is_none() {
            warn!("note {note} ignored: no waveform configured");
            return Err(BankError::UninitializedTable);
        }
        self.send(BankMessage::NoteOn {
            note,
            velocity,
            frequency,
        })
    }

    fn send(&mut self, message: BankMessage) -> Result<()> {
        let command = Command {
            generation: self.generation,
            message,
        };
        self.tx.push(command).map_err(|_| {
            warn!("control queue full, command dropped");
            BankError::QueueFull
        })
    }

    fn collect_retired(&mut self) {
        while let Ok(table) = self.retired.pop() {
            drop(table);
        }
    }
}

/// Render-context half. Move this into the audio callback.
pub struct BankRenderer {
    bank: VoiceBank<WaveformTable>,
    rx: Consumer<Command>,
    retired: Producer<Arc<WaveformTable>>,
    resets: Arc<AtomicU64>,
    generation: u64,
    scratch: Vec<f32>,
}

impl BankRenderer {
    /// Apply pending commands, then render `out.len()` mono frames.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.drain_messages();
        self.bank.render_block(out);
    }

    /// Apply pending commands, then fill an interleaved buffer with the mono
    /// signal copied to every channel.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        if channels == 0 {
            return;
        }

        self.drain_messages();

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE.saturating_mul(channels)) {
            let frames = chunk.len() / channels;
            let block = &mut self.scratch[..frames];
            self.bank.render_block(block);

            for (frame, &sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                frame.fill(sample);
            }
        }
    }

    pub fn bank(&self) -> &VoiceBank<WaveformTable> {
        &self.bank
    }

    fn drain_messages(&mut self) {
        let requested = self.resets.load(Ordering::Acquire);
        if requested != self.generation {
            self.bank.reset_all();
            self.generation = requested;
        }

        while let Ok(Command {
            generation,
            message,
        }) = self.rx.pop()
        {
            // Sent after a reset that landed since the load above.
            if generation > self.generation {
                self.bank.reset_all();
                self.generation = generation;
            }

            let stale = generation < self.generation;
            if stale
                && !matches!(
                    message,
                    BankMessage::PublishSource(_) | BankMessage::SetSampleRate(_)
                )
            {
                continue;
            }

            if let Some(old) = self.bank.handle_message(message) {
                // If the return queue is somehow full the table is freed here.
                let _ = self.retired.push(old);
            }
        }
    }
}
