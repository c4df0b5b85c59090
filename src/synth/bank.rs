use std::sync::Arc;

use crate::{
    config::BankConfig,
    dsp::source::SampleSource,
    synth::{message::BankMessage, voice::Voice},
};

/// A voice plus the bookkeeping the bank keeps about it.
#[derive(Debug)]
struct Slot {
    voice: Voice,
    /// True while `voice.note()` is the live mapping for that note.
    routed: bool,
    /// Allocation stamp; smaller is older.
    order: u64,
}

/// Fixed pool of voices sharing one sample source.
///
/// All methods run on the render context: nothing here allocates after
/// construction and every loop is bounded by the pool size or block length.
pub struct VoiceBank<S: SampleSource> {
    slots: Vec<Slot>,
    source: Arc<S>,
    sample_rate: f32,
    next_order: u64,
}

impl<S: SampleSource> VoiceBank<S> {
    pub fn new(config: &BankConfig, source: Arc<S>) -> Self {
        let slots = (0..config.polyphony)
            .map(|_| Slot {
                voice: Voice::new(config.sample_rate, config.attack_secs, config.release_secs),
                routed: false,
                order: 0,
            })
            .collect();

        Self {
            slots,
            source,
            sample_rate: config.sample_rate,
            next_order: 0,
        }
    }

    /// Start `note`, or restart it in place if it is already sounding.
    ///
    /// When every slot is busy the oldest allocation is cut off and reused.
    pub fn start_note(&mut self, note: u16, velocity: u8, frequency_hz: Option<f32>) {
        if let Some(idx) = self.routed_slot(note) {
            self.slots[idx].voice.activate(note, velocity, frequency_hz);
            return;
        }

        let Some(idx) = self.free_slot().or_else(|| self.oldest_slot()) else {
            return;
        };

        let order = self.next_order;
        self.next_order += 1;

        let slot = &mut self.slots[idx];
        slot.voice.silence();
        slot.voice.activate(note, velocity, frequency_hz);
        slot.routed = true;
        slot.order = order;
    }

    /// Release `note` if it is mapped. Unknown notes are ignored.
    ///
    /// The voice keeps sounding through its release tail but is unmapped right
    /// away, so a new start of the same note gets a different slot.
    pub fn stop_note(&mut self, note: u16) {
        if let Some(idx) = self.routed_slot(note) {
            let slot = &mut self.slots[idx];
            slot.voice.release();
            slot.routed = false;
        }
    }

    /// Release every sounding voice through its normal tail.
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.voice.release();
            slot.routed = false;
        }
    }

    /// Silence every voice immediately and forget all mappings.
    pub fn reset_all(&mut self) {
        for slot in &mut self.slots {
            slot.voice.silence();
            slot.routed = false;
            slot.order = 0;
        }
        self.next_order = 0;
    }

    /// Mix every sounding voice into `out`, one sample per frame.
    ///
    /// `out` is overwritten. A voice that finishes partway through the block
    /// contributes nothing from that frame on.
    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        let source = &*self.source;
        for slot in self.slots.iter_mut() {
            if slot.voice.is_idle() {
                continue;
            }

            for sample in out.iter_mut() {
                *sample += slot.voice.render_sample(source);
                if slot.voice.is_idle() {
                    break;
                }
            }

            if slot.voice.is_idle() {
                slot.routed = false;
            }
        }
    }

    /// Apply one control command.
    ///
    /// Returns the previous source when the command replaced it, so the caller
    /// can dispose of it away from the render context.
    pub fn handle_message(&mut self, message: BankMessage<S>) -> Option<Arc<S>> {
        match message {
            BankMessage::NoteOn {
                note,
                velocity,
                frequency,
            } => self.start_note(note, velocity, frequency),
            BankMessage::NoteOff { note } => self.stop_note(note),
            BankMessage::AllNotesOff => self.release_all(),
            BankMessage::ResetAll => self.reset_all(),
            BankMessage::SetSampleRate(sample_rate) => self.set_sample_rate(sample_rate),
            BankMessage::PublishSource(source) => return Some(self.replace_source(source)),
        }
        None
    }

    /// Swap in a new sample source, returning the old one.
    pub fn replace_source(&mut self, source: Arc<S>) -> Arc<S> {
        std::mem::replace(&mut self.source, source)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return;
        }
        self.sample_rate = sample_rate;
        for slot in &mut self.slots {
            slot.voice.set_sample_rate(sample_rate);
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of voices that are not idle, releasing ones included.
    pub fn active_voice_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.voice.is_idle()).count()
    }

    /// All voices in slot order.
    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.slots.iter().map(|s| &s.voice)
    }

    /// Slot index currently mapped to `note`.
    pub fn slot_for_note(&self, note: u16) -> Option<usize> {
        self.routed_slot(note)
    }

    /// The voice currently mapped to `note`.
    pub fn voice_for_note(&self, note: u16) -> Option<&Voice> {
        self.routed_slot(note).map(|idx| &self.slots[idx].voice)
    }

    fn routed_slot(&self, note: u16) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.routed && s.voice.note() == note && !s.voice.is_idle())
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.voice.is_idle())
    }

    fn oldest_slot(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.voice.is_idle())
            .min_by_key(|(_, s)| s.order)
            .map(|(idx, _)| idx)
    }
}
