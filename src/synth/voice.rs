use crate::dsp::{
    envelope::{Envelope, EnvelopeStage},
    source::SampleSource,
};

/// Convert a note number to frequency in Hz.
/// A4 = 440 Hz = note 69, twelve equal steps per octave.
///
/// Very high note numbers overflow to infinity; the voice playing them
/// silences itself on its first sample.
#[inline]
pub fn frequency_from_note(note: u16) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// One oscillator reading a shared waveform at its own pitch.
#[derive(Debug, Clone)]
pub struct Voice {
    note: u16,
    velocity: u8,
    phase: f32,
    phase_increment: f32,
    sample_rate: f32,
    envelope: Envelope,
}

impl Voice {
    pub fn new(sample_rate: f32, attack: f32, release: f32) -> Self {
        Self {
            note: 0,
            velocity: 0,
            phase: 0.0,
            phase_increment: 0.0,
            sample_rate,
            envelope: Envelope::new(attack, release),
        }
    }

    /// Start (or restart) the voice on `note`.
    ///
    /// With `frequency_hz` the note number is only a label and the pitch is
    /// taken as given, which allows arbitrary tunings. Phase always restarts
    /// at 0.
    pub fn activate(&mut self, note: u16, velocity: u8, frequency_hz: Option<f32>) {
        let frequency = frequency_hz.unwrap_or_else(|| frequency_from_note(note));

        self.note = note;
        self.velocity = velocity;
        self.phase_increment = frequency / self.sample_rate;
        self.phase = 0.0;
        self.envelope.note_on(self.sample_rate);
    }

    /// Enter the release tail. No-op when already releasing or idle.
    pub fn release(&mut self) {
        self.envelope.note_off(self.sample_rate);
    }

    /// Cut the voice off immediately, skipping the release tail.
    pub fn silence(&mut self) {
        self.envelope.reset();
    }

    /// Produce the next output sample and advance the voice by one frame.
    pub fn render_sample<S: SampleSource + ?Sized>(&mut self, source: &S) -> f32 {
        if self.is_idle() {
            return 0.0;
        }

        // A voice that can't advance is dropped rather than left stuck.
        if !(self.phase_increment.is_finite() && self.phase_increment > 0.0) {
            self.silence();
            return 0.0;
        }

        self.phase = (self.phase + self.phase_increment).fract();

        let sample = source.sample_at(self.phase) * self.envelope.level() * self.gain();
        if !sample.is_finite() {
            self.silence();
            return 0.0;
        }

        self.envelope.next_sample(self.sample_rate);
        sample
    }

    /// Follow a host sample-rate change without changing pitch or the length
    /// of a release already in progress.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let ratio = sample_rate / self.sample_rate;
        self.phase_increment /= ratio;
        self.envelope.rescale_release(ratio);
        self.sample_rate = sample_rate;
    }

    /// Linear velocity scaling, full scale at 255.
    #[inline]
    pub fn gain(&self) -> f32 {
        self.velocity as f32 / 255.0
    }

    pub fn is_idle(&self) -> bool {
        !self.envelope.is_active()
    }

    pub fn note(&self) -> u16 {
        self.note
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn phase_increment(&self) -> f32 {
        self.phase_increment
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.envelope.stage()
    }

    pub fn level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
