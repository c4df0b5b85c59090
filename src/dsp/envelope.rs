use crate::MIN_TIME;

/*
Attack/Sustain/Release Envelope
===============================

Each voice owns one of these. It turns the note's gate (held / released)
into an amplitude between 0.0 and 1.0 that multiplies the oscillator output.

Vocabulary
----------

  level       Current output value (0.0 to 1.0).

  stage       Idle, Attack, Sustain or Release. A small state machine decides
              which ramp the level follows.

  gate        Note on raises it (Attack), note off drops it (Release).


The Shape
---------

  Level
    1.0 ┐    ╱‾‾‾‾‾‾‾‾‾‾‾‾‾╲
        │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack    Sustain   Release

Both ramps are linear. Attack climbs by 1 / (attack_time * sample_rate) per
sample until it reaches 1.0; Sustain holds 1.0 for as long as the note is held.

note_on takes the first attack step straight away, so the very first frame of
a note is already above zero. A note released before it renders anything
still has a (short, quiet) tail instead of vanishing.


Release
-------

Release starts from whatever level the envelope had when the gate dropped
(releasing during attack must not jump up to 1.0 first). At note_off we
snapshot that level and the total number of release samples, then walk a
straight line down:

    level = start * (1 - elapsed / total)

After exactly `total` samples the level is 0.0 and the stage becomes Idle.
The tail is therefore monotonic and always finishes in a bounded number of
samples, however long the note was held.

If the sample rate changes mid-release, `total` and `elapsed` are scaled by
new_rate / old_rate so the tail keeps its length in seconds.


The State Machine
-----------------

    ┌──────┐ note_on ┌────────┐ level=1 ┌─────────┐
    │ Idle │ ──────→ │ Attack │ ──────→ │ Sustain │
    └──────┘         └────────┘         └─────────┘
        ↑                 │ note_off         │ note_off
        │ level=0         ↓                  │
        │            ┌─────────┐             │
        └─────────── │ Release │ ←───────────┘
                     └─────────┘

note_on from any stage restarts Attack from 0 (clean retrigger).
reset() jumps straight to Idle from anywhere.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // Gate low, level = 0
    Attack,  // Ramping up to 1.0
    Sustain, // Holding 1.0 while the gate is high
    Release, // Gate went low, ramping down to 0
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_time: f32,  // seconds to ramp 0 → 1
    release_time: f32, // seconds to ramp current → 0

    stage: EnvelopeStage,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn new(attack: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            release_time: release.max(MIN_TIME),

            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Gate high: restart the attack from zero and take its first step.
    pub fn note_on(&mut self, sample_rate: f32) {
        self.level = 0.0;
        self.stage = EnvelopeStage::Attack;
        self.release_elapsed_samples = 0;
        self.step_attack(sample_rate);
    }

    /// Gate low: start the release from the current level.
    ///
    /// Does nothing if the envelope is already releasing or idle.
    pub fn note_off(&mut self, sample_rate: f32) {
        if matches!(self.stage, EnvelopeStage::Idle | EnvelopeStage::Release) {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = self.release_samples(sample_rate);
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Number of samples a release takes at `sample_rate`.
    pub fn release_samples(&self, sample_rate: f32) -> u32 {
        (self.release_time * sample_rate).round().max(1.0) as u32
    }

    /// Keep a running release the same length in seconds after the sample
    /// rate is multiplied by `ratio`.
    pub fn rescale_release(&mut self, ratio: f32) {
        if self.stage != EnvelopeStage::Release || !(ratio.is_finite() && ratio > 0.0) {
            return;
        }

        let total = (self.release_total_samples as f32 * ratio).round().max(1.0) as u32;
        let elapsed = (self.release_elapsed_samples as f32 * ratio).round() as u32;
        self.release_total_samples = total;
        self.release_elapsed_samples = elapsed.min(total - 1);
    }

    /// Advance the envelope by one sample.
    pub fn next_sample(&mut self, sample_rate: f32) {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => self.step_attack(sample_rate),

            EnvelopeStage::Sustain => {
                self.level = 1.0;
            }

            EnvelopeStage::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    fn step_attack(&mut self, sample_rate: f32) {
        let increment = 1.0 / (self.attack_time * sample_rate);
        self.level += increment;

        if self.level >= 1.0 {
            self.level = 1.0;
            self.stage = EnvelopeStage::Sustain;
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeStage::Idle)
    }

    /// Jump to idle, skipping any release.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.release_start_level = 0.0;
        self.release_elapsed_samples = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}
