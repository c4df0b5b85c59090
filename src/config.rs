#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BankError, Result};

/// Construction-time settings for an oscillator bank.
///
/// Polyphony and queue capacity are fixed once the bank is built; the sample
/// rate can be changed later from the control context.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankConfig {
    /// Audio sample rate in Hz.
    pub sample_rate: f32,
    /// Number of voice slots (maximum simultaneously sounding notes).
    pub polyphony: usize,
    /// Seconds to ramp a new note from 0 to full level.
    pub attack_secs: f32,
    /// Seconds for a released note to fade from its current level to 0.
    pub release_secs: f32,
    /// Capacity of the control -> render command queue.
    pub queue_capacity: usize,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            polyphony: 16,
            attack_secs: 0.005,
            release_secs: 0.1,
            queue_capacity: 256,
        }
    }
}

impl BankConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_polyphony(mut self, polyphony: usize) -> Self {
        self.polyphony = polyphony;
        self
    }

    pub fn with_attack(mut self, seconds: f32) -> Self {
        self.attack_secs = seconds;
        self
    }

    pub fn with_release(mut self, seconds: f32) -> Self {
        self.release_secs = seconds;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Check the settings a bank cannot run without.
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(BankError::InvalidSampleRate(self.sample_rate));
        }
        for seconds in [self.attack_secs, self.release_secs] {
            if !seconds.is_finite() {
                return Err(BankError::InvalidTime(seconds));
            }
        }
        if self.polyphony == 0 {
            return Err(BankError::InvalidSize { requested: 0 });
        }
        if self.queue_capacity == 0 {
            return Err(BankError::InvalidSize { requested: 0 });
        }
        Ok(())
    }
}
