use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{BankError, Result};

/*
Wavetable Lookup
================

A wavetable stores exactly one cycle of a waveform as N evenly spaced samples.
Playing it back at any pitch is just a matter of walking a phase accumulator
through the cycle and reading the table at that phase.

Vocabulary
----------

  phase       Position within the cycle, 0.0 (start) up to but excluding 1.0.
              Phase 0.5 is halfway through the cycle regardless of N.

  grid point  The phase of a stored sample: index i sits at phase i / N.

  position    phase * N, the phase expressed in table indices. Its integer
              part picks the left grid point, its fraction is the weight
              given to the right one.


Linear Interpolation With Wrap-Around
-------------------------------------

Between grid points we draw a straight line:

    s[i0]  ●
            ╲
             ╲  ← lookup(phase) lands here, f of the way along
              ╲
               ●  s[i1]

    i0 = floor(position) mod N
    i1 = (i0 + 1) mod N
    f  = position - floor(position)
    out = (1 - f) * s[i0] + f * s[i1]

The table is a cycle, so the last sample interpolates toward the first one
(i1 wraps to 0). A phase exactly on a grid point returns that sample
unchanged; a phase exactly halfway returns the mean of the two neighbours.


Sharing Between Threads
-----------------------

The render thread reads the table while the control thread may be editing a
single sample. Each sample is stored as the bit pattern of an f32 inside an
AtomicU32, so a reader sees either the old or the new value of that sample,
never a half-written float. Relaxed ordering is enough: samples are
independent and nothing else is synchronised through them.

Resizing never happens in place. A new table is built and published as a
whole (see synth::engine), so one render block never mixes two tables.
*/

/// One cycle of a user-editable waveform.
#[derive(Debug)]
pub struct WaveformTable {
    samples: Box<[AtomicU32]>,
}

impl WaveformTable {
    /// Allocate a table of `sample_count` samples, all silent.
    pub fn new(sample_count: usize) -> Result<Self> {
        if sample_count == 0 {
            return Err(BankError::InvalidSize { requested: 0 });
        }

        let samples = (0..sample_count)
            .map(|_| AtomicU32::new(0.0_f32.to_bits()))
            .collect();

        Ok(Self { samples })
    }

    /// A zero-length table. Every lookup on it is silence.
    pub fn empty() -> Self {
        Self {
            samples: Vec::new().into_boxed_slice(),
        }
    }

    /// Build a table holding a copy of `samples`.
    pub fn from_samples(samples: &[f32]) -> Result<Self> {
        let table = Self::new(samples.len())?;
        for (slot, &value) in table.samples.iter().zip(samples) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read one stored sample, if `index` is in range.
    pub fn sample(&self, index: usize) -> Option<f32> {
        self.samples
            .get(index)
            .map(|s| f32::from_bits(s.load(Ordering::Relaxed)))
    }

    /// Replace one sample. Safe to call while another thread is reading.
    pub fn set_sample(&self, value: f32, index: usize) -> Result<()> {
        let len = self.len();
        let slot = self
            .samples
            .get(index)
            .ok_or(BankError::IndexOutOfRange { index, len })?;
        slot.store(value.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Copy the current contents out, e.g. for saving a waveform.
    pub fn to_vec(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|s| f32::from_bits(s.load(Ordering::Relaxed)))
            .collect()
    }

    /// Linearly interpolated read at `phase`, taken modulo 1.0.
    pub fn lookup(&self, phase: f32) -> f32 {
        let len = self.samples.len();
        if len == 0 {
            return 0.0;
        }

        let phase = phase.rem_euclid(1.0);
        if !phase.is_finite() {
            return 0.0;
        }

        let mut position = phase * len as f32;

        // i / N * N can land one ulp off the grid point; snap it back so grid
        // phases read the stored sample exactly.
        let nearest = position.round();
        if (position - nearest).abs() <= nearest.max(1.0) * f32::EPSILON * 2.0 {
            position = nearest;
        }

        let floor = position.floor();
        let frac = position - floor;
        let i0 = (floor as usize) % len;
        let i1 = (i0 + 1) % len;

        let s0 = self.load(i0);
        if frac == 0.0 {
            return s0;
        }
        let s1 = self.load(i1);

        (1.0 - frac) * s0 + frac * s1
    }

    #[inline]
    fn load(&self, index: usize) -> f32 {
        f32::from_bits(self.samples[index].load(Ordering::Relaxed))
    }
}

impl Default for WaveformTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(samples: &[f32]) -> WaveformTable {
        WaveformTable::from_samples(samples).unwrap()
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(
            WaveformTable::new(0).unwrap_err(),
            BankError::InvalidSize { requested: 0 }
        );
    }

    #[test]
    fn fresh_table_is_silent() {
        for size in [1, 2, 3, 7, 64, 1000] {
            let table = WaveformTable::new(size).unwrap();
            for step in 0..100 {
                let phase = step as f32 / 100.0;
                assert_eq!(table.lookup(phase), 0.0, "size {size}, phase {phase}");
            }
        }
    }

    #[test]
    fn empty_table_is_silent() {
        let table = WaveformTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.lookup(0.0), 0.0);
        assert_eq!(table.lookup(0.7), 0.0);
        assert_eq!(table.lookup(-3.2), 0.0);
    }

    #[test]
    fn grid_phase_returns_stored_sample() {
        for size in [3, 4, 5, 10, 257] {
            let table = WaveformTable::new(size).unwrap();
            for index in 0..size {
                let value = (index as f32 * 0.37).sin();
                table.set_sample(value, index).unwrap();
                let phase = index as f32 / size as f32;
                assert_eq!(table.lookup(phase), value, "size {size}, index {index}");
            }
        }
    }

    #[test]
    fn midpoint_is_the_mean() {
        let table = table(&[0.2, 0.8, -0.4, 0.6]);
        assert!((table.lookup(0.125) - 0.5).abs() < 1e-6);
        assert!((table.lookup(0.375) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn last_sample_wraps_to_first() {
        let table = table(&[1.0, 0.0, 0.0, 0.0]);
        // Halfway between index 3 (0.0) and index 0 (1.0)
        assert!((table.lookup(0.875) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn phase_is_taken_modulo_one() {
        let table = table(&[0.0, 1.0, 0.0, -1.0]);
        assert_eq!(table.lookup(1.25), table.lookup(0.25));
        assert_eq!(table.lookup(-0.75), table.lookup(0.25));
        assert_eq!(table.lookup(1.0), 0.0);
    }

    #[test]
    fn out_of_range_write_is_rejected() {
        let table = WaveformTable::new(4).unwrap();
        assert_eq!(
            table.set_sample(1.0, 4),
            Err(BankError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(table.to_vec(), vec![0.0; 4]);
    }

    #[test]
    fn non_finite_phase_is_silent() {
        let table = table(&[1.0, 1.0]);
        assert_eq!(table.lookup(f32::NAN), 0.0);
        assert_eq!(table.lookup(f32::INFINITY), 0.0);
    }
}
