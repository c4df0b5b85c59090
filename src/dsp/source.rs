use crate::dsp::wavetable::WaveformTable;

/// Anything a voice can read one waveform cycle from.
///
/// `phase` is a position within the cycle in `[0, 1)`. Implementations are
/// shared between the control and render contexts, so they must be readable
/// through `&self` from either side.
pub trait SampleSource: Send + Sync {
    fn sample_at(&self, phase: f32) -> f32;
}

impl SampleSource for WaveformTable {
    #[inline]
    fn sample_at(&self, phase: f32) -> f32 {
        self.lookup(phase)
    }
}

/// Plain functions of phase work as sources too (sine, noise, test signals).
impl<F> SampleSource for F
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    #[inline]
    fn sample_at(&self, phase: f32) -> f32 {
        self(phase)
    }
}
