//! One channel's bank of generators.
//!
//! Every algorithm keeps its own instance so that switching modes never resets
//! the others, and no state is shared between channels.

use noisegen_core::noise::{FastGenerator, InterpolatedGenerator, NoiseSource, UniformGenerator};

use crate::distribution::DistributionSelector;
use crate::error::EngineError;
use crate::mixer;
use crate::mode::AlgorithmMode;

#[derive(Clone, Debug)]
pub struct ChannelVoices {
    uniform: UniformGenerator,
    fast: FastGenerator,
    pub(crate) interpolated: InterpolatedGenerator,
    distributions: DistributionSelector,
}

impl ChannelVoices {
    /// Fresh generators for a stream at `sample_rate`. With `Some(seed)` every
    /// channel starts from the same state; decorrelation separates them.
    pub fn new(sample_rate: f32, seed: Option<u64>) -> Result<Self, EngineError> {
        let uniform = match seed {
            Some(s) => UniformGenerator::from_seed(s),
            None => UniformGenerator::from_entropy(),
        };
        Ok(Self {
            uniform,
            fast: FastGenerator::new(),
            interpolated: InterpolatedGenerator::new(sample_rate),
            distributions: DistributionSelector::new(seed)?,
        })
    }

    /// Forward the color control to the interpolated generator.
    #[inline]
    pub fn set_color(&mut self, color: f32) {
        self.interpolated.set_speed(color);
    }

    /// Render one block with `mode`; `None` writes silence.
    #[inline]
    pub fn render<'a, I>(&mut self, mode: Option<AlgorithmMode>, out: I, gain: f32)
    where
        I: IntoIterator<Item = &'a mut f32>,
    {
        match mode {
            None => mixer::silence(out),
            Some(AlgorithmMode::Uniform) => mixer::render(&mut self.uniform, out, gain),
            Some(AlgorithmMode::FastRecurrence) => mixer::render(&mut self.fast, out, gain),
            Some(AlgorithmMode::Interpolated) => mixer::render(&mut self.interpolated, out, gain),
            Some(AlgorithmMode::DistributionBased(shape)) => {
                self.distributions.set_mode(shape);
                self.distributions.render(out, gain);
            }
        }
    }

    /// Advance every generator by `steps`, discarding output.
    pub fn advance_all(&mut self, steps: usize) {
        self.uniform.advance(steps);
        self.fast.advance(steps);
        self.interpolated.advance(steps);
        self.distributions.advance_all(steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::DistributionType;

    #[test]
    fn mode_switch_keeps_other_state() {
        let mut v = ChannelVoices::new(48_000.0, Some(5)).unwrap();
        let mut out = [0.0_f32; 64];
        v.render(Some(AlgorithmMode::FastRecurrence), out.iter_mut(), 1.0);
        let fast_after = v.fast;
        v.render(Some(AlgorithmMode::Interpolated), out.iter_mut(), 1.0);
        v.render(Some(AlgorithmMode::DistributionBased(DistributionType::Normal)), out.iter_mut(), 1.0);
        assert_eq!(v.fast, fast_after);
        assert_eq!(v.distributions.mode(), DistributionType::Normal);
    }

    #[test]
    fn none_is_silent() {
        let mut v = ChannelVoices::new(48_000.0, Some(5)).unwrap();
        let mut out = [0.7_f32; 32];
        v.render(None, out.iter_mut(), 1.0);
        assert!(out.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn same_seed_same_output() {
        let mut a = ChannelVoices::new(44_100.0, Some(11)).unwrap();
        let mut b = ChannelVoices::new(44_100.0, Some(11)).unwrap();
        let (mut x, mut y) = ([0.0_f32; 128], [0.0_f32; 128]);
        for mode in [AlgorithmMode::Uniform, AlgorithmMode::Interpolated] {
            a.render(Some(mode), x.iter_mut(), 1.0);
            b.render(Some(mode), y.iter_mut(), 1.0);
            assert_eq!(x, y);
        }
    }
}
