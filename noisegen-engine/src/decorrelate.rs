//! Stream-start warm-up that separates otherwise identical channels.
//!
//! The recurrences are deterministic, so channels built from the same seeds
//! would emit the same signal. Before any audio is produced, every channel
//! after the first is advanced by one second's worth of discarded samples.
//! The offset is the same on every run, so the result is still repeatable.

use noisegen_core::noise::{FastGenerator, InterpolatedGenerator, NoiseSource, UniformGenerator};
use tracing::debug;

use crate::distribution::DistributionSelector;
use crate::voices::ChannelVoices;

/// Something whose state can be advanced without producing audio.
pub trait WarmUp {
    fn warm_up(&mut self, steps: usize);
}

macro_rules! warm_up_via_advance {
    ($($t:ty),* $(,)?) => {
        $(impl WarmUp for $t {
            #[inline]
            fn warm_up(&mut self, steps: usize) { self.advance(steps); }
        })*
    };
}

warm_up_via_advance!(UniformGenerator, FastGenerator, InterpolatedGenerator);

impl WarmUp for DistributionSelector {
    fn warm_up(&mut self, steps: usize) {
        self.advance_all(steps);
    }
}

impl WarmUp for ChannelVoices {
    fn warm_up(&mut self, steps: usize) {
        self.advance_all(steps);
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChannelDecorrelator {
    seconds: f32,
}

impl Default for ChannelDecorrelator {
    fn default() -> Self {
        Self { seconds: 1.0 }
    }
}

impl ChannelDecorrelator {
    pub fn new(seconds: f32) -> Self {
        Self { seconds: if seconds.is_finite() { seconds.max(0.0) } else { 1.0 } }
    }

    /// Warm-up length in samples at `sample_rate`.
    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn steps(&self, sample_rate: f32) -> usize {
        let n = (sample_rate * self.seconds).round();
        if n.is_finite() && n > 0.0 { n as usize } else { 0 }
    }

    /// Advance `channels[1..]` by [`steps`](Self::steps). Returns the per-channel
    /// step count, or 0 when there is only one channel.
    pub fn apply<T: WarmUp>(&self, channels: &mut [T], sample_rate: f32) -> usize {
        if channels.len() <= 1 {
            return 0;
        }
        let steps = self.steps(sample_rate);
        for ch in channels.iter_mut().skip(1) {
            ch.warm_up(steps);
        }
        debug!(channels = channels.len() - 1, steps, "decorrelation warm-up applied");
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn differing_ratio<S: NoiseSource>(a: &mut S, b: &mut S, n: usize) -> f32 {
        let diff = (0..n).filter(|_| a.process() != b.process()).count();
        diff as f32 / n as f32
    }

    #[test]
    fn one_second_of_steps() {
        let d = ChannelDecorrelator::default();
        assert_eq!(d.steps(48_000.0), 48_000);
        assert_eq!(d.steps(44_100.0), 44_100);
        assert_eq!(ChannelDecorrelator::new(0.5).steps(48_000.0), 24_000);
        assert_eq!(d.steps(f32::NAN), 0);
    }

    #[test]
    fn first_channel_untouched_others_advanced() {
        let mut chans = [FastGenerator::new(); 3];
        let steps = ChannelDecorrelator::default().apply(&mut chans, 48_000.0);
        assert_eq!(steps, 48_000);

        let mut reference = FastGenerator::new();
        assert_eq!(chans[0], reference);
        reference.advance(48_000);
        assert_eq!(chans[1], reference);
        assert_eq!(chans[2], reference);
    }

    #[test]
    fn mono_is_left_alone() {
        let mut chans = [FastGenerator::new()];
        assert_eq!(ChannelDecorrelator::default().apply(&mut chans, 48_000.0), 0);
        assert_eq!(chans[0], FastGenerator::new());
    }

    #[test]
    fn fast_channels_decorrelate() {
        let mut chans = [FastGenerator::new(); 2];
        ChannelDecorrelator::default().apply(&mut chans, 48_000.0);
        let [mut l, mut r] = chans;
        assert!(differing_ratio(&mut l, &mut r, 4096) > 0.99);
    }

    #[test]
    fn interpolated_channels_decorrelate() {
        let mut chans = [InterpolatedGenerator::new(48_000.0); 2];
        ChannelDecorrelator::default().apply(&mut chans, 48_000.0);
        let [mut l, mut r] = chans;
        assert!(differing_ratio(&mut l, &mut r, 4096) > 0.99);
    }

    #[test]
    fn seeded_uniform_channels_decorrelate() {
        let mut chans = [UniformGenerator::from_seed(3), UniformGenerator::from_seed(3)];
        ChannelDecorrelator::default().apply(&mut chans, 48_000.0);
        let [mut l, mut r] = chans;
        assert!(differing_ratio(&mut l, &mut r, 4096) > 0.99);
    }

    #[test]
    fn without_warm_up_channels_match() {
        let mut l = FastGenerator::new();
        let mut r = FastGenerator::new();
        assert_eq!(differing_ratio(&mut l, &mut r, 1024), 0.0);
    }
}
