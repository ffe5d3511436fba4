//! Per-block, per-sample render loop.
//!
//! A [`PerSampleMixer`] is built from one [`ParamSnapshot`] at the top of a
//! block: mode and linear gain are fixed for the whole block, so the inner loop
//! is a straight `out = gain * source.process()` over a concrete generator type.

use noisegen_core::dsp::db_to_lin;
use noisegen_core::noise::NoiseSource;

use crate::config::EngineConfig;
use crate::mode::AlgorithmMode;
use crate::params::ParamSnapshot;
use crate::voices::ChannelVoices;

/// Write `gain * source.process()` into every slot of `out`.
#[inline]
pub fn render<'a, S, I>(source: &mut S, out: I, gain: f32)
where
    S: NoiseSource + ?Sized,
    I: IntoIterator<Item = &'a mut f32>,
{
    for y in out {
        *y = gain * source.process();
    }
}

/// Zero every slot of `out`.
#[inline]
pub fn silence<'a, I>(out: I)
where
    I: IntoIterator<Item = &'a mut f32>,
{
    for y in out {
        *y = 0.0;
    }
}

/// Mode and gain resolved for one block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PerSampleMixer {
    mode: Option<AlgorithmMode>,
    gain: f32,
    color: f32,
}

impl PerSampleMixer {
    /// Resolve the active mode (silence when no flag is set) and convert
    /// `gain_db + trim_db[mode]` to linear once.
    #[inline]
    pub fn for_block(snapshot: &ParamSnapshot, config: &EngineConfig) -> Self {
        let mode = snapshot.flags.resolve().mode();
        let gain = match mode {
            Some(m) => db_to_lin(snapshot.gain_db + config.trim_db(m)),
            None => 0.0,
        };
        Self { mode, gain, color: snapshot.color }
    }

    #[inline] pub fn mode(&self) -> Option<AlgorithmMode> { self.mode }
    #[inline] pub fn gain(&self) -> f32 { self.gain }

    /// Fill one channel's output from that channel's generator bank.
    #[inline]
    pub fn run<'a, I>(&self, voices: &mut ChannelVoices, out: I)
    where
        I: IntoIterator<Item = &'a mut f32>,
    {
        voices.set_color(self.color);
        voices.render(self.mode, out, self.gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{ModeFlag, ModeFlags};

    struct Constant(f32);

    impl NoiseSource for Constant {
        fn process(&mut self) -> f32 {
            self.0
        }
    }

    #[test]
    fn unity_gain_passes_source_through() {
        let mut out = [9.0_f32; 64];
        render(&mut Constant(0.5), out.iter_mut(), db_to_lin(0.0));
        assert!(out.iter().all(|&y| y == 0.5));
    }

    #[test]
    fn gain_scales_source() {
        let mut out = [0.0_f32; 16];
        render(&mut Constant(0.5), out.iter_mut(), 0.25);
        assert!(out.iter().all(|&y| y == 0.125));
    }

    #[test]
    fn render_respects_stride() {
        let mut out = [7.0_f32; 8];
        render(&mut Constant(1.0), out.iter_mut().skip(1).step_by(2), 1.0);
        assert_eq!(out, [7.0, 1.0, 7.0, 1.0, 7.0, 1.0, 7.0, 1.0]);
    }

    #[test]
    fn silence_zeroes() {
        let mut out = [0.3_f32; 32];
        silence(out.iter_mut());
        assert!(out.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn block_resolution() {
        let config = EngineConfig::default();
        let snap = ParamSnapshot {
            gain_db: -6.0,
            color: 0.3,
            flags: ModeFlags::only(ModeFlag::FastRecurrence),
        };
        let mixer = PerSampleMixer::for_block(&snap, &config);
        assert_eq!(mixer.mode(), Some(AlgorithmMode::FastRecurrence));
        assert!((mixer.gain() - 0.501_187).abs() < 1e-4);
    }

    #[test]
    fn no_flag_means_zero_gain() {
        let snap = ParamSnapshot { flags: ModeFlags::NONE, ..ParamSnapshot::default() };
        let mixer = PerSampleMixer::for_block(&snap, &EngineConfig::default());
        assert_eq!(mixer.mode(), None);
        assert_eq!(mixer.gain(), 0.0);
    }

    #[test]
    fn trims_apply_per_mode() {
        let config = EngineConfig::calibrated();
        let snap = ParamSnapshot { flags: ModeFlags::only(ModeFlag::Piecewise), ..ParamSnapshot::default() };
        let mixer = PerSampleMixer::for_block(&snap, &config);
        assert!((mixer.gain() - db_to_lin(-31.0)).abs() < 1e-7);
    }
}
