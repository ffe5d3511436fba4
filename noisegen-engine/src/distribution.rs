//! Distribution-shaped white noise and the per-channel selector over them.
//!
//! Each shape owns its own RNG, so switching the selector back and forth
//! resumes every shape where it left off instead of restarting it.

use rand::distributions::{Bernoulli, Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use noisegen_core::noise::{NoiseSource, UniformGenerator};

use crate::error::EngineError;
use crate::mixer;
use crate::mode::DistributionType;

/// Standard deviation of the normal shape; ±3σ spans the full [-1, 1] range.
pub const NORMAL_STD_DEV: f32 = 1.0 / 3.0;

/// Interval edges of the piecewise-constant shape.
pub const PIECEWISE_EDGES: [f32; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];
/// Relative density of each interval.
pub const PIECEWISE_WEIGHTS: [f32; 4] = [1.0, 3.0, 3.0, 1.0];

// Per-shape seed salts so one base seed gives four unrelated streams.
const SALT_UNIFORM: u64 = 0x9E37_79B9_7F4A_7C15;
const SALT_NORMAL: u64 = 0xBF58_476D_1CE4_E5B9;
const SALT_BERNOULLI: u64 = 0x94D0_49BB_1331_11EB;
const SALT_PIECEWISE: u64 = 0xD6E8_FEB8_6659_FD93;

fn rng_for(seed: Option<u64>, salt: u64) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s ^ salt),
        None => SmallRng::from_entropy(),
    }
}

/// Gaussian noise (mean 0, σ = 1/3) clamped to [-1, 1].
#[derive(Clone, Debug)]
pub struct NormalGenerator {
    rng: SmallRng,
    dist: Normal<f32>,
}

impl NormalGenerator {
    pub fn new(seed: Option<u64>) -> Result<Self, EngineError> {
        Ok(Self { rng: rng_for(seed, SALT_NORMAL), dist: Normal::new(0.0, NORMAL_STD_DEV)? })
    }
}

impl NoiseSource for NormalGenerator {
    #[inline]
    fn process(&mut self) -> f32 {
        self.dist.sample(&mut self.rng).clamp(-1.0, 1.0)
    }
}

/// Fair coin mapped to {-1, +1}.
#[derive(Clone, Debug)]
pub struct BernoulliGenerator {
    rng: SmallRng,
    dist: Bernoulli,
}

impl BernoulliGenerator {
    pub fn new(seed: Option<u64>) -> Result<Self, EngineError> {
        Ok(Self { rng: rng_for(seed, SALT_BERNOULLI), dist: Bernoulli::new(0.5)? })
    }
}

impl NoiseSource for BernoulliGenerator {
    #[inline]
    fn process(&mut self) -> f32 {
        if self.dist.sample(&mut self.rng) { 1.0 } else { -1.0 }
    }
}

/// Piecewise-constant density over [`PIECEWISE_EDGES`].
///
/// The weight table is built once here; sampling never allocates.
#[derive(Clone, Debug)]
pub struct PiecewiseGenerator {
    rng: SmallRng,
    index: WeightedIndex<f32>,
}

impl PiecewiseGenerator {
    pub fn new(seed: Option<u64>) -> Result<Self, EngineError> {
        Ok(Self { rng: rng_for(seed, SALT_PIECEWISE), index: WeightedIndex::new(PIECEWISE_WEIGHTS)? })
    }
}

impl NoiseSource for PiecewiseGenerator {
    #[inline]
    fn process(&mut self) -> f32 {
        let i = self.index.sample(&mut self.rng);
        let (lo, hi) = (PIECEWISE_EDGES[i], PIECEWISE_EDGES[i + 1]);
        lo + (hi - lo) * self.rng.gen::<f32>()
    }
}

/// Runtime switch over the four distribution shapes.
///
/// `set_mode` only records the choice; it takes effect on the next
/// `process`/`render` call and never resets any shape's state.
#[derive(Clone, Debug)]
pub struct DistributionSelector {
    active: DistributionType,
    uniform: UniformGenerator,
    normal: NormalGenerator,
    bernoulli: BernoulliGenerator,
    piecewise: PiecewiseGenerator,
}

impl DistributionSelector {
    /// `None` seeds every shape from OS entropy.
    pub fn new(seed: Option<u64>) -> Result<Self, EngineError> {
        let uniform = match seed {
            Some(s) => UniformGenerator::from_seed(s ^ SALT_UNIFORM),
            None => UniformGenerator::from_entropy(),
        };
        Ok(Self {
            active: DistributionType::Uniform,
            uniform,
            normal: NormalGenerator::new(seed)?,
            bernoulli: BernoulliGenerator::new(seed)?,
            piecewise: PiecewiseGenerator::new(seed)?,
        })
    }

    #[inline]
    pub fn set_mode(&mut self, mode: DistributionType) {
        self.active = mode;
    }

    #[inline]
    pub fn mode(&self) -> DistributionType {
        self.active
    }

    /// Block render: the active shape is matched once, not per sample.
    #[inline]
    pub fn render<'a, I>(&mut self, out: I, gain: f32)
    where
        I: IntoIterator<Item = &'a mut f32>,
    {
        match self.active {
            DistributionType::Uniform => mixer::render(&mut self.uniform, out, gain),
            DistributionType::Normal => mixer::render(&mut self.normal, out, gain),
            DistributionType::Bernoulli => mixer::render(&mut self.bernoulli, out, gain),
            DistributionType::Piecewise => mixer::render(&mut self.piecewise, out, gain),
        }
    }

    /// Advance every shape by `steps`, keeping the active selection.
    pub fn advance_all(&mut self, steps: usize) {
        self.uniform.advance(steps);
        self.normal.advance(steps);
        self.bernoulli.advance(steps);
        self.piecewise.advance(steps);
    }
}

impl NoiseSource for DistributionSelector {
    #[inline]
    fn process(&mut self) -> f32 {
        match self.active {
            DistributionType::Uniform => self.uniform.process(),
            DistributionType::Normal => self.normal.process(),
            DistributionType::Bernoulli => self.bernoulli.process(),
            DistributionType::Piecewise => self.piecewise.process(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: Option<u64> = Some(0xC0FFEE);

    #[test]
    fn last_set_mode_wins() {
        let mut a = DistributionSelector::new(SEED).unwrap();
        a.set_mode(DistributionType::Uniform);
        a.set_mode(DistributionType::Bernoulli);
        let x = a.process();

        let mut b = BernoulliGenerator::new(SEED).unwrap();
        assert_eq!(x, b.process());
        assert!(x == 1.0 || x == -1.0);
    }

    #[test]
    fn set_mode_is_idempotent() {
        let mut a = DistributionSelector::new(SEED).unwrap();
        let mut b = DistributionSelector::new(SEED).unwrap();
        a.set_mode(DistributionType::Normal);
        a.set_mode(DistributionType::Normal);
        b.set_mode(DistributionType::Normal);
        for _ in 0..100 {
            assert_eq!(a.process().to_bits(), b.process().to_bits());
        }
    }

    #[test]
    fn switching_resumes_previous_shape() {
        let mut a = DistributionSelector::new(SEED).unwrap();
        let mut b = DistributionSelector::new(SEED).unwrap();

        let u1 = a.process();
        a.set_mode(DistributionType::Piecewise);
        for _ in 0..10 {
            a.process();
        }
        a.set_mode(DistributionType::Uniform);
        let u2 = a.process();

        assert_eq!(u1, b.process());
        assert_eq!(u2, b.process());
    }

    #[test]
    fn shapes_stay_in_range() {
        let mut sel = DistributionSelector::new(SEED).unwrap();
        for mode in [
            DistributionType::Uniform,
            DistributionType::Normal,
            DistributionType::Bernoulli,
            DistributionType::Piecewise,
        ] {
            sel.set_mode(mode);
            for _ in 0..20_000 {
                let y = sel.process();
                assert!(y.is_finite() && (-1.0..=1.0).contains(&y), "{:?} y={}", mode, y);
            }
        }
    }

    #[test]
    fn normal_is_centered() {
        let mut g = NormalGenerator::new(SEED).unwrap();
        let n = 50_000;
        let mean: f32 = (0..n).map(|_| g.process()).sum::<f32>() / n as f32;
        assert!(mean.abs() < 0.02, "mean={}", mean);
    }

    #[test]
    fn bernoulli_is_roughly_fair() {
        let mut g = BernoulliGenerator::new(SEED).unwrap();
        let n = 50_000;
        let ups = (0..n).filter(|_| g.process() > 0.0).count();
        let ratio = ups as f32 / n as f32;
        assert!((ratio - 0.5).abs() < 0.02, "ratio={}", ratio);
    }

    #[test]
    fn piecewise_favours_inner_intervals() {
        let mut g = PiecewiseGenerator::new(SEED).unwrap();
        let n = 80_000;
        let inner = (0..n).filter(|_| g.process().abs() < 0.5).count();
        // Expected share is 6/8.
        let ratio = inner as f32 / n as f32;
        assert!((ratio - 0.75).abs() < 0.02, "ratio={}", ratio);
    }

    #[test]
    fn render_matches_process() {
        let mut a = DistributionSelector::new(SEED).unwrap();
        let mut b = DistributionSelector::new(SEED).unwrap();
        a.set_mode(DistributionType::Normal);
        b.set_mode(DistributionType::Normal);
        let mut out = [0.0_f32; 32];
        a.render(out.iter_mut(), 0.5);
        for y in out {
            assert_eq!(y, 0.5 * b.process());
        }
    }
}
