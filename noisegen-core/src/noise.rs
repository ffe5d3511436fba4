//! Per-sample noise generators.
//!
//! Provided generators:
//! - `UniformGenerator`      : white noise in [-1, 1) from an owned, seedable `SmallRng`
//! - `FastGenerator`         : two-word wrapping integer recurrence (no RNG, no branches)
//! - `InterpolatedGenerator` : target-seeking random walk whose speed follows a "color" control
//!
//! Every generator owns its state outright; nothing here touches a global RNG,
//! allocates, or locks, so instances can live on the audio thread as plain
//! struct members (one per channel).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::dsp::{clamp, fabs, kill_denormals, safe_sample_rate};

/// Anything that yields one sample per call.
pub trait NoiseSource {
    /// Produce the next sample.
    fn process(&mut self) -> f32;

    /// Advance the internal state by `steps` samples, discarding the output.
    #[inline]
    fn advance(&mut self, steps: usize) {
        for _ in 0..steps {
            let _ = self.process();
        }
    }
}

// -------------------------------- Uniform ----------------------------------------

/// Uniform white noise in **[-1, 1)**.
#[derive(Clone, Debug)]
pub struct UniformGenerator {
    rng: SmallRng,
}

impl UniformGenerator {
    /// Deterministic generator; the same seed yields the same sequence.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }

    /// Seed from OS entropy. Call at construction time only, never on the audio thread.
    #[cfg(feature = "std")]
    #[inline]
    pub fn from_entropy() -> Self {
        Self { rng: SmallRng::from_entropy() }
    }
}

impl NoiseSource for UniformGenerator {
    #[inline]
    fn process(&mut self) -> f32 {
        // `gen::<f32>()` is in [0, 1) so the result never reaches +1.
        self.rng.gen::<f32>() * 2.0 - 1.0
    }
}

// -------------------------------- Fast recurrence --------------------------------

const FAST_SEED_A: i32 = 0x6745_2301;
const FAST_SEED_B: i32 = 0xefcd_ab89_u32 as i32;

/// Normalizer for the output word: `i32::MAX` as a float.
const FAST_NORM: f32 = 2_147_483_647.0;

/// Cheap pseudo-random recurrence over two signed 32-bit words.
///
/// Each step: `a ^= b`, emit `b / i32::MAX`, `b = b + a` (wrapping). The
/// wraparound is where the scrambling comes from; it is spelled out with
/// `wrapping_add` so debug builds do not trap on it.
///
/// Output lies in [-1, 1] up to float rounding of `i32::MIN / i32::MAX`; it is
/// not clamped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FastGenerator {
    a: i32,
    b: i32,
}

impl Default for FastGenerator {
    #[inline]
    fn default() -> Self {
        Self { a: FAST_SEED_A, b: FAST_SEED_B }
    }
}

impl FastGenerator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit state. `(0, 0)` is a fixed point that emits
    /// silence forever, so it falls back to the default seeds.
    #[inline]
    pub fn with_state(a: i32, b: i32) -> Self {
        if a == 0 && b == 0 { Self::default() } else { Self { a, b } }
    }

    /// Current `(a, b)` words.
    #[inline]
    pub fn state(&self) -> (i32, i32) {
        (self.a, self.b)
    }
}

impl NoiseSource for FastGenerator {
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn process(&mut self) -> f32 {
        self.a ^= self.b;
        let out = self.b as f32 / FAST_NORM;
        self.b = self.b.wrapping_add(self.a);
        out
    }
}

// -------------------------------- Interpolated -----------------------------------

/// Color used by [`InterpolatedGenerator::init`] until the host sets one.
pub const DEFAULT_COLOR: f32 = 0.5;

/// Base speed floor (per second) added regardless of color.
const SPEED_FLOOR: f32 = 100.0;
/// Fraction of the sample rate reachable at color = 1.
const SPEED_SPAN: f32 = 0.49;
/// Jitter scalar as a fraction of the base speed.
const SPEED_JITTER: f32 = 0.8;

/// Smoothly varying noise: a linear walk from the current value toward a
/// random target, re-targeted on arrival.
///
/// The per-sample increment is `(base + jitter * jitter_scalar) * (target - current) / sr`,
/// so the time to reach a target is roughly independent of its distance and
/// shrinks as `color` rises (brighter), stretches as it falls (darker).
#[derive(Copy, Clone, Debug)]
pub struct InterpolatedGenerator {
    sr: f32,
    random: FastGenerator,
    current: f32,
    target: f32,
    speed: f32,
    base_speed: f32,
    jitter_speed: f32,
}

impl InterpolatedGenerator {
    /// Construct and [`init`](Self::init) at `sample_rate`.
    #[inline]
    pub fn new(sample_rate: f32) -> Self {
        Self::with_random(sample_rate, FastGenerator::default())
    }

    #[inline]
    fn with_random(sample_rate: f32, random: FastGenerator) -> Self {
        let mut s = Self {
            sr: safe_sample_rate(sample_rate),
            random,
            current: 0.0,
            target: 0.0,
            speed: 0.0,
            base_speed: 0.0,
            jitter_speed: 0.0,
        };
        s.init(sample_rate);
        s
    }

    /// Store the sample rate, reset speed to [`DEFAULT_COLOR`] and pick the first target.
    #[inline]
    pub fn init(&mut self, sample_rate: f32) {
        self.sr = safe_sample_rate(sample_rate);
        self.set_speed(DEFAULT_COLOR);
        self.set_target();
    }

    /// Map `color` in [0, 1] to base and jitter speeds. Safe to call every block;
    /// the new speed is used from the next target onward.
    #[inline]
    pub fn set_speed(&mut self, color: f32) {
        let color = if color.is_nan() { DEFAULT_COLOR } else { clamp(color, 0.0, 1.0) };
        self.base_speed = SPEED_FLOOR + color * self.sr * SPEED_SPAN;
        self.jitter_speed = self.base_speed * SPEED_JITTER;
    }

    #[inline]
    fn set_target(&mut self) {
        self.target = self.random.process();
        let jitter = self.random.process();
        let speed = self.base_speed + jitter * self.jitter_speed;
        self.speed = kill_denormals(speed * (self.target - self.current) / self.sr);
    }

    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }
    #[inline] pub fn current(&self) -> f32 { self.current }
    #[inline] pub fn target(&self) -> f32 { self.target }
    #[inline] pub fn speed(&self) -> f32 { self.speed }
    #[inline] pub fn base_speed(&self) -> f32 { self.base_speed }
    #[inline] pub fn jitter_speed(&self) -> f32 { self.jitter_speed }
}

impl NoiseSource for InterpolatedGenerator {
    /// Always returns the advanced value, or the target itself on arrival.
    #[inline]
    fn process(&mut self) -> f32 {
        self.current += self.speed;

        // A zero increment would never arrive; treat it as arrival.
        if fabs(self.current) > fabs(self.target) || self.speed == 0.0 {
            self.current = self.target;
            self.set_target();
        }
        self.current
    }
}

// --------------------------------- Tests -----------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_sequence_is_fixed() {
        let mut g = FastGenerator::new();
        let expected = [
            (-2_004_318_072, 2_018_915_345),
            (-253_838_183, 1_765_077_162),
            (-1_712_698_317, 52_378_845),
        ];
        for (a, b) in expected {
            g.process();
            assert_eq!(g.state(), (a, b));
        }
    }

    #[test]
    fn fast_first_output_is_seed_b_normalized() {
        let mut g = FastGenerator::new();
        let y = g.process();
        assert!((y - (-0.126_535_95)).abs() < 1e-6, "y={}", y);
    }

    #[test]
    fn fast_is_reproducible() {
        let mut x = FastGenerator::with_state(12345, -98765);
        let mut y = FastGenerator::with_state(12345, -98765);
        for _ in 0..100_000 {
            assert_eq!(x.process().to_bits(), y.process().to_bits());
        }
    }

    #[test]
    fn fast_wraps_instead_of_overflowing() {
        // b + a overflows on the first step.
        let mut g = FastGenerator::with_state(0, i32::MAX);
        g.process();
        assert_eq!(g.state(), (i32::MAX, i32::MAX.wrapping_add(i32::MAX)));
    }

    #[test]
    fn fast_zero_state_falls_back() {
        assert_eq!(FastGenerator::with_state(0, 0), FastGenerator::default());
    }

    #[test]
    fn fast_stays_in_unit_range() {
        let mut g = FastGenerator::new();
        for _ in 0..100_000 {
            let y = g.process();
            assert!((-1.0..=1.0).contains(&y), "y={}", y);
        }
    }

    #[test]
    fn uniform_in_half_open_range() {
        let mut g = UniformGenerator::from_seed(7);
        for _ in 0..100_000 {
            let y = g.process();
            assert!((-1.0..1.0).contains(&y), "y={}", y);
        }
    }

    #[test]
    fn uniform_seed_determinism() {
        let mut x = UniformGenerator::from_seed(99);
        let mut y = UniformGenerator::from_seed(99);
        for _ in 0..1000 {
            assert_eq!(x.process().to_bits(), y.process().to_bits());
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn uniform_entropy_seeded_is_in_range() {
        let mut g = UniformGenerator::from_entropy();
        for _ in 0..1000 {
            assert!((-1.0..1.0).contains(&g.process()));
        }
    }

    #[test]
    fn interpolated_is_finite_and_bounded() {
        for color in [0.0, 0.3, 0.5, 1.0] {
            let mut g = InterpolatedGenerator::new(48_000.0);
            g.set_speed(color);
            for _ in 0..200_000 {
                let y = g.process();
                assert!(y.is_finite());
                assert!(y.abs() <= 1.0, "color={} y={}", color, y);
            }
        }
    }

    #[test]
    fn interpolated_speed_mapping() {
        let mut g = InterpolatedGenerator::new(48_000.0);
        assert!((g.base_speed() - (100.0 + 0.5 * 48_000.0 * 0.49)).abs() < 1e-2);
        g.set_speed(1.0);
        assert!((g.base_speed() - (100.0 + 48_000.0 * 0.49)).abs() < 1e-2);
        assert!((g.jitter_speed() - 0.8 * g.base_speed()).abs() < 1e-2);
        g.set_speed(0.0);
        assert_eq!(g.base_speed(), 100.0);
        g.set_speed(7.0);
        assert!((g.base_speed() - (100.0 + 48_000.0 * 0.49)).abs() < 1e-2);
    }

    #[test]
    fn interpolated_reaches_target_and_retargets() {
        let mut g = InterpolatedGenerator::new(48_000.0);
        let first = g.target();
        let mut hit = false;
        for _ in 0..48_000 {
            if g.process() == first {
                hit = true;
                break;
            }
        }
        assert!(hit, "never arrived at {}", first);
        assert_ne!(g.target(), first);
    }

    #[test]
    fn interpolated_moves_toward_target() {
        // Starts at 0.0, so the distance to the first target is |target|.
        let mut g = InterpolatedGenerator::new(48_000.0);
        let t = g.target();
        let y = g.process();
        assert!((t - y).abs() < t.abs(), "t={} y={}", t, y);
    }

    #[test]
    fn interpolated_zero_sample_rate_is_guarded() {
        let mut g = InterpolatedGenerator::new(0.0);
        assert_eq!(g.sample_rate(), crate::dsp::MIN_SAMPLE_RATE);
        for _ in 0..1000 {
            assert!(g.process().is_finite());
        }
    }

    #[test]
    fn advance_discards_exactly_n() {
        let mut x = FastGenerator::new();
        let mut y = FastGenerator::new();
        x.advance(48_000);
        for _ in 0..48_000 {
            y.process();
        }
        assert_eq!(x, y);
    }
}
