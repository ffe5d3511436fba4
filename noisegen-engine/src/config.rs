//! Engine configuration.

use crate::error::EngineError;
use crate::mode::{AlgorithmMode, ModeFlag};

/// Loudness-matching trims per mode, in [`ModeFlag`] order.
///
/// Distribution shapes differ a lot in RMS at the same peak, so each mode is
/// pulled down to roughly the same perceived level.
pub const CALIBRATED_TRIMS_DB: [f32; ModeFlag::COUNT] = [
    -42.0, // uniform
    -42.0, // fast recurrence
    -42.0, // interpolated
    -43.0, // normal
    -47.0, // bernoulli
    -31.0, // piecewise
];

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Output channel count; one generator bank per channel.
    pub channels: usize,
    /// Base seed for the RNG-backed generators. `None` draws from OS entropy at `prepare`.
    pub seed: Option<u64>,
    /// Added to the gain parameter before dB → linear conversion.
    pub level_trim_db: [f32; ModeFlag::COUNT],
    /// Length of the decorrelation warm-up applied to channels after the first.
    pub warm_up_seconds: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            seed: None,
            level_trim_db: [0.0; ModeFlag::COUNT],
            warm_up_seconds: 1.0,
        }
    }
}

impl EngineConfig {
    /// Default config with [`CALIBRATED_TRIMS_DB`].
    pub fn calibrated() -> Self {
        Self { level_trim_db: CALIBRATED_TRIMS_DB, ..Self::default() }
    }

    #[must_use]
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn trim_db(&self, mode: AlgorithmMode) -> f32 {
        self.level_trim_db[ModeFlag::from(mode).index()]
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.channels == 0 {
            return Err(EngineError::InvalidChannelCount(self.channels));
        }
        if !self.warm_up_seconds.is_finite() || self.warm_up_seconds < 0.0 {
            return Err(EngineError::InvalidWarmUp(self.warm_up_seconds));
        }
        Ok(())
    }
}
