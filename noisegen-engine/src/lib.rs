//! noisegen engine: mode selection, decorrelation, block mixing and stream lifecycle.
//!
//! Crate layout:
//! - [`mode`]         : `AlgorithmMode`, `DistributionType` and the radio-group `ModeFlags` word
//! - [`params`]       : lock-free `ControlParams` (gain dB, color, mode flags)
//! - [`distribution`] : normal / bernoulli / piecewise shapes and the `DistributionSelector`
//! - [`voices`]       : per-channel generator bank
//! - [`decorrelate`]  : one-second warm-up applied to every channel after the first
//! - [`mixer`]        : `PerSampleMixer`, the per-block render loop
//! - [`config`]       : `EngineConfig` (channels, seed, level trims, warm-up length)
//! - [`engine`]       : `NoiseEngine` with `prepare` / `process_block` / `release`
//!
//! The engine avoids heap allocation, locks and logging on the audio thread.
//! Everything that can fail happens in `prepare`.

pub mod config;
pub mod decorrelate;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod mixer;
pub mod mode;
pub mod params;
pub mod voices;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use config::EngineConfig;
pub use engine::NoiseEngine;
pub use error::EngineError;
pub use mode::{AlgorithmMode, DistributionType, ModeFlag, ModeFlags, Selection};
pub use params::{ControlParams, ParamSnapshot};
