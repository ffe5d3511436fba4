#![cfg_attr(not(feature = "std"), no_std)]
//! noisegen core: no_std-ready per-sample noise generators.
//!
//! Features
//! - `std`       : (default) use the Rust standard library, enables entropy seeding
//! - `no-std`    : build with `#![no_std]` and use `libm` for math
//! - `micromath` : use `micromath` as the math backend instead of `libm`
//!
//! Modules
//! - [`dsp`]   : math backend, dB to linear conversion, sample-rate and denormal guards
//! - [`noise`] : `NoiseSource` trait, uniform / fast-recurrence / interpolated generators
//!
//! Design
//! - No heap allocations, no locks, no global RNG state
//! - Every generator is a plain struct owned by exactly one channel
//! - Friendly to embedded / real-time targets

pub mod dsp;
pub mod noise;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::dsp::{clamp, db_to_lin, kill_denormals, safe_sample_rate};
    pub use crate::noise::{
        FastGenerator, InterpolatedGenerator, NoiseSource, UniformGenerator, DEFAULT_COLOR,
    };
}
