//! Generic DSP utilities and math helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Clean, side-effect free helpers that are easy to test
//!
//! Conventions:
//! - All functions are `#[inline]` where useful to help the optimizer.
//! - Argument and return domains are documented per function.

#![allow(clippy::excessive_precision)]

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        use micromath::F32Ext as _;
        #[inline] fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] fn m_fabs(x: f32) -> f32 { x.abs() }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] fn m_exp(x: f32) -> f32 { libm::expf(x) }
        #[inline] fn m_fabs(x: f32) -> f32 { libm::fabsf(x) }
    // std backend
    } else {
        #[inline] fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] fn m_fabs(x: f32) -> f32 { x.abs() }
    }
}

// --------------------------------- Constants -------------------------------------

/// A very small epsilon used in denormal handling and safe divisions.
pub const EPS_SMALL: f32 = 1.0e-20;

/// Lowest sample rate the generators accept. Anything below (including 0 and
/// NaN) is raised to this so per-sample increments never divide by zero.
pub const MIN_SAMPLE_RATE: f32 = 1.0;

// --------------------------------- Utilities -------------------------------------

#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

/// Absolute value through the selected math backend.
#[inline]
pub fn fabs(x: f32) -> f32 {
    m_fabs(x)
}

/// Kill denormal/subnormal values. Returns 0.0 if |x| < EPS_SMALL.
#[inline]
pub fn kill_denormals(x: f32) -> f32 {
    if m_fabs(x) < EPS_SMALL { 0.0 } else { x }
}

/// Sanitize a host-reported sample rate: non-finite or sub-1 Hz values become
/// [`MIN_SAMPLE_RATE`].
#[inline]
pub fn safe_sample_rate(sr: f32) -> f32 {
    if sr.is_finite() && sr >= MIN_SAMPLE_RATE { sr } else { MIN_SAMPLE_RATE }
}

// --------------------------------- dB / linear -----------------------------------

/// Convert dB to linear gain: lin = 10^(db/20).
///
/// Anything at or below -120 dB (and NaN) maps to silence.
#[inline]
pub fn db_to_lin(db: f32) -> f32 {
    if db.is_nan() || db <= -120.0 { 0.0 } else { m_exp(0.11512925464970229_f32 * db) } // ln(10)/20 ≈ 0.115129...
}

// --------------------------------- Tests (std only) ------------------------------
