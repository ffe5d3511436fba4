//! Lock-free control parameters shared between the host/UI side and the audio thread.
//!
//! Each value is one machine word: `f32`s are stored as their bit patterns in an
//! `AtomicU32`, the mode selection as a [`ModeFlags`] bitmask. All accesses are
//! `Relaxed`; the audio thread only needs the most recently published value,
//! not ordering between the three.

use std::sync::atomic::{AtomicU32, Ordering};

use noisegen_core::dsp::clamp;
use noisegen_core::noise::DEFAULT_COLOR;

use crate::mode::{ModeFlag, ModeFlags};

pub const GAIN_DB_MIN: f32 = -24.0;
pub const GAIN_DB_MAX: f32 = 24.0;
pub const DEFAULT_GAIN_DB: f32 = 0.0;

/// Values read once at the top of a block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParamSnapshot {
    pub gain_db: f32,
    pub color: f32,
    pub flags: ModeFlags,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            gain_db: DEFAULT_GAIN_DB,
            color: DEFAULT_COLOR,
            flags: ModeFlags::only(ModeFlag::Uniform),
        }
    }
}

#[derive(Debug)]
pub struct ControlParams {
    gain_db: AtomicU32,
    color: AtomicU32,
    flags: AtomicU32,
}

impl Default for ControlParams {
    fn default() -> Self {
        let d = ParamSnapshot::default();
        Self {
            gain_db: AtomicU32::new(d.gain_db.to_bits()),
            color: AtomicU32::new(d.color.to_bits()),
            flags: AtomicU32::new(d.flags.bits()),
        }
    }
}

#[inline]
fn sanitize_gain_db(db: f32) -> f32 {
    if db.is_finite() { clamp(db, GAIN_DB_MIN, GAIN_DB_MAX) } else { DEFAULT_GAIN_DB }
}

#[inline]
fn sanitize_color(c: f32) -> f32 {
    if c.is_finite() { clamp(c, 0.0, 1.0) } else { DEFAULT_COLOR }
}

impl ControlParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output gain in dB, clamped to [-24, 24]. Non-finite input resets to 0 dB.
    #[inline]
    pub fn set_gain_db(&self, db: f32) {
        self.gain_db.store(sanitize_gain_db(db).to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn gain_db(&self) -> f32 {
        sanitize_gain_db(f32::from_bits(self.gain_db.load(Ordering::Relaxed)))
    }

    /// Interpolation color in [0, 1]. Non-finite input resets to the default.
    #[inline]
    pub fn set_color(&self, color: f32) {
        self.color.store(sanitize_color(color).to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn color(&self) -> f32 {
        sanitize_color(f32::from_bits(self.color.load(Ordering::Relaxed)))
    }

    /// Radio-button select: `flag` becomes the only asserted flag.
    #[inline]
    pub fn select_mode(&self, flag: ModeFlag) {
        self.flags.store(ModeFlags::only(flag).bits(), Ordering::Relaxed);
    }

    /// Toggle a single flag without touching the others.
    #[inline]
    pub fn set_flag(&self, flag: ModeFlag, on: bool) {
        if on {
            self.flags.fetch_or(flag.bit(), Ordering::Relaxed);
        } else {
            self.flags.fetch_and(!flag.bit(), Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn set_flags(&self, flags: ModeFlags) {
        self.flags.store(flags.bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn flags(&self) -> ModeFlags {
        ModeFlags::from_bits(self.flags.load(Ordering::Relaxed))
    }

    /// One load per value; call once per block.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            gain_db: self.gain_db(),
            color: self.color(),
            flags: self.flags(),
        }
    }
}
