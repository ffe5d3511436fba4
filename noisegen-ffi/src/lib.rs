//! C ABI wrapper for the noisegen engine.
//!
//! Exposes a small set of functions to create/destroy an engine, (re)start a
//! stream, render interleaved f32 samples, and publish control parameters.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `NoisegenEngine` (heap-allocated; you own/delete it).
//! - Mode ids follow the flag order: 0 uniform, 1 fast, 2 interpolated,
//!   3 normal, 4 bernoulli, 5 piecewise.
//!
//! Threading
//! - Create, prepare and release allocate and may log; call them off the
//!   real-time thread. Only render runs on the audio thread.
//! - The parameter setters only touch atomics and may be called from any thread.

use std::sync::Arc;

use noisegen_engine::{ControlParams, EngineConfig, ModeFlag, NoiseEngine};

/// Block size assumed by `noisegen_create*` until the host calls `noisegen_prepare`.
pub const NOISEGEN_DEFAULT_MAX_BLOCK: u32 = 4096;

/// Opaque engine wrapper we hand to C.
pub struct NoisegenEngine {
    params: Arc<ControlParams>,
    inner: NoiseEngine,
}

impl NoisegenEngine {
    fn new(sample_rate: f32, channels: u32, seed: Option<u64>) -> Option<Self> {
        let mut config = EngineConfig::default().with_channels(channels as usize);
        config.seed = seed;
        let mut inner = NoiseEngine::new(config).ok()?;
        inner.prepare(sample_rate, NOISEGEN_DEFAULT_MAX_BLOCK as usize).ok()?;
        Some(Self { params: inner.params(), inner })
    }
}

fn into_handle(engine: Option<NoisegenEngine>) -> *mut NoisegenEngine {
    match engine {
        Some(e) => Box::into_raw(Box::new(e)),
        None => std::ptr::null_mut(),
    }
}

// --- Creation / destruction -------------------------------------------------------

/// Create a prepared engine seeded from OS entropy.
/// Returns null if `sample_rate` or `channels` is invalid.
#[no_mangle]
pub extern "C" fn noisegen_create(sample_rate: f32, channels: u32) -> *mut NoisegenEngine {
    into_handle(NoisegenEngine::new(sample_rate, channels, None))
}

/// Create a prepared engine with a fixed seed (repeatable output).
#[no_mangle]
pub extern "C" fn noisegen_create_seeded(sample_rate: f32, channels: u32, seed: u64) -> *mut NoisegenEngine {
    into_handle(NoisegenEngine::new(sample_rate, channels, Some(seed)))
}

/// Destroy an engine previously returned by `noisegen_create*`.
#[no_mangle]
pub extern "C" fn noisegen_destroy(engine: *mut NoisegenEngine) {
    if !engine.is_null() {
        unsafe { drop(Box::from_raw(engine)); }
    }
}

// --- Stream lifecycle ------------------------------------------------------------

/// Restart the stream at a new sample rate / block size. Generators restart
/// fresh and channels are decorrelated again. Returns false on invalid input.
#[no_mangle]
pub extern "C" fn noisegen_prepare(engine: *mut NoisegenEngine, sample_rate: f32, max_block: u32) -> bool {
    if engine.is_null() { return false; }
    let e = unsafe { &mut *engine };
    e.inner.prepare(sample_rate, max_block as usize).is_ok()
}

/// Stop the stream; renders are silent until the next `noisegen_prepare`.
#[no_mangle]
pub extern "C" fn noisegen_release(engine: *mut NoisegenEngine) {
    if engine.is_null() { return; }
    let e = unsafe { &mut *engine };
    e.inner.release();
}

// --- Rendering -------------------------------------------------------------------

/// Render `frames` of audio into an interleaved f32 buffer with `channels` channels.
/// Channels beyond the engine's channel count are written as silence.
///
/// Returns the number of frames rendered (0 on error).
#[no_mangle]
pub extern "C" fn noisegen_render_interleaved_f32(
    engine: *mut NoisegenEngine,
    out_interleaved: *mut f32,
    frames: u32,
    channels: u32,
) -> u32 {
    if engine.is_null() || out_interleaved.is_null() || frames == 0 || channels == 0 {
        return 0;
    }
    let e = unsafe { &mut *engine };
    let out = unsafe { std::slice::from_raw_parts_mut(out_interleaved, (frames as usize) * (channels as usize)) };
    e.inner.process_interleaved(out, channels as usize);
    frames
}

// --- Parameters ------------------------------------------------------------------

/// Output gain in dB, clamped to [-24, 24]; non-finite values reset to 0 dB.
#[no_mangle]
pub extern "C" fn noisegen_set_gain_db(engine: *mut NoisegenEngine, gain_db: f32) {
    if engine.is_null() { return; }
    let e = unsafe { &*engine };
    e.params.set_gain_db(gain_db);
}

/// Interpolation color in [0, 1] (higher = brighter).
#[no_mangle]
pub extern "C" fn noisegen_set_color(engine: *mut NoisegenEngine, color: f32) {
    if engine.is_null() { return; }
    let e = unsafe { &*engine };
    e.params.set_color(color);
}

/// Make `mode` the only active mode. Returns false for an unknown id.
#[no_mangle]
pub extern "C" fn noisegen_select_mode(engine: *mut NoisegenEngine, mode: u32) -> bool {
    if engine.is_null() { return false; }
    let Some(flag) = ModeFlag::from_index(mode as usize) else { return false };
    let e = unsafe { &*engine };
    e.params.select_mode(flag);
    true
}

/// Set or clear a single mode flag. With no flag set the engine is silent;
/// with several, the lowest id wins. Returns false for an unknown id.
#[no_mangle]
pub extern "C" fn noisegen_set_mode_flag(engine: *mut NoisegenEngine, mode: u32, on: bool) -> bool {
    if engine.is_null() { return false; }
    let Some(flag) = ModeFlag::from_index(mode as usize) else { return false };
    let e = unsafe { &*engine };
    e.params.set_flag(flag, on);
    true
}
