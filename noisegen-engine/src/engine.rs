//! Stream lifecycle and block processing.
//!
//! [`NoiseEngine`] owns one [`ChannelVoices`] bank per output channel and a
//! shared handle to the lock-free [`ControlParams`]. The host calls
//! `prepare(sample_rate, max_block)` when the stream starts, then
//! `process_block`/`process_interleaved` once per callback, and `release`
//! when streaming stops.
//!
//! Design goals
//! - All allocation happens in `prepare`; the block path is allocation-, lock- and I/O-free
//! - Parameters are snapshotted once per block, never re-read per sample
//! - Invalid state (not prepared, unknown channel, no mode) renders silence instead of failing

use std::sync::Arc;

use noisegen_core::dsp::MIN_SAMPLE_RATE;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::decorrelate::ChannelDecorrelator;
use crate::error::EngineError;
use crate::mixer::{self, PerSampleMixer};
use crate::params::ControlParams;
use crate::voices::ChannelVoices;

pub struct NoiseEngine {
    config: EngineConfig,
    params: Arc<ControlParams>,
    voices: Vec<ChannelVoices>,
    sr: f32,
    max_block: usize,
    running: bool,
}

impl core::fmt::Debug for NoiseEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NoiseEngine")
            .field("channels", &self.config.channels)
            .field("sr", &self.sr)
            .field("max_block", &self.max_block)
            .field("running", &self.running)
            .finish()
    }
}

impl NoiseEngine {
    /// Engine with its own parameter block.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_params(config, Arc::new(ControlParams::new()))
    }

    /// Engine reading from an externally owned parameter block.
    pub fn with_params(config: EngineConfig, params: Arc<ControlParams>) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            params,
            voices: Vec::new(),
            sr: 0.0,
            max_block: 0,
            running: false,
        })
    }

    /// Start a stream: build fresh generators for every channel and run the
    /// decorrelation warm-up. Call off the audio thread.
    pub fn prepare(&mut self, sample_rate: f32, max_block: usize) -> Result<(), EngineError> {
        if !sample_rate.is_finite() || sample_rate < MIN_SAMPLE_RATE {
            return Err(EngineError::InvalidSampleRate(sample_rate));
        }
        if max_block == 0 {
            return Err(EngineError::InvalidBlockSize);
        }

        let mut voices = Vec::with_capacity(self.config.channels);
        for _ in 0..self.config.channels {
            voices.push(ChannelVoices::new(sample_rate, self.config.seed)?);
        }

        let color = self.params.color();
        for v in &mut voices {
            v.set_color(color);
        }

        let steps = ChannelDecorrelator::new(self.config.warm_up_seconds).apply(&mut voices, sample_rate);

        self.voices = voices;
        self.sr = sample_rate;
        self.max_block = max_block;
        self.running = true;

        info!(
            sample_rate,
            max_block,
            channels = self.config.channels,
            warm_up_steps = steps,
            "noise engine prepared"
        );
        Ok(())
    }

    /// Stop the stream. Generator state is dropped at the next `prepare`;
    /// until then every block renders silence.
    pub fn release(&mut self) {
        if self.running {
            debug!("noise engine released");
        }
        self.running = false;
    }

    /// Fill planar channel buffers in place.
    ///
    /// At most `frames` samples are written per channel, never past a slice's
    /// end. Channels beyond the configured count are zeroed. `frames` may exceed
    /// the prepared maximum block size; that value only sizes host buffers.
    pub fn process_block(&mut self, buffer: &mut [&mut [f32]], frames: usize) {
        let mixer = PerSampleMixer::for_block(&self.params.snapshot(), &self.config);

        for (ch, out) in buffer.iter_mut().enumerate() {
            let n = frames.min(out.len());
            let out = &mut out[..n];
            match self.voices.get_mut(ch) {
                Some(voices) if self.running => mixer.run(voices, out.iter_mut()),
                _ => mixer::silence(out.iter_mut()),
            }
        }
    }

    /// Fill an interleaved buffer of `channels` channels in place. A trailing
    /// partial frame is left untouched.
    pub fn process_interleaved(&mut self, out: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        let used = out.len() - out.len() % channels;
        let out = &mut out[..used];
        let mixer = PerSampleMixer::for_block(&self.params.snapshot(), &self.config);

        for ch in 0..channels {
            let lane = out.iter_mut().skip(ch).step_by(channels);
            match self.voices.get_mut(ch) {
                Some(voices) if self.running => mixer.run(voices, lane),
                _ => mixer::silence(lane),
            }
        }
    }

    /// Shared handle for the host/UI side to publish parameter changes.
    #[inline] pub fn params(&self) -> Arc<ControlParams> { Arc::clone(&self.params) }
    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }
    #[inline] pub fn max_block_size(&self) -> usize { self.max_block }
    #[inline] pub fn channels(&self) -> usize { self.config.channels }
    #[inline] pub fn is_running(&self) -> bool { self.running }
}
