//! Engine error type.
//!
//! Errors only surface from construction and `prepare`; the block-processing
//! call itself is infallible and falls back to silence instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid sample rate: {0} (must be finite and >= 1 Hz)")]
    InvalidSampleRate(f32),
    #[error("invalid maximum block size: must be at least one frame")]
    InvalidBlockSize,
    #[error("invalid channel count: {0} (must be at least 1)")]
    InvalidChannelCount(usize),
    #[error("invalid warm-up duration: {0} s (must be finite and >= 0)")]
    InvalidWarmUp(f32),
    #[error("unknown noise mode: {0}")]
    UnknownMode(String),
    #[error("normal distribution: {0}")]
    Normal(#[from] rand_distr::NormalError),
    #[error("bernoulli distribution: {0}")]
    Bernoulli(#[from] rand::distributions::BernoulliError),
    #[error("piecewise weights: {0}")]
    Weights(#[from] rand::distributions::WeightedError),
}
