//! Error type for the edges of the engine.
//!
//! The per-sample DSP path is infallible. Errors only arise when configuring
//! the engine, when a host hands over malformed buffers, or when rendering
//! files offline.

use thiserror::Error;

/// Errors reported by engine configuration, block processing and rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// The sample rate was zero, negative or not finite.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// The maximum block size was zero.
    #[error("invalid block size: {0}")]
    InvalidBlockSize(usize),

    /// Left and right channel buffers differ in length.
    #[error("channel length mismatch: left has {left} samples, right has {right}")]
    ChannelLengthMismatch { left: usize, right: usize },

    /// The input file has a channel layout the renderer cannot handle.
    #[cfg(feature = "wav")]
    #[error("unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannelCount(u16),

    /// Reading or writing a WAV file failed.
    #[cfg(feature = "wav")]
    #[error("wav i/o failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
