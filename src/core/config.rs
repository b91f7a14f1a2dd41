//! Engine configuration.

use super::error::{Error, Result};

/// Host stream settings announced before processing starts.
///
/// # Examples
///
/// ```
/// use abyssverb::EngineConfig;
///
/// let config = EngineConfig::default().with_sample_rate(48000.0);
/// assert_eq!(config.sample_rate, 48000.0);
/// assert_eq!(config.max_block_size, 512);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Largest block the host will hand to `process_block`
    pub max_block_size: usize,
}

impl EngineConfig {
    /// Creates a configuration for the given stream settings.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz (e.g., 44100.0)
    /// * `max_block_size` - Maximum samples per processing block
    pub fn new(sample_rate: f64, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
        }
    }

    /// Returns a copy with a different sample rate.
    pub fn with_sample_rate(self, sample_rate: f64) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    /// Returns a copy with a different maximum block size.
    pub fn with_block_size(self, max_block_size: usize) -> Self {
        Self {
            max_block_size,
            ..self
        }
    }

    /// Checks that the sample rate is finite and positive and the block size non-zero.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 {
            return Err(Error::InvalidBlockSize(self.max_block_size));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(44100.0, 512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 44100.0);
        assert_eq!(config.max_block_size, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_sample_rates() {
        for rate in [0.0, -44100.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig::default().with_sample_rate(rate);
            assert!(
                matches!(config.validate(), Err(Error::InvalidSampleRate(_))),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_zero_block_size() {
        let config = EngineConfig::default().with_block_size(0);
        assert!(matches!(config.validate(), Err(Error::InvalidBlockSize(0))));
    }
}
