//! Core per-sample processing trait.
//!
//! Every per-channel stage of the effect (conditioner, envelope follower,
//! reverb, tap delay, DC blocker) consumes one input sample and produces one
//! output sample. This module provides the `Processor` trait that captures
//! that shape.

/// Common interface for single-channel, sample-at-a-time processors.
///
/// The trait provides three operations:
/// - Single sample processing via `process()`
/// - In-place batch processing via `process_buffer()`
/// - Clearing of all internal memory via `reset()`
///
/// Implementors must not allocate, lock or block inside `process()`.
pub trait Processor {
    /// Processes one input sample and returns one output sample.
    ///
    /// # Arguments
    ///
    /// * `input` - The incoming sample, typically between -1.0 and 1.0
    fn process(&mut self, input: f32) -> f32;

    /// Clears all filter and delay memory without touching configuration.
    fn reset(&mut self);

    /// Processes a buffer in place.
    ///
    /// Default implementation calls `process()` for each element.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Samples to transform in place
    fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Halver;

    impl Processor for Halver {
        fn process(&mut self, input: f32) -> f32 {
            input * 0.5
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn test_default_process_buffer_maps_every_sample() {
        let mut halver = Halver;
        let mut buffer = [1.0, -0.5, 0.25, 0.0];
        halver.process_buffer(&mut buffer);
        assert_eq!(buffer, [0.5, -0.25, 0.125, 0.0]);
    }
}
