//! Bow envelope follower.

use crate::core::{Processor, flush_denormal};

/// Attack time constant in seconds.
const ATTACK_TIME: f32 = 0.001;
/// Release time constant in seconds.
const RELEASE_TIME: f32 = 0.1;

/// Tracks the amplitude of the bowed signal with a fast attack and slow release.
///
/// The returned level is scaled by the bow sensitivity:
/// `envelope * (0.5 + sensitivity * 0.5)`.
///
/// # Examples
///
/// ```
/// use abyssverb::{EnvelopeFollower, Processor};
///
/// let mut follower = EnvelopeFollower::new(44100.0);
/// follower.set_sensitivity(1.0);
/// for _ in 0..441 {
///     follower.process(0.8);
/// }
/// assert!((follower.current() - 0.8).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    attack_coeff: f32,
    release_coeff: f32,
    envelope: f32,
    sensitivity: f32,
}

impl EnvelopeFollower {
    /// Creates a follower prepared for `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let mut follower = Self {
            attack_coeff: 0.0,
            release_coeff: 0.0,
            envelope: 0.0,
            sensitivity: 0.5,
        };
        follower.prepare(sample_rate);
        follower
    }

    /// Recomputes the attack and release poles and clears the envelope.
    pub fn prepare(&mut self, sample_rate: f64) {
        let sample_rate = sample_rate as f32;
        self.attack_coeff = (-1.0 / (sample_rate * ATTACK_TIME)).exp();
        self.release_coeff = (-1.0 / (sample_rate * RELEASE_TIME)).exp();
        self.envelope = 0.0;
    }

    /// Sets the bow sensitivity in [0, 1].
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    /// Raw envelope level, before sensitivity scaling.
    pub fn current(&self) -> f32 {
        self.envelope
    }
}

impl Processor for EnvelopeFollower {
    fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = flush_denormal(level + (self.envelope - level) * coeff);

        self.envelope * (0.5 + self.sensitivity * 0.5)
    }

    fn reset(&mut self) {
        self.envelope = 0.0;
    }
}
