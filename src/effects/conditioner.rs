//! Piezo pickup correction for violin.
//!
//! A bridge piezo over-reports low-frequency rumble and under-reports the
//! body resonance. The conditioner removes a controllable share of the
//! low end, blends in a peaking boost around the main body mode and tilts
//! the level up with brightness.

use std::f32::consts::PI;

use crate::core::{Processor, flush_denormal};
use crate::filters::{Biquad, BiquadCoefficients};

/// Corner of the rumble-removal stage.
const RUMBLE_CORNER_HZ: f32 = 80.0;
/// Body resonance peak.
const BODY_FREQ_HZ: f32 = 300.0;
const BODY_Q: f32 = 2.0;
const BODY_GAIN_DB: f32 = 6.0;
/// Guard against the resonance filter running away under automation.
const BODY_LIMIT: f32 = 10.0;

/// Per-channel piezo correction stage.
///
/// # Examples
///
/// ```
/// use abyssverb::{InputConditioner, Processor};
///
/// let mut conditioner = InputConditioner::new(44100.0);
/// conditioner.set_parameters(0.5, 0.5, 0.5);
/// let out = conditioner.process(0.9);
/// assert!(out.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct InputConditioner {
    hp_coeff: f32,
    lf_state: f32,
    body: Biquad,

    piezo_correct: f32,
    body_resonance: f32,
    brightness: f32,
}

impl InputConditioner {
    /// Creates a conditioner prepared for `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let mut conditioner = Self {
            hp_coeff: 0.0,
            lf_state: 0.0,
            body: Biquad::default(),
            piezo_correct: 1.0,
            body_resonance: 0.5,
            brightness: 0.5,
        };
        conditioner.prepare(sample_rate);
        conditioner
    }

    /// Recomputes filter coefficients for `sample_rate` and clears state.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.hp_coeff = (-2.0 * PI * RUMBLE_CORNER_HZ / sample_rate as f32).exp();
        self.body.set_coefficients(BiquadCoefficients::peaking(
            sample_rate,
            BODY_FREQ_HZ,
            BODY_Q,
            BODY_GAIN_DB,
        ));
        self.reset();
    }

    /// Updates the three controls, each in [0, 1].
    pub fn set_parameters(&mut self, piezo_correct: f32, body_resonance: f32, brightness: f32) {
        self.piezo_correct = piezo_correct;
        self.body_resonance = body_resonance;
        self.brightness = brightness;
    }
}

impl Processor for InputConditioner {
    fn process(&mut self, input: f32) -> f32 {
        // Track the low band and subtract a share of it
        self.lf_state =
            flush_denormal(input * (1.0 - self.hp_coeff) + self.lf_state * self.hp_coeff);
        let corrected = input - self.lf_state * self.piezo_correct;

        let body = self.body.process(corrected).clamp(-BODY_LIMIT, BODY_LIMIT);

        let body_mix = self.body_resonance * 0.5;
        let with_body = corrected * (1.0 - body_mix) + body * body_mix;

        let bright = with_body * (1.0 + self.brightness * 0.3);

        bright.clamp(-1.0, 1.0)
    }

    fn reset(&mut self) {
        self.lf_state = 0.0;
        self.body.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_output_bounded_for_any_in_range_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut conditioner = InputConditioner::new(44100.0);
        for n in 0..20000 {
            if n % 500 == 0 {
                conditioner.set_parameters(rng.r#gen(), rng.r#gen(), rng.r#gen());
            }
            let x: f32 = rng.gen_range(-1.0..=1.0);
            let y = conditioner.process(x);
            assert!((-1.0..=1.0).contains(&y), "out of bounds: {y}");
        }
    }

    #[test]
    fn test_full_correction_removes_dc() {
        let mut conditioner = InputConditioner::new(44100.0);
        conditioner.set_parameters(1.0, 0.0, 0.0);
        let mut buffer = vec![0.5; 44100];
        conditioner.process_buffer(&mut buffer);
        assert!(buffer[44099].abs() < 1e-3, "dc residual {}", buffer[44099]);
    }

    #[test]
    fn test_no_correction_keeps_dc() {
        let mut conditioner = InputConditioner::new(44100.0);
        conditioner.set_parameters(0.0, 0.0, 0.0);
        let mut buffer = vec![0.5; 4410];
        conditioner.process_buffer(&mut buffer);
        assert!((buffer[4409] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_brightness_gain() {
        let mut dull = InputConditioner::new(44100.0);
        let mut bright = InputConditioner::new(44100.0);
        dull.set_parameters(0.0, 0.0, 0.0);
        bright.set_parameters(0.0, 0.0, 1.0);
        let a = dull.process(0.5);
        let b = bright.process(0.5);
        assert!((b - a * 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_hard_clip() {
        let mut conditioner = InputConditioner::new(44100.0);
        conditioner.set_parameters(0.0, 0.0, 1.0);
        assert_eq!(conditioner.process(0.95), 1.0);
        assert_eq!(conditioner.process(-0.95), -1.0);
    }

    #[test]
    fn test_silence_after_signal_settles_at_zero() {
        let mut conditioner = InputConditioner::new(44100.0);
        conditioner.process(0.9);
        for _ in 0..44100 {
            assert!(!conditioner.process(0.0).is_subnormal());
        }
        assert_eq!(conditioner.lf_state, 0.0);
        assert_eq!(conditioner.process(0.0), 0.0);
    }

    #[test]
    fn test_reset_restores_initial_response() {
        let mut conditioner = InputConditioner::new(48000.0);
        let first = conditioner.process(0.3);
        conditioner.process(-0.7);
        conditioner.reset();
        assert_eq!(conditioner.process(0.3), first);
    }
}
