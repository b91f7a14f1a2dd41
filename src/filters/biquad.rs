//! Biquad peaking filter.
//!
//! This module provides normalized biquad coefficients and a Direct Form I
//! filter state. Coefficients follow Robert Bristow-Johnson's Audio EQ
//! Cookbook peaking-EQ formulas.

use std::f32::consts::PI;

use crate::core::flush_denormal;

/// Normalized biquad coefficients (`a0` divided out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32, // Feedforward coefficient for x[n]
    pub b1: f32, // Feedforward coefficient for x[n-1]
    pub b2: f32, // Feedforward coefficient for x[n-2]
    pub a1: f32, // Feedback coefficient for y[n-1]
    pub a2: f32, // Feedback coefficient for y[n-2]
}

impl BiquadCoefficients {
    /// Pass-through coefficients.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Peaking EQ centred on `freq`.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `freq` - Centre frequency in Hz
    /// * `q` - Bandwidth as Q factor
    /// * `gain_db` - Boost (positive) or cut (negative) at the centre, in dB
    pub fn peaking(sample_rate: f64, freq: f32, q: f32, gain_db: f32) -> Self {
        let sample_rate = sample_rate as f32;
        let freq = freq.clamp(1.0, (sample_rate * 0.49).max(1.0));
        let q = q.max(0.001); // Prevent division by zero

        let omega = 2.0 * PI * freq / sample_rate;
        let alpha = omega.sin() / (2.0 * q);
        let cos_omega = omega.cos();
        let a = 10.0f32.powf(gain_db / 40.0);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        // Normalize by a0
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Direct Form I biquad state (two past inputs, two past outputs).
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoefficients,
    x1: f32, // Input at t-1
    x2: f32, // Input at t-2
    y1: f32, // Output at t-1
    y2: f32, // Output at t-2
}

impl Biquad {
    /// Creates a filter with cleared state.
    pub fn new(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Swaps in new coefficients, keeping the state.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Runs one sample through the filter.
    #[inline]
    pub fn process(&mut self, x0: f32) -> f32 {
        let c = &self.coeffs;
        // y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
        let y0 = flush_denormal(
            c.b0 * x0 + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2,
        );

        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;

        y0
    }

    /// Clears the filter memory.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(BiquadCoefficients::IDENTITY)
    }
}
