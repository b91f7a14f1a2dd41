//! Per-sample one-pole smoothing of all 18 parameters.
//!
//! Raw targets arrive once per block. Advancing the smoother once per sample
//! with the same targets turns those block-granular steps into continuous
//! exponential glides, so automation never produces zipper noise.

use super::set::{PARAM_COUNT, ParamId, ParameterSet};
use crate::core::flush_denormal;

/// Smoothing time constant in seconds.
const TIME_CONSTANT: f32 = 0.01;

/// One-pole exponential smoother over the full parameter set.
///
/// # Examples
///
/// ```
/// use abyssverb::{ParameterSet, ParameterSmoother, ParamId};
///
/// let mut smoother = ParameterSmoother::new(44100.0);
/// let targets = ParameterSet::default().with(ParamId::MasterMix, 1.0).to_array();
/// for _ in 0..4410 {
///     smoother.advance(&targets);
/// }
/// assert!((smoother.values().master_mix - 1.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct ParameterSmoother {
    values: [f32; PARAM_COUNT],
    coeff: f32,
}

impl ParameterSmoother {
    /// Creates a smoother starting at the default parameter values.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(sample_rate: f64) -> Self {
        let mut smoother = Self {
            values: ParameterSet::default().to_array(),
            coeff: 0.0,
        };
        smoother.configure(sample_rate);
        smoother
    }

    /// Recomputes the pole for a ~10ms time constant at `sample_rate`.
    pub fn configure(&mut self, sample_rate: f64) {
        self.coeff = (-1.0 / (sample_rate as f32 * TIME_CONSTANT)).exp();
    }

    /// Moves every value one sample closer to its target.
    pub fn advance(&mut self, targets: &[f32; PARAM_COUNT]) {
        for (value, target) in self.values.iter_mut().zip(targets) {
            // Lands exactly on the target once the remaining distance is negligible
            *value = target - flush_denormal(target - *value) * self.coeff;
        }
    }

    /// Current smoothed value of one parameter.
    #[inline]
    pub fn value(&self, id: ParamId) -> f32 {
        self.values[id.index()]
    }

    /// Current smoothed values as a named set.
    pub fn values(&self) -> ParameterSet {
        ParameterSet::from_array(&self.values)
    }

    /// Jumps straight to `set` without gliding.
    pub fn reset_to(&mut self, set: &ParameterSet) {
        self.values = set.to_array();
    }

    /// The one-pole feedback coefficient `c`.
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_matches_ten_ms() {
        let smoother = ParameterSmoother::new(44100.0);
        let expected = (-1.0f32 / 441.0).exp();
        assert!((smoother.coefficient() - expected).abs() < 1e-7);
    }

    #[test]
    fn test_converges_within_bound_without_overshoot() {
        let rate = 44100.0;
        let mut smoother = ParameterSmoother::new(rate);
        smoother.reset_to(&ParameterSet::default().with(ParamId::MasterMix, 0.0));

        let targets = ParameterSet::default()
            .with(ParamId::MasterMix, 1.0)
            .to_array();
        let bound = (100.0f64.ln() * 0.01 * rate).ceil() as usize;

        let mut previous = smoother.value(ParamId::MasterMix);
        for _ in 0..bound {
            smoother.advance(&targets);
            let current = smoother.value(ParamId::MasterMix);
            assert!(current >= previous, "not monotonic: {previous} -> {current}");
            assert!(current <= 1.0, "overshoot: {current}");
            previous = current;
        }

        // 1% plus single-precision slack
        let error = 1.0 - previous;
        assert!(error < 0.0101, "still {error:.5} away after {bound} samples");
    }

    #[test]
    fn test_downward_step_never_undershoots() {
        let mut smoother = ParameterSmoother::new(48000.0);
        let targets = ParameterSet::default()
            .with(ParamId::ReverbDecay, 0.5)
            .to_array();
        for _ in 0..48000 {
            smoother.advance(&targets);
            assert!(smoother.value(ParamId::ReverbDecay) >= 0.5);
        }
        assert!((smoother.value(ParamId::ReverbDecay) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_starts_at_defaults() {
        let smoother = ParameterSmoother::new(44100.0);
        assert_eq!(smoother.values(), ParameterSet::default());
    }

    #[test]
    fn test_held_targets_leave_values_untouched() {
        let mut smoother = ParameterSmoother::new(44100.0);
        let targets = ParameterSet::default().to_array();
        smoother.advance(&targets);
        assert_eq!(smoother.values(), ParameterSet::default());
    }

    #[test]
    fn test_lands_exactly_on_target() {
        let mut smoother = ParameterSmoother::new(44100.0);
        let targets = ParameterSet::default()
            .with(ParamId::MasterMix, 0.0)
            .with(ParamId::DelayMix, 1.0)
            .to_array();
        for _ in 0..44100 {
            smoother.advance(&targets);
        }
        assert_eq!(smoother.value(ParamId::MasterMix), 0.0);
        assert_eq!(smoother.value(ParamId::DelayMix), 1.0);
    }

}
