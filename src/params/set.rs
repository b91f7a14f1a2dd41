//! The 18 effect parameters, their fixed external order, ranges and defaults.

use std::ops::RangeInclusive;

/// Number of effect parameters.
pub const PARAM_COUNT: usize = 18;

/// Identifies one parameter by its position in the raw parameter array.
///
/// The discriminants are the positional contract with the host side: raw
/// parameter arrays are always laid out in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    PiezoCorrect = 0,
    BodyResonance,
    Brightness,
    BowSensitivity,
    ReverbDecay,
    ReverbDampHigh,
    ReverbDampLow,
    ReverbModDepth,
    ReverbModRate,
    DetuneAmount,
    DelayTime,
    DelayFeedback,
    VanishRate,
    DegradeAmount,
    DriftAmount,
    ReverbMix,
    DelayMix,
    MasterMix,
}

impl ParamId {
    /// All parameters in raw-array order.
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::PiezoCorrect,
        ParamId::BodyResonance,
        ParamId::Brightness,
        ParamId::BowSensitivity,
        ParamId::ReverbDecay,
        ParamId::ReverbDampHigh,
        ParamId::ReverbDampLow,
        ParamId::ReverbModDepth,
        ParamId::ReverbModRate,
        ParamId::DetuneAmount,
        ParamId::DelayTime,
        ParamId::DelayFeedback,
        ParamId::VanishRate,
        ParamId::DegradeAmount,
        ParamId::DriftAmount,
        ParamId::ReverbMix,
        ParamId::DelayMix,
        ParamId::MasterMix,
    ];

    /// Position of this parameter in the raw array.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Host-facing identifier.
    pub const fn name(self) -> &'static str {
        match self {
            ParamId::PiezoCorrect => "piezoCorrect",
            ParamId::BodyResonance => "bodyResonance",
            ParamId::Brightness => "brightness",
            ParamId::BowSensitivity => "bowSensitivity",
            ParamId::ReverbDecay => "reverbDecay",
            ParamId::ReverbDampHigh => "reverbDampHigh",
            ParamId::ReverbDampLow => "reverbDampLow",
            ParamId::ReverbModDepth => "reverbModDepth",
            ParamId::ReverbModRate => "reverbModRate",
            ParamId::DetuneAmount => "detuneAmount",
            ParamId::DelayTime => "delayTime",
            ParamId::DelayFeedback => "delayFeedback",
            ParamId::VanishRate => "vanishRate",
            ParamId::DegradeAmount => "degradeAmount",
            ParamId::DriftAmount => "driftAmount",
            ParamId::ReverbMix => "reverbMix",
            ParamId::DelayMix => "delayMix",
            ParamId::MasterMix => "masterMix",
        }
    }

    /// Valid range in plain units (seconds, milliseconds, Hz or unit-less).
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            ParamId::ReverbDecay => 0.5..=30.0,
            ParamId::ReverbDampHigh | ParamId::DelayFeedback => 0.0..=0.95,
            ParamId::ReverbDampLow | ParamId::VanishRate => 0.0..=0.8,
            ParamId::ReverbModDepth => 0.0..=3.0,
            ParamId::ReverbModRate => 0.05..=2.0,
            ParamId::DelayTime => 50.0..=1500.0,
            ParamId::DriftAmount => 0.0..=10.0,
            _ => 0.0..=1.0,
        }
    }

    /// Value used before the host supplies anything.
    pub fn default_value(self) -> f32 {
        ParameterSet::default().get(self)
    }

    /// Looks up a parameter by its host-facing identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// All 18 parameter values as named fields.
///
/// Used both for host-side targets and for the smoothed values the DSP reads.
/// Conversions to and from the positional raw array preserve [`ParamId`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    // Violin input conditioning
    pub piezo_correct: f32,
    pub body_resonance: f32,
    pub brightness: f32,
    pub bow_sensitivity: f32,
    // Reverb
    pub reverb_decay: f32,
    pub reverb_damp_high: f32,
    pub reverb_damp_low: f32,
    pub reverb_mod_depth: f32,
    pub reverb_mod_rate: f32,
    pub detune_amount: f32,
    // Delay
    pub delay_time: f32,
    pub delay_feedback: f32,
    pub vanish_rate: f32,
    pub degrade_amount: f32,
    pub drift_amount: f32,
    // Mix
    pub reverb_mix: f32,
    pub delay_mix: f32,
    pub master_mix: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            piezo_correct: 0.5,
            body_resonance: 0.5,
            brightness: 0.5,
            bow_sensitivity: 0.5,
            reverb_decay: 6.0,
            reverb_damp_high: 0.7,
            reverb_damp_low: 0.3,
            reverb_mod_depth: 0.5,
            reverb_mod_rate: 0.3,
            detune_amount: 0.0,
            delay_time: 400.0,
            delay_feedback: 0.5,
            vanish_rate: 0.3,
            degrade_amount: 0.3,
            drift_amount: 2.0,
            reverb_mix: 0.4,
            delay_mix: 0.3,
            master_mix: 0.5,
        }
    }
}

impl ParameterSet {
    /// Builds a set from a raw array in [`ParamId`] order.
    pub fn from_array(raw: &[f32; PARAM_COUNT]) -> Self {
        let mut set = Self::default();
        for id in ParamId::ALL {
            *set.field_mut(id) = raw[id.index()];
        }
        set
    }

    /// Flattens the set into a raw array in [`ParamId`] order.
    pub fn to_array(&self) -> [f32; PARAM_COUNT] {
        ParamId::ALL.map(|id| self.get(id))
    }

    /// Reads one parameter.
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::PiezoCorrect => self.piezo_correct,
            ParamId::BodyResonance => self.body_resonance,
            ParamId::Brightness => self.brightness,
            ParamId::BowSensitivity => self.bow_sensitivity,
            ParamId::ReverbDecay => self.reverb_decay,
            ParamId::ReverbDampHigh => self.reverb_damp_high,
            ParamId::ReverbDampLow => self.reverb_damp_low,
            ParamId::ReverbModDepth => self.reverb_mod_depth,
            ParamId::ReverbModRate => self.reverb_mod_rate,
            ParamId::DetuneAmount => self.detune_amount,
            ParamId::DelayTime => self.delay_time,
            ParamId::DelayFeedback => self.delay_feedback,
            ParamId::VanishRate => self.vanish_rate,
            ParamId::DegradeAmount => self.degrade_amount,
            ParamId::DriftAmount => self.drift_amount,
            ParamId::ReverbMix => self.reverb_mix,
            ParamId::DelayMix => self.delay_mix,
            ParamId::MasterMix => self.master_mix,
        }
    }

    /// Writes one parameter without range checking.
    pub fn set(&mut self, id: ParamId, value: f32) {
        *self.field_mut(id) = value;
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, id: ParamId, value: f32) -> Self {
        self.set(id, value);
        self
    }

    /// Returns a copy with every value clamped into its documented range.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for id in ParamId::ALL {
            let range = id.range();
            out.set(id, self.get(id).clamp(*range.start(), *range.end()));
        }
        out
    }

    fn field_mut(&mut self, id: ParamId) -> &mut f32 {
        match id {
            ParamId::PiezoCorrect => &mut self.piezo_correct,
            ParamId::BodyResonance => &mut self.body_resonance,
            ParamId::Brightness => &mut self.brightness,
            ParamId::BowSensitivity => &mut self.bow_sensitivity,
            ParamId::ReverbDecay => &mut self.reverb_decay,
            ParamId::ReverbDampHigh => &mut self.reverb_damp_high,
            ParamId::ReverbDampLow => &mut self.reverb_damp_low,
            ParamId::ReverbModDepth => &mut self.reverb_mod_depth,
            ParamId::ReverbModRate => &mut self.reverb_mod_rate,
            ParamId::DetuneAmount => &mut self.detune_amount,
            ParamId::DelayTime => &mut self.delay_time,
            ParamId::DelayFeedback => &mut self.delay_feedback,
            ParamId::VanishRate => &mut self.vanish_rate,
            ParamId::DegradeAmount => &mut self.degrade_amount,
            ParamId::DriftAmount => &mut self.drift_amount,
            ParamId::ReverbMix => &mut self.reverb_mix,
            ParamId::DelayMix => &mut self.delay_mix,
            ParamId::MasterMix => &mut self.master_mix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_indices() {
        for (i, id) in ParamId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        assert_eq!(ParamId::PiezoCorrect.index(), 0);
        assert_eq!(ParamId::DelayTime.index(), 10);
        assert_eq!(ParamId::MasterMix.index(), 17);
    }

    #[test]
    fn test_array_conversion_preserves_positions() {
        let raw: [f32; PARAM_COUNT] = std::array::from_fn(|i| i as f32 * 0.5);
        let set = ParameterSet::from_array(&raw);
        assert_eq!(set.piezo_correct, 0.0);
        assert_eq!(set.reverb_decay, 2.0);
        assert_eq!(set.delay_time, 5.0);
        assert_eq!(set.master_mix, 8.5);
        assert_eq!(set.to_array(), raw);
    }

    #[test]
    fn test_defaults_are_in_range() {
        for id in ParamId::ALL {
            assert!(
                id.range().contains(&id.default_value()),
                "{} default out of range",
                id.name()
            );
        }
    }

    #[test]
    fn test_clamped_enforces_ranges() {
        let set = ParameterSet::default()
            .with(ParamId::ReverbDecay, 0.0)
            .with(ParamId::DelayTime, 5000.0)
            .with(ParamId::MasterMix, -1.0);
        let clamped = set.clamped();
        assert_eq!(clamped.reverb_decay, 0.5);
        assert_eq!(clamped.delay_time, 1500.0);
        assert_eq!(clamped.master_mix, 0.0);
        assert_eq!(clamped.brightness, 0.5);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ParamId::from_name("vanishRate"), Some(ParamId::VanishRate));
        assert_eq!(ParamId::from_name("nope"), None);
    }
}
