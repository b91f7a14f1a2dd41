//! Stereo orchestration of the full effect.
//!
//! Per sample and per channel the engine runs:
//!
//! ```text
//! conditioned = conditioner(dry)
//! delayed     = tap_delay(conditioned)
//! reverbed    = reverb(conditioned + delayed · delayMix)
//! wet         = dc_block(reverbed · reverbMix + delayed · delayMix)
//! out         = dry · (1 − masterMix) + wet · masterMix
//! ```
//!
//! The delay feeds the reverb, never the other way round. The right channel
//! runs a slightly longer, more drifting delay than the left to widen the image.

use crate::core::{EngineConfig, Error, Processor, Result};
use crate::effects::{InputConditioner, ModulatedFeedbackReverb, StochasticTapDelay};
use crate::envelopes::EnvelopeFollower;
use crate::filters::DcBlocker;
use crate::params::{PARAM_COUNT, ParameterSet, ParameterSmoother, SharedParameters};

/// Right-channel delay time relative to the left.
const RIGHT_DELAY_TIME_RATIO: f32 = 1.07;
/// Right-channel drift depth relative to the left.
const RIGHT_DRIFT_RATIO: f32 = 1.15;
/// Reverb and delay tail reported to hosts.
const TAIL_SECONDS: f64 = 10.0;

/// Everything one channel owns.
#[derive(Debug, Clone)]
struct ChannelStrip {
    conditioner: InputConditioner,
    follower: EnvelopeFollower,
    delay: StochasticTapDelay,
    reverb: ModulatedFeedbackReverb,
    dc_blocker: DcBlocker,
    delay_time_ratio: f32,
    drift_ratio: f32,
    envelope: f32,
}

impl ChannelStrip {
    fn new(sample_rate: f64, delay_time_ratio: f32, drift_ratio: f32) -> Self {
        Self {
            conditioner: InputConditioner::new(sample_rate),
            follower: EnvelopeFollower::new(sample_rate),
            delay: StochasticTapDelay::new(sample_rate),
            reverb: ModulatedFeedbackReverb::new(sample_rate),
            dc_blocker: DcBlocker::new(),
            delay_time_ratio,
            drift_ratio,
            envelope: 0.0,
        }
    }

    fn prepare(&mut self, sample_rate: f64) {
        self.conditioner.prepare(sample_rate);
        self.follower.prepare(sample_rate);
        self.delay.prepare(sample_rate);
        self.reverb.prepare(sample_rate);
        self.reset();
    }

    fn reset(&mut self) {
        self.conditioner.reset();
        self.follower.reset();
        self.delay.clear();
        self.reverb.clear();
        self.dc_blocker.reset();
        self.envelope = 0.0;
    }

    fn apply(&mut self, p: &ParameterSet) {
        self.conditioner.set_parameters(p.piezo_correct, p.body_resonance, p.brightness);
        self.follower.set_sensitivity(p.bow_sensitivity);
        self.reverb.set_parameters(
            p.reverb_decay,
            p.reverb_damp_high,
            p.reverb_damp_low,
            p.reverb_mod_depth,
            p.reverb_mod_rate,
            p.detune_amount,
        );
        self.delay.set_parameters(
            p.delay_time * self.delay_time_ratio,
            p.delay_feedback,
            p.vanish_rate,
            p.degrade_amount,
            p.drift_amount * self.drift_ratio,
        );
    }

    fn process(&mut self, dry: f32, p: &ParameterSet) -> f32 {
        self.apply(p);

        let conditioned = self.conditioner.process(dry);
        self.envelope = self.follower.process(conditioned);

        let delayed = self.delay.process(conditioned);
        let reverb_in = conditioned + delayed * p.delay_mix;
        let reverberated = self.reverb.process(reverb_in);

        let wet = reverberated * p.reverb_mix + delayed * p.delay_mix;
        let wet = self.dc_blocker.process(wet);

        dry * (1.0 - p.master_mix) + wet * p.master_mix
    }
}

/// The complete stereo effect.
///
/// Built from an [`EngineConfig`]; all buffers are allocated there (and in
/// [`prepare`](Self::prepare)), never while processing.
///
/// # Examples
///
/// ```
/// use abyssverb::{AbyssEngine, EngineConfig, ParameterSet};
///
/// let mut engine = AbyssEngine::new(EngineConfig::default()).unwrap();
/// let params = ParameterSet::default().to_array();
///
/// let mut left = vec![0.0f32; 512];
/// let mut right = vec![0.0f32; 512];
/// left[0] = 1.0;
/// right[0] = 1.0;
/// engine.process_block(&mut left, &mut right, &params).unwrap();
/// assert!(left.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct AbyssEngine {
    config: EngineConfig,
    smoother: ParameterSmoother,
    left: ChannelStrip,
    right: ChannelStrip,
}

impl AbyssEngine {
    /// Creates an engine prepared for `config`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let sample_rate = config.sample_rate;
        let mut engine = Self {
            config,
            smoother: ParameterSmoother::new(sample_rate),
            left: ChannelStrip::new(sample_rate, 1.0, 1.0),
            right: ChannelStrip::new(sample_rate, RIGHT_DELAY_TIME_RATIO, RIGHT_DRIFT_RATIO),
        };
        engine.prepare(config)?;
        Ok(engine)
    }

    /// Re-sizes and clears every stage for new stream settings.
    ///
    /// Safe to call repeatedly, e.g. after a stop/restart at another rate.
    /// Smoothed parameters restart from their defaults.
    pub fn prepare(&mut self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        let sample_rate = config.sample_rate;

        self.left.prepare(sample_rate);
        self.right.prepare(sample_rate);
        self.smoother.configure(sample_rate);
        self.smoother.reset_to(&ParameterSet::default());
        self.config = config;

        log::info!(
            "prepared engine at {} Hz, max block {}",
            sample_rate,
            config.max_block_size
        );
        log::debug!(
            "reverb line lengths {:?}, delay buffer {} samples",
            self.left.reverb.line_lengths(),
            self.left.delay.buffer_len()
        );
        Ok(())
    }

    /// Clears all delay, reverb and filter memory.
    ///
    /// Only call while the stream is stopped.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        log::debug!("engine memory cleared");
    }

    /// Processes one stereo block in place.
    ///
    /// `raw` holds the 18 parameter targets in [`ParamId`](crate::ParamId)
    /// order; it is read once and held for the whole block while the smoother
    /// glides toward it sample by sample.
    pub fn process_block(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        raw: &[f32; PARAM_COUNT],
    ) -> Result<()> {
        if left.len() != right.len() {
            return Err(Error::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            self.smoother.advance(raw);
            let params = self.smoother.values();

            *l = self.left.process(*l, &params);
            *r = self.right.process(*r, &params);
        }
        Ok(())
    }

    /// Processes one stereo block using a single snapshot of `shared`.
    pub fn process_block_shared(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        shared: &SharedParameters,
    ) -> Result<()> {
        let raw = shared.snapshot();
        self.process_block(left, right, &raw)
    }

    /// Stream settings the engine is prepared for.
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Current smoothed parameter values.
    pub fn smoothed(&self) -> ParameterSet {
        self.smoother.values()
    }

    /// Bow envelope of the last processed sample, `[left, right]`.
    pub fn last_envelopes(&self) -> [f32; 2] {
        [self.left.envelope, self.right.envelope]
    }

    /// Length of the tail after input stops, in seconds.
    pub fn tail_length_seconds(&self) -> f64 {
        TAIL_SECONDS
    }
}
