//! Multi-tap delay whose echoes randomly vanish, drift and degrade.
//!
//! Three taps read one shared line at golden-ratio spacings. Every tap
//! periodically rolls a die: it either fades out ("vanishes") or returns at a
//! random level. The fade itself is a slow per-sample glide, so the random
//! decisions never click. Tap positions wander with a slow sine drift, and a
//! degrade control darkens and bit-reduces what the taps read.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::core::{Processor, flush_denormal};
use crate::effects::DelayLine;

/// Number of read taps.
pub const NUM_TAPS: usize = 3;

/// Tap times relative to the delay time (golden-ratio spacing).
pub const TAP_RATIOS: [f32; NUM_TAPS] = [1.0, 0.618, 0.382];

/// Seed used on every `prepare`, making runs reproducible.
pub const TAP_SEED: u64 = 42;

/// Longest supported delay in seconds.
const MAX_DELAY_SECONDS: f64 = 2.0;
/// Fraction of the remaining gain distance covered per sample.
const GAIN_GLIDE: f32 = 0.001;
/// Shortest and longest wait between gain decisions, in seconds.
const DECISION_MIN_SECONDS: f64 = 0.05;
const DECISION_MAX_SECONDS: f64 = 0.4;
/// Lowest level a returning tap comes back at.
const RETURN_FLOOR: f32 = 0.3;
/// Degrade amount below which no quantization happens.
const QUANTIZE_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone, Copy)]
struct Tap {
    ratio: f32,
    gain_target: f32,
    gain: f32,
    countdown: i64,
    drift_phase: f32,
    lowpass: f32,
}

impl Tap {
    fn new(index: usize) -> Self {
        Self {
            ratio: TAP_RATIOS[index],
            gain_target: 1.0,
            gain: 1.0,
            countdown: 0,
            drift_phase: index as f32 * 0.33,
            lowpass: 0.0,
        }
    }
}

/// Vanishing multi-tap delay for one channel.
///
/// The random generator is owned by the instance and reseeded on every
/// `prepare`, so identical parameter automation always yields identical
/// vanish and return decisions. The default generator is `StdRng` seeded with
/// [`TAP_SEED`].
///
/// # Examples
///
/// ```
/// use abyssverb::{Processor, StochasticTapDelay};
///
/// let mut delay = StochasticTapDelay::new(44100.0);
/// delay.set_parameters(400.0, 0.5, 0.3, 0.3, 2.0);
/// let out = delay.process(0.5);
/// assert_eq!(out, 0.0); // the line starts empty
/// ```
#[derive(Debug, Clone)]
pub struct StochasticTapDelay<R: Rng + SeedableRng = StdRng> {
    sample_rate: f32,
    line: DelayLine,
    taps: [Tap; NUM_TAPS],
    seed: u64,
    rng: R,

    delay_time_ms: f32,
    feedback: f32,
    vanish_rate: f32,
    degrade_amount: f32,
    drift_amount: f32, // milliseconds
}

impl StochasticTapDelay<StdRng> {
    /// Creates a delay sized for `sample_rate` with the default generator and seed.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, TAP_SEED)
    }
}

impl<R: Rng + SeedableRng> StochasticTapDelay<R> {
    /// Creates a delay sized for `sample_rate` whose generator starts from `seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use abyssverb::StochasticTapDelay;
    /// use rand::rngs::StdRng;
    ///
    /// let delay = StochasticTapDelay::<StdRng>::with_seed(48000.0, 7);
    /// assert_eq!(delay.buffer_len(), 96000);
    /// ```
    pub fn with_seed(sample_rate: f64, seed: u64) -> Self {
        let mut delay = Self {
            sample_rate: sample_rate as f32,
            line: DelayLine::new(1),
            taps: std::array::from_fn(Tap::new),
            seed,
            rng: R::seed_from_u64(seed),
            delay_time_ms: 400.0,
            feedback: 0.5,
            vanish_rate: 0.3,
            degrade_amount: 0.3,
            drift_amount: 2.0,
        };
        delay.prepare(sample_rate);
        delay
    }

    /// Resizes the buffer for `sample_rate`, resets every tap and reseeds the generator.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate as f32;
        self.line = DelayLine::new((sample_rate * MAX_DELAY_SECONDS) as usize);
        self.taps = std::array::from_fn(Tap::new);
        self.rng = R::seed_from_u64(self.seed);
    }

    /// Updates all delay controls.
    ///
    /// # Arguments
    ///
    /// * `delay_time_ms` - Time of the longest tap in milliseconds
    /// * `feedback` - Share of the tap mix written back, 0 to 0.95
    /// * `vanish_rate` - Probability that a gain decision silences the tap
    /// * `degrade` - Darkening and bit reduction, 0 to 1
    /// * `drift` - Depth of the tap position wander in milliseconds
    pub fn set_parameters(
        &mut self,
        delay_time_ms: f32,
        feedback: f32,
        vanish_rate: f32,
        degrade: f32,
        drift: f32,
    ) {
        self.delay_time_ms = delay_time_ms;
        self.feedback = feedback;
        self.vanish_rate = vanish_rate;
        self.degrade_amount = degrade;
        self.drift_amount = drift;
    }

    /// Buffer length in samples.
    pub fn buffer_len(&self) -> usize {
        self.line.len()
    }

    /// Gain each tap is currently gliding toward.
    pub fn tap_gain_targets(&self) -> [f32; NUM_TAPS] {
        self.taps.map(|tap| tap.gain_target)
    }

    /// Gain each tap is currently applying.
    pub fn tap_gains(&self) -> [f32; NUM_TAPS] {
        self.taps.map(|tap| tap.gain)
    }

    /// Zeroes the buffer and degrade filters and brings every tap back to full gain.
    pub fn clear(&mut self) {
        self.line.clear();
        for tap in &mut self.taps {
            tap.lowpass = 0.0;
            tap.gain = 1.0;
            tap.gain_target = 1.0;
        }
    }

    fn decide(&mut self, index: usize) {
        let roll: f32 = self.rng.r#gen();
        let target = if roll < self.vanish_rate {
            0.0
        } else {
            let level: f32 = self.rng.r#gen();
            level * (1.0 - RETURN_FLOOR) + RETURN_FLOOR
        };

        let sample_rate = self.sample_rate as f64;
        let shortest = (sample_rate * DECISION_MIN_SECONDS) as i64;
        let longest = (sample_rate * DECISION_MAX_SECONDS) as i64;
        let countdown = self.rng.gen_range(shortest..=longest);

        let tap = &mut self.taps[index];
        tap.gain_target = target;
        tap.countdown = countdown;
    }

    fn degrade_sample(&self, lowpass: &mut f32, sample: f32) -> f32 {
        let pole = self.degrade_amount * 0.9;
        *lowpass = flush_denormal(sample * (1.0 - pole) + *lowpass * pole);

        if self.degrade_amount > QUANTIZE_THRESHOLD {
            let bits = 16.0 - self.degrade_amount * 12.0;
            let levels = 2.0f32.powf(bits);
            (*lowpass * levels).round() / levels
        } else {
            *lowpass
        }
    }
}

impl<R: Rng + SeedableRng> Processor for StochasticTapDelay<R> {
    fn process(&mut self, input: f32) -> f32 {
        let samples_per_ms = self.sample_rate / 1000.0;
        let max_delay = ((self.line.len() - 1) as f32).max(1.0);
        let mut sum = 0.0;

        for i in 0..NUM_TAPS {
            self.taps[i].countdown -= 1;
            if self.taps[i].countdown <= 0 {
                self.decide(i);
            }

            let mut tap = self.taps[i];
            tap.gain = flush_denormal(tap.gain + (tap.gain_target - tap.gain) * GAIN_GLIDE);

            tap.drift_phase += self.drift_amount * 0.1 / self.sample_rate;
            if tap.drift_phase >= 1.0 {
                tap.drift_phase -= 1.0;
            }
            let drift = (2.0 * PI * tap.drift_phase).sin() * self.drift_amount * samples_per_ms;

            let delay =
                (self.delay_time_ms * tap.ratio * samples_per_ms + drift).clamp(1.0, max_delay);
            let read = self.line.read_behind(delay);
            let degraded = self.degrade_sample(&mut tap.lowpass, read);

            sum += degraded * tap.gain;
            self.taps[i] = tap;
        }

        let output = sum / NUM_TAPS as f32;
        self.line.write_and_advance(flush_denormal(input + output * self.feedback));
        output
    }

    fn reset(&mut self) {
        self.clear();
    }
}
