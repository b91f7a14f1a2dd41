//! Eight-line modulated feedback delay network.
//!
//! # Structure
//!
//! Each of the eight lines is read through a slowly swept fractional tap
//! (one sine LFO per line, phases spread evenly so the sweeps never align).
//! The readouts are mixed through a normalized Hadamard matrix, scaled by a
//! per-line RT60 gain, fed the input, run through two cascaded one-pole
//! dampers and written back.
//!
//! The wet output is the plain sum of the eight readouts, taken before the
//! feedback path, so damping shapes the tail but never the first arrival.

use std::f32::consts::PI;

use crate::core::{Processor, flush_denormal};
use crate::effects::DelayLine;

/// Number of delay lines in the network.
pub const NUM_LINES: usize = 8;

/// Line lengths in samples at 44.1 kHz.
pub const BASE_LENGTHS: [usize; NUM_LINES] = [1557, 1617, 1491, 1422, 1277, 1356, 1188, 1116];

/// Sample rate the base lengths are specified at.
const BASE_RATE: f64 = 44100.0;

/// Hadamard signs: `+1` when `popcount(i & j)` is even, `-1` otherwise.
const fn hadamard_signs() -> [[f32; NUM_LINES]; NUM_LINES] {
    let mut signs = [[0.0; NUM_LINES]; NUM_LINES];
    let mut i = 0;
    while i < NUM_LINES {
        let mut j = 0;
        while j < NUM_LINES {
            signs[i][j] = if (i & j).count_ones() % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            j += 1;
        }
        i += 1;
    }
    signs
}

const HADAMARD: [[f32; NUM_LINES]; NUM_LINES] = hadamard_signs();

/// Modulated FDN reverberator for one channel.
///
/// # Examples
///
/// ```
/// use abyssverb::{ModulatedFeedbackReverb, Processor};
///
/// let mut reverb = ModulatedFeedbackReverb::new(44100.0);
/// reverb.set_parameters(6.0, 0.7, 0.3, 0.5, 0.3, 0.0);
/// let first = reverb.process(1.0);
/// assert_eq!(first, 0.0); // nothing has travelled through the lines yet
/// ```
#[derive(Debug, Clone)]
pub struct ModulatedFeedbackReverb {
    sample_rate: f32,
    lines: [DelayLine; NUM_LINES],
    lfo_phase: [f32; NUM_LINES],
    damp_high_state: [f32; NUM_LINES],
    damp_low_state: [f32; NUM_LINES],

    decay: f32,
    damp_high: f32,
    damp_low: f32,
    mod_depth: f32, // milliseconds
    mod_rate: f32,  // Hz
    detune: f32,

    // RT60 gains, recomputed only when decay changes
    gains: [f32; NUM_LINES],
    gains_decay: f32,
}

impl ModulatedFeedbackReverb {
    /// Creates a reverb sized for `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let mut reverb = Self {
            sample_rate: sample_rate as f32,
            lines: std::array::from_fn(|_| DelayLine::new(1)),
            lfo_phase: [0.0; NUM_LINES],
            damp_high_state: [0.0; NUM_LINES],
            damp_low_state: [0.0; NUM_LINES],
            decay: 6.0,
            damp_high: 0.7,
            damp_low: 0.3,
            mod_depth: 0.5,
            mod_rate: 0.3,
            detune: 0.0,
            gains: [0.0; NUM_LINES],
            gains_decay: f32::NAN,
        };
        reverb.prepare(sample_rate);
        reverb
    }

    /// Resizes every line for `sample_rate`, clears them and re-spreads the LFO phases.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate as f32;
        self.lines =
            BASE_LENGTHS.map(|base| DelayLine::new(Self::scaled_length(base, sample_rate)));
        self.lfo_phase = std::array::from_fn(|i| i as f32 / NUM_LINES as f32);
        self.damp_high_state = [0.0; NUM_LINES];
        self.damp_low_state = [0.0; NUM_LINES];
        self.gains_decay = f32::NAN;
    }

    fn scaled_length(base: usize, sample_rate: f64) -> usize {
        (base as f64 * sample_rate / BASE_RATE) as usize
    }

    /// Updates all reverb controls.
    ///
    /// # Arguments
    ///
    /// * `decay` - RT60 in seconds (must be positive)
    /// * `damp_high` - High-frequency damping, 0 to 0.95
    /// * `damp_low` - Gentle second damping stage, 0 to 0.8
    /// * `mod_depth` - Delay sweep depth in milliseconds
    /// * `mod_rate` - Base LFO rate in Hz
    /// * `detune` - Spreads the per-line LFO rates apart, 0 to 1
    pub fn set_parameters(
        &mut self,
        decay: f32,
        damp_high: f32,
        damp_low: f32,
        mod_depth: f32,
        mod_rate: f32,
        detune: f32,
    ) {
        self.decay = decay;
        self.damp_high = damp_high;
        self.damp_low = damp_low;
        self.mod_depth = mod_depth;
        self.mod_rate = mod_rate;
        self.detune = detune;
    }

    /// Current length of every line in samples.
    pub fn line_lengths(&self) -> [usize; NUM_LINES] {
        std::array::from_fn(|i| self.lines[i].len())
    }

    /// Zeroes line contents and damping state. LFO phases keep running.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.damp_high_state = [0.0; NUM_LINES];
        self.damp_low_state = [0.0; NUM_LINES];
    }

    fn update_gains(&mut self) {
        if self.decay == self.gains_decay {
            return;
        }
        let decay_samples = self.decay * self.sample_rate;
        for (gain, line) in self.gains.iter_mut().zip(&self.lines) {
            *gain = 10.0f32.powf(-3.0 * line.len() as f32 / decay_samples);
        }
        self.gains_decay = self.decay;
    }
}

impl Processor for ModulatedFeedbackReverb {
    fn process(&mut self, input: f32) -> f32 {
        let mut outputs = [0.0f32; NUM_LINES];
        let samples_per_ms = self.sample_rate / 1000.0;

        // Modulated reads
        for (i, output) in outputs.iter_mut().enumerate() {
            let increment = self.mod_rate * (1.0 + self.detune * i as f32 * 0.1) / self.sample_rate;
            self.lfo_phase[i] += increment;
            if self.lfo_phase[i] >= 1.0 {
                self.lfo_phase[i] -= 1.0;
            }
            let lfo = (2.0 * PI * self.lfo_phase[i]).sin();
            let mod_samples = lfo * self.mod_depth * samples_per_ms;

            let line = &self.lines[i];
            *output = line.read_behind(line.len() as f32 - mod_samples);
        }

        // Hadamard mix
        let scale = 1.0 / (NUM_LINES as f32).sqrt();
        let mut mixed = [0.0f32; NUM_LINES];
        for (i, mixed) in mixed.iter_mut().enumerate() {
            let sum: f32 = HADAMARD[i]
                .iter()
                .zip(&outputs)
                .map(|(sign, out)| sign * out)
                .sum();
            *mixed = sum * scale;
        }

        self.update_gains();

        // Damped feedback
        let injected = input / NUM_LINES as f32;
        let high = 1.0 - self.damp_high * 0.95;
        let low = 1.0 - self.damp_low * 0.5;
        for i in 0..NUM_LINES {
            let signal = mixed[i] * self.gains[i] + injected;

            self.damp_high_state[i] =
                flush_denormal(signal * high + self.damp_high_state[i] * (1.0 - high));
            self.damp_low_state[i] = flush_denormal(
                self.damp_high_state[i] * low + self.damp_low_state[i] * (1.0 - low),
            );

            self.lines[i].write_and_advance(self.damp_low_state[i]);
        }

        outputs.iter().sum::<f32>() * scale
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadamard_is_orthogonal() {
        for a in 0..NUM_LINES {
            for b in 0..NUM_LINES {
                let dot: f32 = (0..NUM_LINES).map(|k| HADAMARD[a][k] * HADAMARD[b][k]).sum();
                let expected = if a == b { NUM_LINES as f32 } else { 0.0 };
                assert_eq!(dot, expected, "rows {a} and {b}");
            }
        }
        assert!(HADAMARD[0].iter().all(|&s| s == 1.0));
        assert_eq!(HADAMARD[3][3], 1.0); // popcount(3) = 2
        assert_eq!(HADAMARD[1][3], -1.0); // popcount(1) = 1
    }

    #[test]
    fn test_line_lengths_at_base_rate() {
        let reverb = ModulatedFeedbackReverb::new(44100.0);
        assert_eq!(reverb.line_lengths(), BASE_LENGTHS);
    }

    #[test]
    fn test_line_lengths_scale_with_sample_rate() {
        let base = ModulatedFeedbackReverb::new(44100.0).line_lengths();
        let doubled = ModulatedFeedbackReverb::new(88200.0).line_lengths();
        for i in 0..NUM_LINES {
            assert_eq!(doubled[i], base[i] * 2);
        }

        let at_48k = ModulatedFeedbackReverb::new(48000.0).line_lengths();
        for i in 0..NUM_LINES {
            let expected = BASE_LENGTHS[i] as f64 * 48000.0 / 44100.0;
            assert!((at_48k[i] as f64 - expected).abs() < 1.0);
        }
    }

    #[test]
    fn test_lfo_phases_spread() {
        let reverb = ModulatedFeedbackReverb::new(44100.0);
        for (i, phase) in reverb.lfo_phase.iter().enumerate() {
            assert_eq!(*phase, i as f32 / 8.0);
        }
    }

    #[test]
    fn test_first_arrival_after_shortest_line() {
        let mut reverb = ModulatedFeedbackReverb::new(44100.0);
        reverb.set_parameters(6.0, 0.0, 0.0, 0.0, 0.3, 0.0);
        let mut first_nonzero = None;
        for n in 0..2000 {
            let out = reverb.process(if n == 0 { 1.0 } else { 0.0 });
            if out != 0.0 && first_nonzero.is_none() {
                first_nonzero = Some(n);
            }
        }
        // Undamped and unmodulated: the shortest line returns the impulse exactly
        assert_eq!(first_nonzero, Some(1116));
    }

    #[test]
    fn test_rt60_gain() {
        let mut reverb = ModulatedFeedbackReverb::new(44100.0);
        reverb.set_parameters(2.0, 0.0, 0.0, 0.0, 0.3, 0.0);
        reverb.process(0.0);
        for (gain, len) in reverb.gains.iter().zip(BASE_LENGTHS) {
            let expected = 10.0f32.powf(-3.0 * len as f32 / (2.0 * 44100.0));
            assert!((gain - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_tail_decays() {
        let mut reverb = ModulatedFeedbackReverb::new(44100.0);
        reverb.set_parameters(0.5, 0.3, 0.1, 0.5, 0.3, 0.5);
        let mut early_peak: f32 = 0.0;
        for n in 0..4410 {
            let out = reverb.process(if n == 0 { 1.0 } else { 0.0 });
            early_peak = early_peak.max(out.abs());
        }
        for _ in 4410..44100 {
            reverb.process(0.0);
        }
        let mut late_peak: f32 = 0.0;
        for _ in 0..4410 {
            late_peak = late_peak.max(reverb.process(0.0).abs());
        }
        assert!(early_peak > 0.0);
        assert!(late_peak < early_peak * 1e-3, "late {late_peak} early {early_peak}");
    }

    #[test]
    fn test_no_subnormals_after_long_silence() {
        let mut reverb = ModulatedFeedbackReverb::new(44100.0);
        reverb.set_parameters(0.5, 0.7, 0.3, 0.5, 0.3, 0.0);
        reverb.process(1.0);
        // -60 dB per half second reaches the subnormal range after ~7 s
        for _ in 0..44100 * 12 {
            let out = reverb.process(0.0);
            assert!(!out.is_subnormal(), "subnormal output {out:e}");
        }
        for i in 0..NUM_LINES {
            assert!(!reverb.damp_high_state[i].is_subnormal());
            assert!(!reverb.damp_low_state[i].is_subnormal());
            let line = &reverb.lines[i];
            for n in 0..line.len() {
                assert!(!line.read_at(n as f32).is_subnormal(), "line {i} slot {n}");
            }
        }
    }

    #[test]
    fn test_clear_silences_but_keeps_phase() {
        let mut reverb = ModulatedFeedbackReverb::new(44100.0);
        for _ in 0..500 {
            reverb.process(0.5);
        }
        let phases = reverb.lfo_phase;
        reverb.clear();
        assert_eq!(reverb.lfo_phase, phases);
        for _ in 0..3000 {
            assert_eq!(reverb.process(0.0), 0.0);
        }
    }
}
