//! A crude bowed-string stand-in for feeding the effect without a violin.

use std::f32::consts::PI;

/// Note frequencies in Hz and lengths in seconds. Zero frequency is a rest.
const PHRASE: [(f32, f32); 6] = [
    (293.66, 1.5),
    (440.00, 1.0),
    (369.99, 1.0),
    (329.63, 2.0),
    (587.33, 0.5),
    (0.0, 4.0),
];

const ATTACK_SECONDS: f32 = 0.08;
const RELEASE_SECONDS: f32 = 0.12;
const VIBRATO_HZ: f32 = 5.5;
const VIBRATO_DEPTH: f32 = 0.006;

/// Looping phrase of sawtooth notes with vibrato, bow swell and a body lowpass.
pub struct BowedPhrase {
    sample_rate: f32,
    phase: f32,
    vibrato_phase: f32,
    note: usize,
    note_time: f32,
    lowpass: f32,
    level: f32,
}

impl BowedPhrase {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            phase: 0.0,
            vibrato_phase: 0.0,
            note: 0,
            note_time: 0.0,
            lowpass: 0.0,
            level: 0.3,
        }
    }

    /// Output level of the phrase, 0 to 1.
    #[allow(dead_code)]
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    #[allow(dead_code)]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Length of one pass through the phrase in seconds.
    #[allow(dead_code)]
    pub fn phrase_seconds() -> f32 {
        PHRASE.iter().map(|(_, length)| length).sum()
    }

    pub fn next_sample(&mut self) -> f32 {
        let (freq, length) = PHRASE[self.note];
        let dt = 1.0 / self.sample_rate;

        self.note_time += dt;
        if self.note_time >= length {
            self.note_time -= length;
            self.note = (self.note + 1) % PHRASE.len();
        }
        if freq == 0.0 {
            self.lowpass *= 0.999;
            return self.lowpass;
        }

        let swell = (self.note_time / ATTACK_SECONDS)
            .min((length - self.note_time) / RELEASE_SECONDS)
            .clamp(0.0, 1.0);

        self.vibrato_phase = (self.vibrato_phase + VIBRATO_HZ * dt).fract();
        let vibrato = 1.0 + (2.0 * PI * self.vibrato_phase).sin() * VIBRATO_DEPTH;
        self.phase = (self.phase + freq * vibrato * dt).fract();
        let saw = 2.0 * self.phase - 1.0;

        self.lowpass += (saw - self.lowpass) * 0.2;
        self.lowpass * swell * self.level
    }
}
