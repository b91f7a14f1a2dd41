//! DC blocking filter.

use crate::core::{Processor, flush_denormal};

/// Pole radius of the blocker.
const R: f32 = 0.995;

/// Single-pole high-pass that strips offset from the wet signal.
///
/// `y[n] = x[n] - x[n-1] + 0.995 * y[n-1]`
#[derive(Debug, Clone, Default)]
pub struct DcBlocker {
    x1: f32,
    y1: f32,
}

impl DcBlocker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for DcBlocker {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = flush_denormal(input - self.x1 + R * self.y1);
        self.x1 = input;
        self.y1 = output;
        output
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_input_converges_to_zero() {
        let mut blocker = DcBlocker::new();
        let mut buffer = vec![0.8; 5000];
        blocker.process_buffer(&mut buffer);
        assert!((buffer[0] - 0.8).abs() < 1e-6);
        assert!(buffer[4999].abs() < 1e-6, "residual {}", buffer[4999]);
    }

    #[test]
    fn test_passes_alternating_signal() {
        let mut blocker = DcBlocker::new();
        let mut last = 0.0;
        for n in 0..2000 {
            let x = if n % 2 == 0 { 0.5 } else { -0.5 };
            last = blocker.process(x);
        }
        // Nyquist gain is 2 / (1 + R), close to 1
        assert!(last.abs() > 0.9, "nyquist attenuated to {last}");
    }

    #[test]
    fn test_decay_flushes_to_zero() {
        let mut blocker = DcBlocker::new();
        blocker.process(1.0);
        for _ in 0..44100 {
            let out = blocker.process(0.0);
            assert!(!out.is_subnormal(), "subnormal output {out:e}");
        }
        assert_eq!(blocker.y1, 0.0);
    }

    #[test]
    fn test_reset() {
        let mut blocker = DcBlocker::new();
        blocker.process(1.0);
        blocker.reset();
        assert_eq!(blocker.process(0.0), 0.0);
    }
}
