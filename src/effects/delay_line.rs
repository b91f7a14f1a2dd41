//! Fixed-length circular delay buffer with fractional reads.

/// Circular buffer of samples with a single write cursor.
///
/// The length is fixed when the line is created; reads are expressed as a
/// distance behind the write cursor and wrap into `[0, len)`.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a silent line holding `len` samples (at least one).
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            write_pos: 0,
        }
    }

    /// Number of samples the line holds.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always `false`: a line holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current write cursor.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Reads at an absolute fractional position with linear interpolation.
    ///
    /// Positions outside `[0, len)` wrap around.
    #[inline]
    pub fn read_at(&self, position: f32) -> f32 {
        let len = self.buffer.len();
        let wrapped = position.rem_euclid(len as f32);
        let index0 = (wrapped as usize) % len;
        let index1 = (index0 + 1) % len;
        let frac = wrapped - wrapped.floor();

        self.buffer[index0] * (1.0 - frac) + self.buffer[index1] * frac
    }

    /// Reads `delay` samples behind the write cursor.
    #[inline]
    pub fn read_behind(&self, delay: f32) -> f32 {
        self.read_at(self.write_pos as f32 - delay)
    }

    /// Stores `sample` at the write cursor and advances it.
    #[inline]
    pub fn write_and_advance(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Zeroes the contents, keeping the cursor where it is.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}
