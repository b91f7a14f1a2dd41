//! Lock-free parameter targets shared between a control thread and the audio thread.
//!
//! A control surface or automation source writes individual targets at any
//! time; the audio thread takes one snapshot per block and hands it to the
//! smoother. Values are stored as `f32` bit patterns in atomics, so neither
//! side ever locks or allocates.

use std::sync::atomic::{AtomicU32, Ordering};

use super::set::{PARAM_COUNT, ParamId, ParameterSet};

/// Atomic store of the 18 raw parameter targets.
///
/// # Examples
///
/// ```
/// use abyssverb::{ParamId, SharedParameters};
/// use std::sync::Arc;
///
/// let shared = Arc::new(SharedParameters::default());
/// let writer = Arc::clone(&shared);
/// std::thread::spawn(move || writer.store(ParamId::MasterMix, 0.8))
///     .join()
///     .unwrap();
/// assert_eq!(shared.snapshot()[ParamId::MasterMix.index()], 0.8);
/// ```
#[derive(Debug)]
pub struct SharedParameters {
    // f32 bits of the plain-unit value, one slot per ParamId
    slots: [AtomicU32; PARAM_COUNT],
}

impl SharedParameters {
    /// Creates a store holding `initial` (clamped into range).
    pub fn new(initial: &ParameterSet) -> Self {
        let initial = initial.clamped();
        Self {
            slots: ParamId::ALL.map(|id| AtomicU32::new(initial.get(id).to_bits())),
        }
    }

    /// Writes one target, clamped into its documented range.
    pub fn store(&self, id: ParamId, value: f32) {
        let range = id.range();
        let value = if value.is_nan() {
            id.default_value()
        } else {
            value.clamp(*range.start(), *range.end())
        };
        self.slots[id.index()].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Writes every target from `set`.
    pub fn store_set(&self, set: &ParameterSet) {
        for id in ParamId::ALL {
            self.store(id, set.get(id));
        }
    }

    /// Reads one target.
    pub fn load(&self, id: ParamId) -> f32 {
        f32::from_bits(self.slots[id.index()].load(Ordering::Relaxed))
    }

    /// Reads all targets in [`ParamId`] order. Called once per audio block.
    pub fn snapshot(&self) -> [f32; PARAM_COUNT] {
        std::array::from_fn(|i| f32::from_bits(self.slots[i].load(Ordering::Relaxed)))
    }
}

impl Default for SharedParameters {
    fn default() -> Self {
        Self::new(&ParameterSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_matches_defaults() {
        let shared = SharedParameters::default();
        assert_eq!(shared.snapshot(), ParameterSet::default().to_array());
    }

    #[test]
    fn test_store_clamps_to_range() {
        let shared = SharedParameters::default();
        shared.store(ParamId::ReverbDecay, 100.0);
        shared.store(ParamId::DelayFeedback, 1.5);
        shared.store(ParamId::DelayTime, 10.0);
        assert_eq!(shared.load(ParamId::ReverbDecay), 30.0);
        assert_eq!(shared.load(ParamId::DelayFeedback), 0.95);
        assert_eq!(shared.load(ParamId::DelayTime), 50.0);
    }

    #[test]
    fn test_nan_falls_back_to_default() {
        let shared = SharedParameters::default();
        shared.store(ParamId::Brightness, 0.9);
        shared.store(ParamId::Brightness, f32::NAN);
        assert_eq!(shared.load(ParamId::Brightness), 0.5);
    }

    #[test]
    fn test_store_set_roundtrips_in_range_values() {
        let shared = SharedParameters::default();
        let set = ParameterSet::default()
            .with(ParamId::VanishRate, 0.0)
            .with(ParamId::DriftAmount, 7.5);
        shared.store_set(&set);
        assert_eq!(ParameterSet::from_array(&shared.snapshot()), set);
    }

    #[test]
    fn test_concurrent_writers_leave_valid_values() {
        use std::sync::Arc;

        let shared = Arc::new(SharedParameters::default());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for i in 0..1000 {
                        shared.store(ParamId::MasterMix, ((i + t) % 10) as f32 / 10.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let mix = shared.load(ParamId::MasterMix);
        assert!((0.0..=1.0).contains(&mix));
    }
}
