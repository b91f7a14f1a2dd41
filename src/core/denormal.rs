//! Subnormal guard for recursive state.
//!
//! Feedback filters and delay lines decay geometrically after the input stops
//! and eventually reach subnormal floats, which many CPUs process far slower
//! than normal ones. Every recursive state in the crate passes through
//! [`flush_denormal`] before it is stored.

/// Magnitude below which a stored value is treated as silence (about -400 dB).
pub const DENORMAL_THRESHOLD: f32 = 1e-20;

/// Returns `0.0` for values smaller than [`DENORMAL_THRESHOLD`], `x` otherwise.
///
/// # Examples
///
/// ```
/// use abyssverb::core::flush_denormal;
///
/// assert_eq!(flush_denormal(1e-30), 0.0);
/// assert_eq!(flush_denormal(-0.25), -0.25);
/// ```
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_THRESHOLD { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flushes_subnormals() {
        assert_eq!(flush_denormal(f32::MIN_POSITIVE / 4.0), 0.0);
        assert_eq!(flush_denormal(-f32::MIN_POSITIVE / 4.0), 0.0);
        assert_eq!(flush_denormal(1e-21), 0.0);
    }

    #[test]
    fn test_keeps_audible_values() {
        for x in [1e-6, -1e-6, 0.5, -1.0, 1e-19] {
            assert_eq!(flush_denormal(x), x);
        }
        assert_eq!(flush_denormal(0.0), 0.0);
    }
}
