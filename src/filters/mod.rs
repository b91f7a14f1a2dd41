//! Audio filters used by the conditioning and output stages.
//!
//! [`Biquad`] is a second-order IIR filter driven by
//! [`BiquadCoefficients`]; [`DcBlocker`] removes offset from the wet path.

mod biquad;
mod dc_blocker;

pub use self::biquad::{Biquad, BiquadCoefficients};
pub use self::dc_blocker::DcBlocker;
