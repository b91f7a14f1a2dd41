//! Audio effects for the violin signal path.
//!
//! This module provides the per-channel stages the engine chains together:
//! input conditioning, the vanishing tap delay and the modulated FDN reverb,
//! plus the delay line they share.

mod conditioner;
mod delay_line;
pub mod reverb;
pub mod tap_delay;

pub use conditioner::InputConditioner;
pub use delay_line::DelayLine;
pub use reverb::ModulatedFeedbackReverb;
pub use tap_delay::StochasticTapDelay;
