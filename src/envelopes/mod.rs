//! Amplitude analysis of the conditioned input.
//!
//! The bow envelope is computed on every sample for both channels. Nothing in
//! the signal path consumes it yet; the engine exposes the last value per
//! channel for callers that want to drive modulation from it.

mod follower;

pub use follower::EnvelopeFollower;
