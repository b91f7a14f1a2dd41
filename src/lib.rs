//! Abyssverb - a stereo ambient effect for acoustic violin
//!
//! A bridge-piezo signal is cleaned up, measured for bow energy, sent through
//! a three-tap delay whose repeats randomly vanish, degrade and drift, and
//! then into an eight-line modulated feedback reverb. All parameter changes
//! glide through a one-pole smoother so automation never clicks.
//!
//! The [`AbyssEngine`] ties everything together. The individual stages are
//! exported as well and can be driven one sample at a time through the
//! [`Processor`] trait.
//!
//! ```
//! use abyssverb::{AbyssEngine, EngineConfig, ParamId, SharedParameters};
//!
//! let shared = SharedParameters::default();
//! shared.store(ParamId::ReverbDecay, 12.0);
//!
//! let mut engine = AbyssEngine::new(EngineConfig::new(48000.0, 256)).unwrap();
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! engine.process_block_shared(&mut left, &mut right, &shared).unwrap();
//! ```

pub mod core;
pub mod effects;
pub mod engine;
pub mod envelopes;
pub mod filters;
pub mod params;
#[cfg(feature = "wav")]
pub mod render;

// Re-export commonly used types at the crate root
pub use self::core::{EngineConfig, Error, Processor, Result};
pub use effects::{DelayLine, InputConditioner, ModulatedFeedbackReverb, StochasticTapDelay};
pub use engine::AbyssEngine;
pub use envelopes::EnvelopeFollower;
pub use filters::{Biquad, BiquadCoefficients, DcBlocker};
pub use params::{PARAM_COUNT, ParamId, ParameterSet, ParameterSmoother, SharedParameters};
#[cfg(feature = "wav")]
pub use render::{RenderStats, render_wav};
