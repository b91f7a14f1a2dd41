//! Effect parameters.
//!
//! This module provides:
//! - `ParamId` and `ParameterSet` for the fixed 18-parameter layout
//! - `ParameterSmoother` for per-sample smoothing of block-rate targets
//! - `SharedParameters` for lock-free hand-off from a control thread

mod set;
mod shared;
mod smoother;

pub use set::{PARAM_COUNT, ParamId, ParameterSet};
pub use shared::SharedParameters;
pub use smoother::ParameterSmoother;
