//! Core processing types and traits.
//!
//! This module provides the fundamental abstractions used throughout the
//! library, including:
//! - `Processor` trait for all per-channel processing stages
//! - `EngineConfig` for the host stream settings
//! - `Error` and `Result` for the fallible edges of the engine
//! - `flush_denormal` for recursive filter and delay state

mod config;
mod denormal;
mod error;
mod processor;

pub use config::EngineConfig;
pub use denormal::{DENORMAL_THRESHOLD, flush_denormal};
pub use error::{Error, Result};
pub use processor::Processor;
