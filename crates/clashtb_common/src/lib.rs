//! Shared foundational types for the clash testbench.
//!
//! This crate provides the tri-state logic levels and wave alphabet, concrete
//! sample values, immutable samples, validated signals, and the value parser
//! that turns caller-supplied shapes into samples.

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod logic;
pub mod sample;
pub mod signal;
pub mod value;

pub use convert::{convert_values, WaveInput};
pub use error::ValueError;
pub use logic::{LogicLevel, WaveSymbol};
pub use sample::Sample;
pub use signal::{Signal, SignalKind};
pub use value::Value;
