//! Test sessions for Clash designs.
//!
//! A [`Testbench`] drives one entity through a [`Simulator`]: it checks that
//! its input and expected-output signals agree on a run length, broadcasts
//! constants, samples the entity, and compares every expected output with
//! the actual trace step by step. Expected samples at UNKNOWN or DONTCARE
//! match anything.
//!
//! # Modules
//!
//! - `session`: Session configuration, run and results
//! - `compare`: Per-step tri-state comparison
//! - `report`: PASS/FAIL rendering
//! - `entity`: [`Entity`] and [`Function`] entry points
//! - `error`: Session error types
//!
//! [`Simulator`]: clashtb_repl::Simulator

#![warn(missing_docs)]

pub mod compare;
pub mod entity;
pub mod error;
pub mod report;
pub mod session;

pub use compare::{samples_match, Comparison};
pub use entity::{Entity, Function};
pub use error::BenchError;
pub use report::{render_comparison, render_report, ReportOptions};
pub use session::{Testbench, ACTUAL_GROUP, EXPECTED_GROUP, INPUTS_GROUP};
