//! Client for the `clashi` interactive simulator.
//!
//! This crate owns the external simulator process: it spawns the REPL,
//! synchronizes on its prompt, sends `:l` and `sampleN` commands with a
//! bounded wait, strips terminal control sequences from the captured text,
//! detects error reports, and parses tuple-list results into per-output
//! value lists.
//!
//! # Modules
//!
//! - `client`: Process lifecycle and prompt synchronization
//! - `filter`: Control-sequence stripping, echo removal, error detection
//! - `tuple_parser`: Depth-tracked parser for `sampleN` output
//! - `simulator`: The [`Simulator`] trait sessions are written against
//! - `error`: Protocol client error types

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod filter;
pub mod simulator;
pub mod tuple_parser;

pub use client::{sample_n_command, ClientState, ReplClient, ReplOptions, DEFAULT_PROMPT};
pub use error::ReplError;
pub use filter::filter_output;
pub use simulator::Simulator;
pub use tuple_parser::{parse_node, parse_sample_n, Node};
