//! Compact wave encoding and trace documents for the clash testbench.
//!
//! - [`codec`] compresses per-step symbols and payloads into run-length
//!   wave strings and maps [`Signal`](clashtb_common::Signal)s to and from
//!   them.
//! - [`document`] parses and writes the JSON trace format.
//! - [`chronogram`] edits a trace document as a set of named signals.

#![warn(missing_docs)]

pub mod chronogram;
pub mod codec;
pub mod document;
pub mod error;

pub use chronogram::Chronogram;
pub use codec::{
    compress, compress_with_data, decode_signal, encode_signal, infer_kind, uncompress,
    uncompress_with_data, EncodedWave,
};
pub use document::{TraceDocument, TraceEntry, TraceItem};
pub use error::WaveError;
