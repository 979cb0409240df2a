//! Errors raised while decoding or editing serialized traces.
//!
//! These are data-integrity errors: a malformed trace is reported when it
//! is decoded and is never silently repaired.

use std::io;

use clashtb_common::ValueError;

/// Errors that can occur while encoding, decoding or editing traces.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    /// A wave starts with the continuation marker.
    #[error("wave cannot start with '.'")]
    LeadingContinuation,

    /// A trace was requested for a run of zero steps.
    #[error("a trace must span at least one step")]
    EmptyRun,

    /// The data list does not match the number of data symbols in the wave.
    #[error("wave has {symbols} data symbol(s) but {data} data value(s)")]
    DataLengthMismatch {
        /// Data-bearing symbols in the wave.
        symbols: usize,
        /// Values in the data list.
        data: usize,
    },

    /// The symbol and payload lists passed to compression differ in length.
    #[error("wave has {wave} step(s) but {data} payload(s)")]
    PayloadLengthMismatch {
        /// Number of wave steps.
        wave: usize,
        /// Number of payload entries.
        data: usize,
    },

    /// A data symbol has no payload to encode.
    #[error("data symbol '{symbol}' at step {index} has no payload")]
    MissingPayload {
        /// The data symbol.
        symbol: char,
        /// The step index.
        index: usize,
    },

    /// A wave character outside the alphabet.
    #[error("unknown wave symbol '{symbol}' in '{name}'")]
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// The entry it belongs to.
        name: String,
    },

    /// A required entry property is absent.
    #[error("trace entry is missing property '{property}'")]
    MissingProperty {
        /// Name of the missing property.
        property: &'static str,
    },

    /// Two entries share a name.
    #[error("duplicate signal name '{0}'")]
    DuplicateName(String),

    /// No entry carries the requested name.
    #[error("no signal named '{0}' in trace")]
    UnknownSignal(String),

    /// No group carries the requested label.
    #[error("no group labelled '{0}' in trace")]
    UnknownGroup(String),

    /// An entry has the wrong JSON shape.
    #[error("malformed trace entry: {reason}")]
    MalformedEntry {
        /// Description of what is wrong.
        reason: String,
    },

    /// A decoded value does not fit its signal.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// The document is not valid JSON.
    #[error("trace JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a trace file failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),
}
