//! Errors raised while building samples and signals from caller input.
//!
//! Every variant is a configuration error: it is reported before any
//! simulator interaction and is never retried.

use crate::signal::SignalKind;
use crate::value::Value;

/// Errors that can occur while converting or validating signal values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// The input does not match any accepted value shape.
    #[error("unsupported value shape: {reason}")]
    UnsupportedShape {
        /// Description of the rejected input.
        reason: String,
    },

    /// A character is not part of the wave alphabet.
    #[error("unknown wave symbol '{0}'")]
    UnknownSymbol(char),

    /// A wave string has more data-bearing symbols than data values.
    #[error("wave needs {needed} data value(s) but {provided} were supplied")]
    DataCountMismatch {
        /// Number of data symbols in the wave.
        needed: usize,
        /// Number of data values supplied.
        provided: usize,
    },

    /// A value lies outside the domain of its signal.
    #[error("value {value} out of range for {kind} signal '{signal}'")]
    OutOfRange {
        /// Name of the signal being built.
        signal: String,
        /// Declared domain of the signal.
        kind: SignalKind,
        /// The offending value.
        value: Value,
    },

    /// A signal was given no samples.
    #[error("signal '{0}' has no samples")]
    EmptySignal(String),

    /// `fit` was called on a signal that is not a constant.
    #[error("cannot fit signal '{signal}' of length {len}: only constants can be broadcast")]
    NotConstant {
        /// Name of the signal.
        signal: String,
        /// Its current length.
        len: usize,
    },

    /// A sample without a value cannot be written as a simulator literal.
    #[error("sample {index} of '{signal}' has no value and cannot be randomized")]
    Unprintable {
        /// Name of the signal.
        signal: String,
        /// Index of the sample.
        index: usize,
    },

    /// An index is past the end of a signal.
    #[error("index {index} out of bounds for signal '{signal}' of length {len}")]
    IndexOutOfBounds {
        /// Name of the signal.
        signal: String,
        /// Requested index.
        index: usize,
        /// Signal length.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_symbol_display() {
        let e = ValueError::UnknownSymbol('q');
        assert_eq!(e.to_string(), "unknown wave symbol 'q'");
    }

    #[test]
    fn out_of_range_display() {
        let e = ValueError::OutOfRange {
            signal: "count".into(),
            kind: SignalKind::Unsigned(2),
            value: Value::Int(7),
        };
        assert_eq!(
            e.to_string(),
            "value 7 out of range for Unsigned 2 signal 'count'"
        );
    }

    #[test]
    fn not_constant_display() {
        let e = ValueError::NotConstant {
            signal: "start".into(),
            len: 4,
        };
        assert_eq!(
            e.to_string(),
            "cannot fit signal 'start' of length 4: only constants can be broadcast"
        );
    }

    #[test]
    fn data_count_display() {
        let e = ValueError::DataCountMismatch {
            needed: 3,
            provided: 1,
        };
        assert_eq!(
            e.to_string(),
            "wave needs 3 data value(s) but 1 were supplied"
        );
    }
}
