//! Test session error types.
//!
//! Configuration errors are raised before the simulator is touched; simulator
//! and trace failures are wrapped unchanged.

use std::path::PathBuf;

use clashtb_common::ValueError;
use clashtb_repl::ReplError;
use clashtb_wave::WaveError;

/// Errors that can occur while configuring or running a test session.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// No input signals were given.
    #[error("inputs cannot be empty")]
    EmptyInputs,

    /// No expected output signals were given.
    #[error("expected outputs cannot be empty")]
    EmptyOutputs,

    /// Non-constant signals disagree on their length.
    #[error("all signals must have the same length, got {lengths}")]
    LengthMismatch {
        /// The recorded `name: length` pairs.
        lengths: String,
    },

    /// Two expected outputs claim the same output position.
    #[error("expected outputs '{first}' and '{second}' both have order {order}")]
    DuplicateOrder {
        /// The shared order index.
        order: usize,
        /// The first signal.
        first: String,
        /// The second signal.
        second: String,
    },

    /// The simulator produced a different number of outputs than declared.
    #[error("number of actual outputs ({produced}) doesn't match what was declared ({declared})")]
    OutputCountMismatch {
        /// Outputs in the simulation result.
        produced: usize,
        /// Declared output names.
        declared: usize,
    },

    /// An expected output's order is past the simulation's outputs.
    #[error("expected output '{signal}' has order {order} but the simulation produced {produced} output(s)")]
    OutputOrderOutOfRange {
        /// The expected signal.
        signal: String,
        /// Its order index.
        order: usize,
        /// Outputs in the simulation result.
        produced: usize,
    },

    /// An actual trace has a different length from its expectation.
    #[error("actual values of '{signal}' aren't the same length ({actual}) as expected ({expected})")]
    ActualLengthMismatch {
        /// The signal name.
        signal: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Results were requested before the session ran.
    #[error("testbench has not been run")]
    NotRun,

    /// The design source file does not exist.
    #[error("file {} doesn't exist", .0.display())]
    MissingDesign(PathBuf),

    /// A signal value was invalid.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// The simulator failed.
    #[error(transparent)]
    Repl(#[from] ReplError),

    /// Building the session trace failed.
    #[error(transparent)]
    Wave(#[from] WaveError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_display() {
        let e = BenchError::LengthMismatch {
            lengths: "start: 5, out: 3".into(),
        };
        assert_eq!(
            e.to_string(),
            "all signals must have the same length, got start: 5, out: 3"
        );
    }

    #[test]
    fn output_count_display() {
        let e = BenchError::OutputCountMismatch {
            produced: 2,
            declared: 3,
        };
        assert_eq!(
            e.to_string(),
            "number of actual outputs (2) doesn't match what was declared (3)"
        );
    }

    #[test]
    fn missing_design_display() {
        let e = BenchError::MissingDesign(PathBuf::from("src/Top.hs"));
        assert_eq!(e.to_string(), "file src/Top.hs doesn't exist");
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let e = BenchError::from(ReplError::Terminated);
        assert_eq!(e.to_string(), "simulator process has terminated");
        let e = BenchError::from(ValueError::EmptySignal("a".into()));
        assert_eq!(e.to_string(), "signal 'a' has no samples");
    }
}
