//! Errors raised while driving the external simulator process.

use std::io;
use std::time::Duration;

use crate::client::ClientState;

/// Errors that can occur while talking to the simulator REPL.
#[derive(Debug, thiserror::Error)]
pub enum ReplError {
    /// The simulator executable could not be located.
    #[error("simulator executable '{executable}' not found")]
    NotFound {
        /// The program that was looked up.
        executable: String,
    },

    /// Spawning the process or using its pipes failed.
    #[error("simulator I/O error: {0}")]
    Io(#[from] io::Error),

    /// The prompt did not appear in time; the process has been killed.
    #[error("timed out after {timeout:?} waiting for the prompt after '{command}'")]
    Timeout {
        /// The command in flight, or `<startup>`.
        command: String,
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// The simulator reported an error in its output.
    #[error("simulator reported an error:\n{output}")]
    Protocol {
        /// The filtered output text.
        output: String,
    },

    /// The process closed its output streams before printing the prompt.
    #[error("simulator exited before printing the prompt; output was:\n{output}")]
    Exited {
        /// Everything captured since the last prompt.
        output: String,
    },

    /// The client was used after its process terminated.
    #[error("simulator process has terminated")]
    Terminated,

    /// The client is not ready to accept a command.
    #[error("simulator client is {state}, expected ready")]
    NotReady {
        /// The state the client was in.
        state: ClientState,
    },

    /// The simulation output does not have the expected list shape.
    #[error("malformed simulation output at byte {offset}: {reason}")]
    MalformedOutput {
        /// What was expected.
        reason: String,
        /// Byte offset into the output text.
        offset: usize,
    },
}
