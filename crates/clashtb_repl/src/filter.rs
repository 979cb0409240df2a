//! Cleanup of captured REPL text.
//!
//! The text between two prompts carries terminal control sequences, an echo
//! of the command and a trailing blank line. [`filter_output`] removes all
//! of that and reports error text as [`ReplError::Protocol`].

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ReplError;

/// Cursor-key mode reset followed by keypad mode reset, emitted where the
/// line editor ends a line.
pub const ALTERNATE_ESCAPE: &str = "\x1b[?1l\x1b>";

/// Substrings that mark an error report in simulator output.
pub const ERROR_MARKERS: [&str; 2] = ["error:", "Exception:"];

static CONTROL_SEQUENCE: OnceLock<Regex> = OnceLock::new();

fn control_sequence() -> &'static Regex {
    CONTROL_SEQUENCE.get_or_init(|| {
        // CSI sequences, then two-byte escapes (keypad modes, charset selection).
        Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|[=>@-Z\\-_])")
            .expect("control sequence pattern is valid")
    })
}

/// Strips terminal control sequences, turning the alternate escape into a
/// line break first.
pub fn strip_control(raw: &str) -> String {
    let text = raw.replace(ALTERNATE_ESCAPE, "\n");
    control_sequence().replace_all(&text, "").replace('\r', "")
}

/// Returns `true` if `text` contains an error marker.
pub fn has_error_marker(text: &str) -> bool {
    ERROR_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Filters the text captured while `command` ran.
///
/// Control sequences are stripped, the first line is dropped when it echoes
/// the command, and trailing blank lines are dropped.
///
/// # Errors
///
/// Returns [`ReplError::Protocol`] carrying the filtered text when it
/// contains an error marker.
pub fn filter_output(raw: &str, command: &str) -> Result<String, ReplError> {
    let text = strip_control(raw);
    let mut lines: Vec<&str> = text.split('\n').collect();

    if lines
        .first()
        .is_some_and(|first| first.trim() == command.trim() && !command.trim().is_empty())
    {
        lines.remove(0);
    }
    while lines.last().is_some_and(|last| last.trim().is_empty()) {
        lines.pop();
    }

    let output = lines.join("\n");
    if has_error_marker(&output) {
        return Err(ReplError::Protocol { output });
    }
    Ok(output)
}
