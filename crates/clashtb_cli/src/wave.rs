//! `clashtb wave`: print the signals of a trace file.

use std::path::Path;

use clashtb_common::Signal;
use clashtb_wave::Chronogram;

use crate::{GlobalArgs, WaveArgs};

/// Runs the `clashtb wave` command.
pub fn run(args: &WaveArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let trace = Chronogram::load(Path::new(&args.trace))?;
    let signals = match &args.group {
        Some(group) => trace.group_signals(group)?,
        None => trace.signals()?,
    };
    print!("{}", render(&signals));
    Ok(0)
}

/// One line per signal: `name : kind [v0, v1, ...]`.
fn render(signals: &[Signal]) -> String {
    signals.iter().map(|s| format!("{s}\n")).collect()
}
