//! `clashtb run`: test an entity against a trace file.
//!
//! Reads the `inputs` and `outputs` groups of the trace, runs one session
//! through the configured simulator, prints the PASS/FAIL report, and
//! optionally writes a chronogram of the run.

use std::path::Path;

use clashtb_bench::{BenchError, ReportOptions, Testbench};
use clashtb_config::TestbenchConfig;
use clashtb_repl::Simulator;
use clashtb_wave::Chronogram;

use crate::setup::{load_config, start_simulator};
use crate::{GlobalArgs, RunArgs};

/// Trace group holding the input signals.
const INPUTS_GROUP: &str = "inputs";
/// Trace group holding the expected outputs.
const OUTPUTS_GROUP: &str = "outputs";

/// Runs the `clashtb run` command.
///
/// Returns exit code 0 if every expected output passed, 1 otherwise.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let mut tb = prepare(args, &config)?;

    if !global.quiet {
        eprintln!("    Testing {} ({})", tb.entity(), args.design);
    }
    let mut sim = start_simulator(&config, global)?;
    let options = ReportOptions {
        verbose: config.bench.verbose || global.verbose > 0,
        color: global.color,
    };
    let passed = execute(&mut tb, &mut sim, args, options, global.quiet)?;
    sim.terminate();

    Ok(if passed { 0 } else { 1 })
}

/// Builds the session from the trace file and run options.
fn prepare(args: &RunArgs, config: &TestbenchConfig) -> Result<Testbench, Box<dyn std::error::Error>> {
    let design = Path::new(&args.design);
    if !design.exists() {
        return Err(BenchError::MissingDesign(design.to_path_buf()).into());
    }

    let trace = Chronogram::load(Path::new(&args.trace))?;
    let mut tb = Testbench::new(design, args.entity.as_str());
    if let Some(seed) = args.seed.or(config.bench.seed) {
        tb = tb.with_seed(seed);
    }
    tb.set_inputs(trace.group_signals(INPUTS_GROUP)?)?;
    tb.set_expected_outputs(trace.group_signals(OUTPUTS_GROUP)?)?;
    if !args.outputs.is_empty() {
        tb.set_actual_output_names(args.outputs.iter().cloned());
    }
    tb.set_single_value(args.single_value);
    Ok(tb)
}

/// Runs a prepared session, prints its report and saves the chronogram.
fn execute(
    tb: &mut Testbench,
    sim: &mut impl Simulator,
    args: &RunArgs,
    options: ReportOptions,
    quiet: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let passed = tb.run(sim)?;
    if !quiet {
        print!("{}", tb.report(options)?);
    }
    if let Some(save) = &args.save {
        tb.chronogram()?.save(Path::new(save))?;
        if !quiet {
            eprintln!("      Wrote {save}");
        }
    }
    Ok(passed)
}
