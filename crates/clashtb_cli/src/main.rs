//! clashtb CLI: test Clash designs against waveform traces.
//!
//! Provides `clashtb run` for checking an entity against a trace file,
//! `clashtb wave` for printing the signals of a trace, and `clashtb eval`
//! for evaluating a function once.

#![warn(missing_docs)]

mod eval;
mod run;
mod setup;
mod wave;

use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// clashtb: a waveform-driven test harness for Clash designs.
#[derive(Parser, Debug)]
#[command(name = "clashtb", version, about = "Clash testbench")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `clashtb.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an entity against the inputs and expected outputs of a trace.
    Run(RunArgs),
    /// Print the signals of a trace file.
    Wave(WaveArgs),
    /// Evaluate a function once with literal arguments.
    Eval(EvalArgs),
}

/// Arguments for the `clashtb run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Design source file.
    pub design: String,

    /// Entity to test.
    pub entity: String,

    /// Trace file with `inputs` and `outputs` groups.
    #[arg(short, long)]
    pub trace: String,

    /// Write a chronogram of the run to this file.
    #[arg(short, long)]
    pub save: Option<String>,

    /// Name every produced output (in order).
    #[arg(long, num_args = 1..)]
    pub outputs: Vec<String>,

    /// Seed for the random values that replace unknown inputs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Treat each step of a single output as one value.
    #[arg(long)]
    pub single_value: bool,
}

/// Arguments for the `clashtb wave` subcommand.
#[derive(Parser, Debug)]
pub struct WaveArgs {
    /// Trace file.
    pub trace: String,

    /// Only print the signals of this group.
    #[arg(short, long)]
    pub group: Option<String>,
}

/// Arguments for the `clashtb eval` subcommand.
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Design source file.
    pub design: String,

    /// Function to evaluate.
    pub function: String,

    /// Literal arguments.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    setup::init_logging(&global);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Wave(ref args) => wave::run(args, &global),
        Command::Eval(ref args) => eval::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn is_terminal() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run() {
        let cli = Cli::parse_from([
            "clashtb",
            "run",
            "Fsm.hs",
            "topEntity",
            "--trace",
            "fsm.json",
        ]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.design, "Fsm.hs");
                assert_eq!(args.entity, "topEntity");
                assert_eq!(args.trace, "fsm.json");
                assert!(args.save.is_none());
                assert!(args.outputs.is_empty());
                assert!(args.seed.is_none());
                assert!(!args.single_value);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_run_with_options() {
        let cli = Cli::parse_from([
            "clashtb",
            "run",
            "Fsm.hs",
            "topEntity",
            "-t",
            "fsm.json",
            "--save",
            "out.json",
            "--seed",
            "7",
            "--outputs",
            "state",
            "busy",
        ]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.save.as_deref(), Some("out.json"));
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.outputs, vec!["state", "busy"]);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn run_requires_trace() {
        assert!(Cli::try_parse_from(["clashtb", "run", "Fsm.hs", "topEntity"]).is_err());
    }

    #[test]
    fn parse_wave() {
        let cli = Cli::parse_from(["clashtb", "wave", "fsm.json", "--group", "inputs"]);
        match cli.command {
            Command::Wave(ref args) => {
                assert_eq!(args.trace, "fsm.json");
                assert_eq!(args.group.as_deref(), Some("inputs"));
            }
            _ => panic!("expected Wave command"),
        }
    }

    #[test]
    fn parse_eval_with_negative_args() {
        let cli = Cli::parse_from(["clashtb", "eval", "Add.hs", "add", "1", "-2"]);
        match cli.command {
            Command::Eval(ref args) => {
                assert_eq!(args.function, "add");
                assert_eq!(args.args, vec!["1", "-2"]);
            }
            _ => panic!("expected Eval command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["clashtb", "--quiet", "--color", "never", "wave", "a.json"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::parse_from(["clashtb", "-vv", "wave", "a.json"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["clashtb", "--config", "/path/to/clashtb.toml", "wave", "a.json"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/clashtb.toml"));
    }
}
