//! Shared setup for all subcommands: logging, configuration and the
//! simulator client.

use std::path::Path;
use std::time::Duration;

use clashtb_config::{ReplConfig, TestbenchConfig};
use clashtb_repl::{ReplClient, ReplOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Installs the global log subscriber.
///
/// The level follows the `-v` count unless `RUST_LOG` is set; `-q` keeps
/// only errors.
pub fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(global.quiet, global.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}

fn default_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Loads `--config` if given, otherwise `clashtb.toml` from the working
/// directory, falling back to defaults when it is absent.
pub fn load_config(global: &GlobalArgs) -> Result<TestbenchConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => clashtb_config::load_config_file(Path::new(path))?,
        None => clashtb_config::load_config_or_default(&std::env::current_dir()?)?,
    };
    debug!(?config, "loaded configuration");
    Ok(config)
}

/// Converts the `[repl]` section into client options.
pub fn repl_options(config: &ReplConfig) -> ReplOptions {
    ReplOptions {
        executable: config.executable.clone(),
        args: config.args.clone(),
        prompt: config.prompt.clone(),
        startup_timeout: Duration::from_secs(config.startup_timeout_secs),
        command_timeout: Duration::from_secs(config.command_timeout_secs),
        clock_domain: config.clock_domain.clone(),
    }
}

/// Starts the simulator described by the configuration.
pub fn start_simulator(
    config: &TestbenchConfig,
    global: &GlobalArgs,
) -> Result<ReplClient, Box<dyn std::error::Error>> {
    if !global.quiet {
        eprintln!("   Starting {}", config.repl.executable);
    }
    Ok(ReplClient::start(repl_options(&config.repl))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: 0,
            color: false,
            config,
        }
    }

    #[test]
    fn levels_follow_verbosity() {
        assert_eq!(default_level(false, 0), "warn");
        assert_eq!(default_level(false, 1), "info");
        assert_eq!(default_level(false, 2), "debug");
        assert_eq!(default_level(false, 9), "trace");
        assert_eq!(default_level(true, 3), "error");
    }

    #[test]
    fn repl_options_from_config() {
        let config = ReplConfig {
            executable: "stack".into(),
            args: vec!["exec".into(), "clashi".into()],
            startup_timeout_secs: 90,
            command_timeout_secs: 5,
            clock_domain: "Dom50".into(),
            ..ReplConfig::default()
        };
        let options = repl_options(&config);
        assert_eq!(options.executable, "stack");
        assert_eq!(options.args, vec!["exec", "clashi"]);
        assert_eq!(options.prompt, "clashi>");
        assert_eq!(options.startup_timeout, Duration::from_secs(90));
        assert_eq!(options.command_timeout, Duration::from_secs(5));
        assert_eq!(options.clock_domain, "Dom50");
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[bench]\nseed = 42\n").unwrap();
        let config = load_config(&global(Some(path.display().to_string()))).unwrap();
        assert_eq!(config.bench.seed, Some(42));
        assert_eq!(config.repl, ReplConfig::default());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(&global(Some(path.display().to_string()))).is_err());
    }
}
