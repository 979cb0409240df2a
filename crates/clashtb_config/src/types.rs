//! Configuration types deserialized from `clashtb.toml`.

use serde::Deserialize;

/// The top-level testbench configuration.
///
/// Every section and field is optional; an empty file yields the defaults.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestbenchConfig {
    /// How to start and talk to the simulator.
    #[serde(default)]
    pub repl: ReplConfig,
    /// How sessions are run and reported.
    #[serde(default)]
    pub bench: BenchConfig,
}

/// Simulator process settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    /// Program spawned by the protocol client.
    pub executable: String,
    /// Extra program arguments.
    pub args: Vec<String>,
    /// Prompt literal the client synchronizes on.
    pub prompt: String,
    /// Bound on waiting for the first prompt, in seconds.
    pub startup_timeout_secs: u64,
    /// Bound on each command, in seconds.
    pub command_timeout_secs: u64,
    /// Clock domain used in `sampleN @<domain>`.
    pub clock_domain: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            executable: "clashi".to_string(),
            args: Vec::new(),
            prompt: "clashi>".to_string(),
            startup_timeout_secs: 60,
            command_timeout_secs: 20,
            clock_domain: "System".to_string(),
        }
    }
}

/// Session and report settings.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Print expected/actual traces for passing signals too.
    pub verbose: bool,
    /// Seed for the random values that replace unknown input samples.
    pub seed: Option<u64>,
}
