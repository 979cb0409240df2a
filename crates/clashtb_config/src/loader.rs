//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TestbenchConfig;
use std::path::Path;

/// The configuration file name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "clashtb.toml";

/// Loads and validates `clashtb.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<TestbenchConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<TestbenchConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `clashtb.toml` from a project directory, or returns the defaults
/// when the directory has none.
pub fn load_config_or_default(project_dir: &Path) -> Result<TestbenchConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        load_config_file(&path)
    } else {
        Ok(TestbenchConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TestbenchConfig, ConfigError> {
    let config: TestbenchConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are non-empty and timeouts are positive.
fn validate_config(config: &TestbenchConfig) -> Result<(), ConfigError> {
    let repl = &config.repl;
    for (field, value) in [
        ("repl.executable", &repl.executable),
        ("repl.prompt", &repl.prompt),
        ("repl.clock_domain", &repl.clock_domain),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }
    for (field, value) in [
        ("repl.startup_timeout_secs", repl.startup_timeout_secs),
        ("repl.command_timeout_secs", repl.command_timeout_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{field} must be positive"
            )));
        }
    }
    Ok(())
}
