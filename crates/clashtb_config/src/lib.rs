//! Parsing and validation of `clashtb.toml` configuration files.
//!
//! This crate reads the optional testbench configuration file and produces a
//! strongly-typed [`TestbenchConfig`] describing how to start the simulator
//! and how to run and report test sessions.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_file, load_config_from_str, load_config_or_default, CONFIG_FILE_NAME,
};
pub use types::*;
