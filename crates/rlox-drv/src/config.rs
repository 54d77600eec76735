//! Driver configuration.
//!
//! An optional TOML file can pre-set the debug switches so a development
//! setup does not need flags on every run:
//!
//! ```toml
//! print-code = true
//! trace-execution = false
//! ```
//!
//! Command-line flags always win over the file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DriverError, Result};

/// Settings accepted from a configuration file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Disassemble each chunk to stderr before running it.
    pub print_code: bool,

    /// Trace every VM instruction as it executes.
    pub trace_execution: bool,
}

impl Config {
    /// Load the configuration from `path`, or defaults when no path was
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };

        let text = fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&text).map_err(|error| DriverError::Config {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }
}
