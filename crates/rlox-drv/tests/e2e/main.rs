//! End-to-end tests driving the `rlox` binary.

use std::path::PathBuf;

mod cli_tests;
mod scenario_tests;

/// Path to the compiled `rlox` binary.
pub fn rlox_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rlox"))
}
