//! Driver error type and process exit codes.

use std::path::PathBuf;

use thiserror::Error;

use rlox_vm::InterpretError;

/// Result type alias used throughout the driver.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Everything that can end a driver run early.
#[derive(Debug, Error)]
pub enum DriverError {
    /// More than one script path on the command line.
    #[error("Usage: rlox [script]")]
    Usage,

    /// A file could not be read.
    #[error("could not read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file did not parse.
    #[error("invalid configuration in {}: {}", .path.display(), .message)]
    Config { path: PathBuf, message: String },

    /// Compilation or execution failed; the details are already on stderr.
    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

impl DriverError {
    /// Process exit code, following the BSD sysexits conventions:
    /// EX_USAGE, EX_DATAERR, EX_SOFTWARE, EX_IOERR, EX_CONFIG.
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Usage => 64,
            DriverError::Interpret(InterpretError::Compile) => 65,
            DriverError::Interpret(InterpretError::Runtime) => 70,
            DriverError::Io { .. } => 74,
            DriverError::Config { .. } => 78,
        }
    }
}
