//! rlox - command-line front end for the Lox interpreter.
//!
//! Runs a script when given a path, or an interactive REPL when run with
//! no arguments. Exit codes follow the BSD sysexits conventions: 65 for
//! compile errors, 70 for runtime errors, 74 for I/O errors, 64 for usage
//! errors.

mod config;
mod error;
mod repl;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use error::{DriverError, Result};
use rlox_vm::Vm;

/// A bytecode interpreter for the Lox language.
#[derive(Parser, Debug)]
#[command(name = "rlox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A bytecode interpreter for the Lox language", long_about = None)]
struct Cli {
    /// Script to run; omit to start the REPL
    #[arg(value_name = "SCRIPT")]
    script: Vec<PathBuf>,

    /// Disassemble each chunk to stderr before running it
    #[arg(long, env = "RLOX_PRINT_CODE")]
    print_code: bool,

    /// Trace every VM instruction as it executes
    #[arg(long, env = "RLOX_TRACE")]
    trace: bool,

    /// Enable verbose driver logging
    #[arg(short, long, env = "RLOX_VERBOSE")]
    verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "RLOX_CONFIG")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        match &error {
            // Interpreter diagnostics were already reported line by line.
            DriverError::Interpret(_) => {}
            DriverError::Usage => eprintln!("{error}"),
            _ => eprintln!("error: {error}"),
        }
        std::process::exit(error.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let print_code = cli.print_code || config.print_code;
    let trace = cli.trace || config.trace_execution;

    init_tracing(cli.verbose, trace);

    let mut vm = Vm::new();
    vm.set_print_code(print_code);
    vm.set_trace_execution(trace);

    match cli.script.as_slice() {
        [] => repl::run(&mut vm),
        [path] => run_file(&mut vm, path),
        _ => Err(DriverError::Usage),
    }
}

fn run_file(vm: &mut Vm, path: &Path) -> Result<()> {
    debug!(path = %path.display(), "running script");

    let source = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    vm.interpret(&source)?;
    Ok(())
}

/// Route logs to stderr. `RLOX_LOG` overrides the defaults; `--trace`
/// enables the VM's per-instruction events.
fn init_tracing(verbose: bool, trace: bool) {
    let default_directives = if trace {
        "warn,rlox_vm=trace"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("RLOX_LOG").unwrap_or_else(|_| EnvFilter::new(default_directives));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
