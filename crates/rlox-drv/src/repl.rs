//! The interactive prompt.
//!
//! One VM lives for the whole session, so globals and interned strings
//! carry over from line to line. Interpreter errors are reported and the
//! prompt comes back; only I/O failures end the loop early.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rlox_vm::Vm;

use crate::error::{DriverError, Result};

/// Read-eval-print until end of input.
pub fn run(vm: &mut Vm) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(stdio_error)?;

        line.clear();
        let read = input.read_line(&mut line).map_err(stdio_error)?;
        if read == 0 {
            // End of input: finish the prompt line and leave cleanly.
            println!();
            return Ok(());
        }

        // Errors were reported; the next line gets a fresh start.
        let _ = vm.interpret(&line);
    }
}

fn stdio_error(source: io::Error) -> DriverError {
    DriverError::Io {
        path: PathBuf::from("<stdin>"),
        source,
    }
}
