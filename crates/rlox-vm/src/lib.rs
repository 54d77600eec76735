//! rlox-vm - The stack-based bytecode virtual machine.
//!
//! [`Vm::interpret`] runs a source string end to end: compile through
//! [`rlox_par`], then dispatch the resulting chunk. A VM instance owns its
//! value stack, globals table, and string heap, and nothing is shared
//! between instances; keeping one VM alive across inputs (as the REPL does)
//! preserves globals and interned strings between lines.

mod vm;

pub use vm::{InterpretError, Vm};
