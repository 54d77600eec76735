//! rlox-runtime - The bytecode and value model shared by compiler and VM.
//!
//! This crate holds everything both ends of the pipeline agree on:
//!
//! - [`Value`] - the dynamically typed value representation
//! - [`Obj`] and [`Heap`] - heap objects and the per-VM string intern table
//! - [`Chunk`] and [`OpCode`] - bytecode with its constant pool and line table
//! - [`debug`] - a disassembler over chunks, used for `--print-code` and
//!   execution tracing

pub mod chunk;
pub mod debug;
pub mod object;
pub mod value;

pub use chunk::{Chunk, ChunkError, OpCode, MAX_CONSTANTS};
pub use object::{Heap, Obj};
pub use value::Value;
