//! Chunk disassembler.
//!
//! A read-only observer over [`Chunk`]: it renders each instruction with
//! its byte offset and source line, and never mutates what it inspects.
//! The driver exposes it behind `--print-code`; the VM reuses
//! [`disassemble_instruction`] for execution tracing.

use std::fmt::Write;

use crate::chunk::{Chunk, OpCode};

/// Render a whole chunk, one instruction per line, under a `== name ==`
/// header.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {name} ==");

    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut out);
    }
    out
}

/// Render the instruction at `offset` and return the offset of the next
/// instruction. A line marker of `|` means "same source line as the
/// previous instruction".
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{offset:04} ");
    if offset > 0 && chunk.line(offset) == chunk.line(offset - 1) {
        let _ = write!(out, "   | ");
    } else {
        let _ = write!(out, "{:4} ", chunk.line(offset));
    }

    let byte = chunk.byte(offset);
    let Ok(op) = OpCode::try_from(byte) else {
        let _ = writeln!(out, "Unknown opcode {byte}");
        return offset + 1;
    };

    match op {
        OpCode::Constant | OpCode::GetGlobal | OpCode::DefineGlobal | OpCode::SetGlobal => {
            constant_instruction(op_name(op), chunk, offset, out)
        }
        OpCode::GetLocal | OpCode::SetLocal => byte_instruction(op_name(op), chunk, offset, out),
        OpCode::Jump | OpCode::JumpIfFalse => jump_instruction(op_name(op), 1, chunk, offset, out),
        OpCode::Loop => jump_instruction(op_name(op), -1, chunk, offset, out),
        _ => simple_instruction(op_name(op), offset, out),
    }
}

fn op_name(op: OpCode) -> &'static str {
    match op {
        OpCode::Constant => "OP_CONSTANT",
        OpCode::Nil => "OP_NIL",
        OpCode::True => "OP_TRUE",
        OpCode::False => "OP_FALSE",
        OpCode::Pop => "OP_POP",
        OpCode::GetLocal => "OP_GET_LOCAL",
        OpCode::SetLocal => "OP_SET_LOCAL",
        OpCode::GetGlobal => "OP_GET_GLOBAL",
        OpCode::DefineGlobal => "OP_DEFINE_GLOBAL",
        OpCode::SetGlobal => "OP_SET_GLOBAL",
        OpCode::Equal => "OP_EQUAL",
        OpCode::Greater => "OP_GREATER",
        OpCode::Less => "OP_LESS",
        OpCode::Add => "OP_ADD",
        OpCode::Subtract => "OP_SUBTRACT",
        OpCode::Multiply => "OP_MULTIPLY",
        OpCode::Divide => "OP_DIVIDE",
        OpCode::Not => "OP_NOT",
        OpCode::Negate => "OP_NEGATE",
        OpCode::Print => "OP_PRINT",
        OpCode::Jump => "OP_JUMP",
        OpCode::JumpIfFalse => "OP_JUMP_IF_FALSE",
        OpCode::Loop => "OP_LOOP",
        OpCode::Return => "OP_RETURN",
    }
}

fn simple_instruction(name: &str, offset: usize, out: &mut String) -> usize {
    let _ = writeln!(out, "{name}");
    offset + 1
}

fn constant_instruction(name: &str, chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let index = chunk.byte(offset + 1);
    let _ = writeln!(out, "{name:<16} {index:4} {:?}", chunk.constant(index));
    offset + 2
}

fn byte_instruction(name: &str, chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let slot = chunk.byte(offset + 1);
    let _ = writeln!(out, "{name:<16} {slot:4}");
    offset + 2
}

fn jump_instruction(name: &str, sign: i64, chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let jump = u16::from_be_bytes([chunk.byte(offset + 1), chunk.byte(offset + 2)]);
    let target = offset as i64 + 3 + sign * i64::from(jump);
    let _ = writeln!(out, "{name:<16} {offset:4} -> {target}");
    offset + 3
}
