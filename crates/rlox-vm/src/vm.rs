//! The dispatch loop and its supporting state.

use std::io::{self, Write};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

use rlox_runtime::{debug, Chunk, Heap, OpCode, Value};
use rlox_util::Handler;

/// Why an interpretation did not finish.
///
/// Compile errors have already been reported to stderr, one line per
/// diagnostic; runtime errors have printed the message and the offending
/// source line.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("compile error")]
    Compile,
    #[error("runtime error")]
    Runtime,
}

/// A Lox virtual machine.
pub struct Vm {
    /// Object heap and string intern table. The compiler interns literals
    /// and names into this same heap, so constant-pool strings and runtime
    /// strings compare by identity.
    heap: Heap,
    globals: FxHashMap<Rc<str>, Value>,
    stack: Vec<Value>,
    trace_execution: bool,
    print_code: bool,
    /// Sink for `print` output. User-visible errors always go to stderr.
    out: Box<dyn Write>,
}

impl Vm {
    /// A VM that prints to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// A VM that writes `print` output to `out` instead of stdout.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            heap: Heap::new(),
            globals: FxHashMap::default(),
            stack: Vec::new(),
            trace_execution: false,
            print_code: false,
            out,
        }
    }

    /// Disassemble each compiled chunk to stderr before running it.
    pub fn set_print_code(&mut self, enabled: bool) {
        self.print_code = enabled;
    }

    /// Emit a `trace` event per dispatched instruction, carrying the
    /// rendered instruction and the current stack.
    pub fn set_trace_execution(&mut self, enabled: bool) {
        self.trace_execution = enabled;
    }

    /// Compile and run one source buffer.
    pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
        let handler = Handler::new();
        let Some(chunk) = rlox_par::compile(source, &mut self.heap, &handler) else {
            for diagnostic in handler.diagnostics() {
                eprintln!("{diagnostic}");
            }
            return Err(InterpretError::Compile);
        };

        if self.print_code {
            eprint!("{}", debug::disassemble_chunk(&chunk, "script"));
        }

        self.run(&chunk)
    }

    fn run(&mut self, chunk: &Chunk) -> Result<(), InterpretError> {
        let mut ip = 0usize;

        loop {
            if self.trace_execution {
                let mut text = String::new();
                debug::disassemble_instruction(chunk, ip, &mut text);
                trace!(stack = ?self.stack, "{}", text.trim_end());
            }

            let byte = chunk.byte(ip);
            ip += 1;

            let Ok(op) = OpCode::try_from(byte) else {
                let message = format!("Unknown opcode {byte}.");
                return Err(self.runtime_error(chunk, ip, &message));
            };

            match op {
                OpCode::Constant => {
                    let index = chunk.byte(ip);
                    ip += 1;
                    let value = chunk.constant(index).clone();
                    self.push(value);
                }
                OpCode::Nil => self.push(Value::Nil),
                OpCode::True => self.push(Value::Bool(true)),
                OpCode::False => self.push(Value::Bool(false)),
                OpCode::Pop => {
                    self.pop();
                }
                OpCode::GetLocal => {
                    let slot = chunk.byte(ip) as usize;
                    ip += 1;
                    let value = self.stack[slot].clone();
                    self.push(value);
                }
                OpCode::SetLocal => {
                    let slot = chunk.byte(ip) as usize;
                    ip += 1;
                    self.stack[slot] = self.peek(0).clone();
                }
                OpCode::GetGlobal => {
                    let index = chunk.byte(ip);
                    ip += 1;
                    let Some(name) = global_name(chunk, index) else {
                        return Err(self.runtime_error(chunk, ip, "Global name must be a string."));
                    };
                    let value = match self.globals.get(&name) {
                        Some(value) => value.clone(),
                        None => {
                            let message = format!("Undefined variable '{name}'.");
                            return Err(self.runtime_error(chunk, ip, &message));
                        }
                    };
                    self.push(value);
                }
                OpCode::DefineGlobal => {
                    let index = chunk.byte(ip);
                    ip += 1;
                    let Some(name) = global_name(chunk, index) else {
                        return Err(self.runtime_error(chunk, ip, "Global name must be a string."));
                    };
                    let value = self.pop();
                    self.globals.insert(name, value);
                }
                OpCode::SetGlobal => {
                    let index = chunk.byte(ip);
                    ip += 1;
                    let Some(name) = global_name(chunk, index) else {
                        return Err(self.runtime_error(chunk, ip, "Global name must be a string."));
                    };
                    if !self.globals.contains_key(&name) {
                        let message = format!("Undefined variable '{name}'.");
                        return Err(self.runtime_error(chunk, ip, &message));
                    }
                    // Assignment is an expression; the value stays put.
                    let value = self.peek(0).clone();
                    self.globals.insert(name, value);
                }
                OpCode::Equal => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(Value::Bool(a == b));
                }
                OpCode::Greater => self.binary_number_op(chunk, ip, |a, b| Value::Bool(a > b))?,
                OpCode::Less => self.binary_number_op(chunk, ip, |a, b| Value::Bool(a < b))?,
                OpCode::Add => {
                    if self.peek(0).is_string() && self.peek(1).is_string() {
                        let b = self.pop();
                        let a = self.pop();
                        if let (Value::Obj(lhs), Value::Obj(rhs)) = (&a, &b) {
                            let joined = self.heap.concat(lhs.as_ref(), rhs.as_ref());
                            self.push(Value::Obj(joined));
                        }
                    } else if self.peek(0).is_number() && self.peek(1).is_number() {
                        let b = self.pop();
                        let a = self.pop();
                        if let (Some(a), Some(b)) = (a.as_number(), b.as_number()) {
                            self.push(Value::Number(a + b));
                        }
                    } else {
                        return Err(self.runtime_error(
                            chunk,
                            ip,
                            "Operands must be two numbers or two strings.",
                        ));
                    }
                }
                OpCode::Subtract => {
                    self.binary_number_op(chunk, ip, |a, b| Value::Number(a - b))?
                }
                OpCode::Multiply => {
                    self.binary_number_op(chunk, ip, |a, b| Value::Number(a * b))?
                }
                OpCode::Divide => self.binary_number_op(chunk, ip, |a, b| Value::Number(a / b))?,
                OpCode::Not => {
                    let value = self.pop();
                    self.push(Value::Bool(value.is_falsey()));
                }
                OpCode::Negate => {
                    let Some(n) = self.peek(0).as_number() else {
                        return Err(self.runtime_error(chunk, ip, "Operand must be a number."));
                    };
                    self.pop();
                    self.push(Value::Number(-n));
                }
                OpCode::Print => {
                    let value = self.pop();
                    let _ = writeln!(self.out, "{value}");
                }
                OpCode::Jump => {
                    let offset = read_u16(chunk, ip);
                    ip += 2;
                    ip += offset;
                }
                OpCode::JumpIfFalse => {
                    let offset = read_u16(chunk, ip);
                    ip += 2;
                    // The condition stays on the stack; the compiler pairs
                    // this op with an explicit POP on both paths.
                    if self.peek(0).is_falsey() {
                        ip += offset;
                    }
                }
                OpCode::Loop => {
                    let offset = read_u16(chunk, ip);
                    ip += 2;
                    ip -= offset;
                }
                OpCode::Return => return Ok(()),
            }
        }
    }

    /// Numeric binary op: type-check both operands before touching the
    /// stack, so a failed check leaves the stack exactly as it was.
    fn binary_number_op(
        &mut self,
        chunk: &Chunk,
        ip: usize,
        op: fn(f64, f64) -> Value,
    ) -> Result<(), InterpretError> {
        if self.peek(0).as_number().is_none() || self.peek(1).as_number().is_none() {
            return Err(self.runtime_error(chunk, ip, "Operands must be numbers."));
        }

        let b = self.pop();
        let a = self.pop();
        if let (Some(a), Some(b)) = (a.as_number(), b.as_number()) {
            self.push(op(a, b));
        }
        Ok(())
    }

    /// Report a runtime error against the op that was just read, clear the
    /// stack, and produce the error value the dispatch loop returns.
    fn runtime_error(&mut self, chunk: &Chunk, ip: usize, message: &str) -> InterpretError {
        eprintln!("{message}");
        eprintln!("[line {}] in script", chunk.line(ip - 1));
        self.stack.clear();
        InterpretError::Runtime
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Value {
        self.stack.pop().expect("value stack underflow")
    }

    fn peek(&self, distance: usize) -> &Value {
        &self.stack[self.stack.len() - 1 - distance]
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

fn read_u16(chunk: &Chunk, ip: usize) -> usize {
    u16::from_be_bytes([chunk.byte(ip), chunk.byte(ip + 1)]) as usize
}

/// The interned name pooled for a global-variable op.
fn global_name(chunk: &Chunk, index: u8) -> Option<Rc<str>> {
    chunk
        .constant(index)
        .as_obj()
        .map(|obj| Rc::clone(obj.chars()))
}
