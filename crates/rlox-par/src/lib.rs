//! rlox-par - Single-pass Pratt parser and bytecode compiler.
//!
//! There is no syntax tree. The compiler pulls tokens from the scanner and
//! writes bytecode into a [`Chunk`] as it recognizes each construct, in one
//! left-to-right pass:
//!
//! - expressions go through a precedence-driven Pratt loop
//!   ([`precedence`] holds the rule table)
//! - statements and declarations drive the expression parser and add
//!   control flow via patched jumps
//! - local variables are resolved at compile time to stack slots; anything
//!   unresolved compiles to a global access by interned name
//!
//! Errors are collected into a [`Handler`]; after the first error the
//! compiler enters panic mode and swallows further errors until the next
//! statement boundary, so one mistake reports once.

mod expr;
mod precedence;
mod stmt;

use rlox_lex::{Scanner, Token, TokenKind};
use rlox_runtime::{Chunk, Heap, OpCode, Value};
use rlox_util::{Diagnostic, Handler, Location};

/// Maximum number of locals in scope at once (8-bit slot operand).
const MAX_LOCALS: usize = u8::MAX as usize + 1;

/// Maximum forward or backward jump distance (16-bit operand).
const MAX_JUMP: usize = u16::MAX as usize;

/// Compile `source` into a chunk of bytecode.
///
/// String literals and identifier names are interned into `heap` at compile
/// time, so the chunk's constants share storage with the VM that will run
/// it. Errors are reported through `handler`; the whole input is still
/// consumed after an error (to report everything in one pass), but no chunk
/// is handed out.
pub fn compile(source: &str, heap: &mut Heap, handler: &Handler) -> Option<Chunk> {
    let mut compiler = Compiler::new(source, heap, handler);
    compiler.advance();
    while !compiler.match_token(TokenKind::Eof) {
        compiler.declaration();
    }
    compiler.finish()
}

/// A local variable tracked at compile time.
struct Local<'src> {
    name: &'src str,
    /// Scope depth, or `None` between declaration and the end of the
    /// initializer. Reading a `None` local is the self-initialization error.
    depth: Option<usize>,
}

/// State for compiling one source buffer.
struct Compiler<'src, 'ctx> {
    scanner: Scanner<'src>,
    current: Token<'src>,
    previous: Token<'src>,

    chunk: Chunk,
    heap: &'ctx mut Heap,
    handler: &'ctx Handler,

    locals: Vec<Local<'src>>,
    scope_depth: usize,

    had_error: bool,
    panic_mode: bool,
}

impl<'src, 'ctx> Compiler<'src, 'ctx> {
    fn new(source: &'src str, heap: &'ctx mut Heap, handler: &'ctx Handler) -> Self {
        let placeholder = Token {
            kind: TokenKind::Eof,
            lexeme: "",
            line: 1,
        };
        Self {
            scanner: Scanner::new(source),
            current: placeholder,
            previous: placeholder,
            chunk: Chunk::new(),
            heap,
            handler,
            locals: Vec::new(),
            scope_depth: 0,
            had_error: false,
            panic_mode: false,
        }
    }

    fn finish(mut self) -> Option<Chunk> {
        self.emit_op(OpCode::Return);
        if self.had_error {
            None
        } else {
            Some(self.chunk)
        }
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    /// Step to the next real token, reporting any error tokens in between.
    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.next_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    // ------------------------------------------------------------------
    // Error reporting
    // ------------------------------------------------------------------

    fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        let location = match token.kind {
            TokenKind::Eof => Location::End,
            // Error tokens carry a message, not source text.
            TokenKind::Error => Location::Unspecified,
            _ => Location::Lexeme(token.lexeme.to_string()),
        };
        self.handler
            .emit(Diagnostic::error(token.line, location, message));
    }

    // ------------------------------------------------------------------
    // Bytecode emission
    // ------------------------------------------------------------------

    fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line;
        self.chunk.write(byte, line);
    }

    fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op.into());
    }

    fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        match self.chunk.add_constant(value) {
            Ok(index) => index,
            Err(_) => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op(OpCode::Constant);
        self.emit_byte(index);
    }

    /// Intern `name` and pool it as a constant for the global-variable ops.
    fn identifier_constant(&mut self, name: &str) -> u8 {
        let obj = self.heap.intern(name);
        self.make_constant(Value::Obj(obj))
    }

    /// Emit a jump with a 2-byte placeholder operand and return the
    /// placeholder's offset for [`Compiler::patch_jump`].
    fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit_op(op);
        self.emit_byte(0xff);
        self.emit_byte(0xff);
        self.chunk.len() - 2
    }

    /// Backfill a placeholder with the distance from the byte after the
    /// operand to the current end of the chunk.
    fn patch_jump(&mut self, offset: usize) {
        let distance = self.chunk.len() - offset - 2;
        if distance > MAX_JUMP {
            self.error("Too much code to jump over.");
        }

        let bytes = (distance as u16).to_be_bytes();
        self.chunk.patch(offset, bytes[0]);
        self.chunk.patch(offset + 1, bytes[1]);
    }

    /// Emit a backward jump to `loop_start`.
    fn emit_loop(&mut self, loop_start: usize) {
        self.emit_op(OpCode::Loop);

        // +2 skips the operand the VM will have read.
        let distance = self.chunk.len() - loop_start + 2;
        if distance > MAX_JUMP {
            self.error("Loop body too large.");
        }

        let bytes = (distance as u16).to_be_bytes();
        self.emit_byte(bytes[0]);
        self.emit_byte(bytes[1]);
    }
}
