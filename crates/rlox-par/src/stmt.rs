//! Statement and declaration parsing, scopes, and local resolution.

use rlox_lex::{Token, TokenKind};
use rlox_runtime::OpCode;

use crate::{Compiler, Local, MAX_LOCALS};

impl<'src, 'ctx> Compiler<'src, 'ctx> {
    pub(crate) fn declaration(&mut self) {
        if self.match_token(TokenKind::Var) {
            self.var_declaration();
        } else {
            self.statement();
        }

        if self.panic_mode {
            self.synchronize();
        }
    }

    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name.");

        if self.match_token(TokenKind::Equal) {
            self.expression();
        } else {
            self.emit_op(OpCode::Nil);
        }
        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        );

        self.define_variable(global);
    }

    /// Consume a variable name. At global scope this returns the index of
    /// the pooled name constant; at local scope the name only exists in the
    /// compiler's local stack and the returned index is unused.
    fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenKind::Identifier, message);

        self.declare_variable();
        if self.scope_depth > 0 {
            return 0;
        }

        self.identifier_constant(self.previous.lexeme)
    }

    /// Register a new local in the current scope. Redeclaring a name that
    /// already exists at this exact depth is an error; shadowing an outer
    /// scope is fine.
    fn declare_variable(&mut self) {
        if self.scope_depth == 0 {
            return;
        }

        let name = self.previous;

        let mut duplicate = false;
        for local in self.locals.iter().rev() {
            if local.depth.is_some_and(|depth| depth < self.scope_depth) {
                break;
            }
            if local.name == name.lexeme {
                duplicate = true;
                break;
            }
        }
        if duplicate {
            self.error("Already a variable with this name in this scope.");
        }

        self.add_local(name);
    }

    fn add_local(&mut self, name: Token<'src>) {
        if self.locals.len() == MAX_LOCALS {
            self.error("Too many local variables in function.");
            return;
        }

        self.locals.push(Local {
            name: name.lexeme,
            depth: None,
        });
    }

    fn define_variable(&mut self, global: u8) {
        if self.scope_depth > 0 {
            self.mark_initialized();
            return;
        }

        self.emit_op(OpCode::DefineGlobal);
        self.emit_byte(global);
    }

    /// The local becomes readable once its initializer has run.
    fn mark_initialized(&mut self) {
        let depth = self.scope_depth;
        if let Some(local) = self.locals.last_mut() {
            local.depth = Some(depth);
        }
    }

    /// Walk the local stack from the top; the nearest declaration shadows
    /// outer ones. The returned slot doubles as the runtime stack index.
    pub(crate) fn resolve_local(&mut self, name: &Token<'_>) -> Option<u8> {
        let found = self
            .locals
            .iter()
            .rposition(|local| local.name == name.lexeme)?;

        if self.locals[found].depth.is_none() {
            self.error("Can't read local variable in its own initializer.");
        }
        Some(found as u8)
    }

    fn statement(&mut self) {
        if self.match_token(TokenKind::Print) {
            self.print_statement();
        } else if self.match_token(TokenKind::If) {
            self.if_statement();
        } else if self.match_token(TokenKind::While) {
            self.while_statement();
        } else if self.match_token(TokenKind::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after value.");
        self.emit_op(OpCode::Print);
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.");
        self.emit_op(OpCode::Pop);
    }

    fn if_statement(&mut self) {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");

        let then_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.statement();

        let else_jump = self.emit_jump(OpCode::Jump);

        self.patch_jump(then_jump);
        self.emit_op(OpCode::Pop);

        if self.match_token(TokenKind::Else) {
            self.statement();
        }
        self.patch_jump(else_jump);
    }

    fn while_statement(&mut self) {
        let loop_start = self.chunk.len();

        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");

        let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.statement();
        self.emit_loop(loop_start);

        self.patch_jump(exit_jump);
        self.emit_op(OpCode::Pop);
    }

    fn block(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.");
    }

    fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Drop every local that belonged to the closed scope: once from the
    /// compile-time stack, and once at runtime via an emitted `POP` per
    /// local.
    fn end_scope(&mut self) {
        self.scope_depth -= 1;

        while self
            .locals
            .last()
            .is_some_and(|local| local.depth.is_some_and(|depth| depth > self.scope_depth))
        {
            self.emit_op(OpCode::Pop);
            self.locals.pop();
        }
    }

    /// After a parse error, skip tokens until a statement boundary: just
    /// past a semicolon, or just before a keyword that starts a statement.
    fn synchronize(&mut self) {
        self.panic_mode = false;

        while self.current.kind != TokenKind::Eof {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }
            match self.current.kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }
            self.advance();
        }
    }
}
