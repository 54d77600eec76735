//! Expression parsing.
//!
//! The Pratt loop lives here, together with every prefix and infix action
//! from the rule table. Each action emits bytecode for the construct it
//! just recognized; operands land on the stack in left-to-right source
//! order.

use rlox_lex::{Token, TokenKind};
use rlox_runtime::{OpCode, Value};

use crate::precedence::{rule_for, ParseFn, Precedence};
use crate::Compiler;

impl<'src, 'ctx> Compiler<'src, 'ctx> {
    pub(crate) fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    /// The Pratt core: parse everything that binds at least as tightly as
    /// `min`.
    ///
    /// The previous token's prefix action produces the left-hand side, then
    /// infix actions fold in operators while their binding power stays at
    /// or above `min`. Assignability is decided here once and threaded to
    /// the actions: a variable may only become an assignment target when
    /// the surrounding context parses at assignment level or looser.
    pub(crate) fn parse_precedence(&mut self, min: Precedence) {
        self.advance();

        let Some(prefix) = rule_for(self.previous.kind).prefix else {
            self.error("Expect expression.");
            return;
        };

        let can_assign = min <= Precedence::Assignment;
        self.apply(prefix, can_assign);

        while min <= rule_for(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = rule_for(self.previous.kind).infix {
                self.apply(infix, can_assign);
            }
        }

        if can_assign && self.match_token(TokenKind::Equal) {
            self.error("Invalid assignment target.");
        }
    }

    fn apply(&mut self, action: ParseFn, can_assign: bool) {
        match action {
            ParseFn::Grouping => self.grouping(),
            ParseFn::Unary => self.unary(),
            ParseFn::Binary => self.binary(),
            ParseFn::Number => self.number(),
            ParseFn::String => self.string(),
            ParseFn::Literal => self.literal(),
            ParseFn::Variable => self.variable(can_assign),
            ParseFn::And => self.and_(),
            ParseFn::Or => self.or_(),
        }
    }

    fn number(&mut self) {
        match self.previous.lexeme.parse::<f64>() {
            Ok(value) => self.emit_constant(Value::Number(value)),
            Err(_) => self.error("Invalid number literal."),
        }
    }

    /// Strip the surrounding quotes and intern the contents.
    fn string(&mut self) {
        let lexeme = self.previous.lexeme;
        let contents = &lexeme[1..lexeme.len() - 1];
        let obj = self.heap.intern(contents);
        self.emit_constant(Value::Obj(obj));
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::Nil => self.emit_op(OpCode::Nil),
            TokenKind::True => self.emit_op(OpCode::True),
            // The rule table routes only the three literal keywords here.
            _ => {}
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self) {
        let operator = self.previous.kind;

        self.parse_precedence(Precedence::Unary);

        match operator {
            TokenKind::Minus => self.emit_op(OpCode::Negate),
            TokenKind::Bang => self.emit_op(OpCode::Not),
            _ => {}
        }
    }

    /// The right-hand side parses one level tighter than the operator, so
    /// equal-power operators associate to the left.
    fn binary(&mut self) {
        let operator = self.previous.kind;
        let rule = rule_for(operator);

        self.parse_precedence(rule.precedence.next());

        match operator {
            TokenKind::BangEqual => self.emit_ops(OpCode::Equal, OpCode::Not),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::Less, OpCode::Not),
            TokenKind::Less => self.emit_op(OpCode::Less),
            TokenKind::LessEqual => self.emit_ops(OpCode::Greater, OpCode::Not),
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            _ => {}
        }
    }

    fn variable(&mut self, can_assign: bool) {
        self.named_variable(self.previous, can_assign);
    }

    /// Compile a read of, or assignment to, a named variable. Locals
    /// resolve to stack slots; everything else goes through the globals
    /// table by interned name.
    fn named_variable(&mut self, name: Token<'src>, can_assign: bool) {
        let (get_op, set_op, arg) = match self.resolve_local(&name) {
            Some(slot) => (OpCode::GetLocal, OpCode::SetLocal, slot),
            None => {
                let index = self.identifier_constant(name.lexeme);
                (OpCode::GetGlobal, OpCode::SetGlobal, index)
            }
        };

        if can_assign && self.match_token(TokenKind::Equal) {
            self.expression();
            self.emit_op(set_op);
            self.emit_byte(arg);
        } else {
            self.emit_op(get_op);
            self.emit_byte(arg);
        }
    }

    /// `and` evaluates its right side only when the left is truthy; a
    /// falsey left short-circuits and stays on the stack as the result.
    fn and_(&mut self) {
        let end_jump = self.emit_jump(OpCode::JumpIfFalse);

        self.emit_op(OpCode::Pop);
        self.parse_precedence(Precedence::And);

        self.patch_jump(end_jump);
    }

    /// `or` evaluates its right side only when the left is falsey; a truthy
    /// left jumps over the right and remains as the result.
    fn or_(&mut self) {
        let else_jump = self.emit_jump(OpCode::JumpIfFalse);
        let end_jump = self.emit_jump(OpCode::Jump);

        self.patch_jump(else_jump);
        self.emit_op(OpCode::Pop);

        self.parse_precedence(Precedence::Or);
        self.patch_jump(end_jump);
    }
}
