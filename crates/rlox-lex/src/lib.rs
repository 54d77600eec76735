//! rlox-lex - Lexical analysis for Lox source code.
//!
//! The scanner turns a borrowed source buffer into a stream of tokens
//! produced on demand. Tokens hold slices into that buffer, so the buffer
//! must outlive every token taken from it.

pub mod cursor;
mod edge_cases;
pub mod scanner;
pub mod token;

pub use cursor::Cursor;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
