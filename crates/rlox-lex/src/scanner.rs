//! The scanner: source text to tokens, on demand.

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Token, TokenKind};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scanner for Lox source code.
///
/// Tokens are produced one at a time by [`Scanner::next_token`]; after the
/// input is exhausted every further call yields [`TokenKind::Eof`]. Lexical
/// errors are reported in-band as [`TokenKind::Error`] tokens whose lexeme
/// is the message.
pub struct Scanner<'src> {
    cursor: Cursor<'src>,

    /// Byte offset where the current token started.
    token_start: usize,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner over `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
        }
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();

        if self.cursor.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            ',' => self.make_token(TokenKind::Comma),
            '.' => self.make_token(TokenKind::Dot),
            '-' => self.make_token(TokenKind::Minus),
            '+' => self.make_token(TokenKind::Plus),
            ';' => self.make_token(TokenKind::Semicolon),
            '/' => self.make_token(TokenKind::Slash),
            '*' => self.make_token(TokenKind::Star),
            '!' => self.two_char_token('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.two_char_token('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.two_char_token('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.two_char_token('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_ident_start(c) => self.scan_identifier(),
            _ => self.error_token("Unexpected character."),
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token {
            kind,
            lexeme: self.cursor.slice_from(self.token_start),
            line: self.cursor.line(),
        }
    }

    fn error_token(&self, message: &'static str) -> Token<'src> {
        Token {
            kind: TokenKind::Error,
            lexeme: message,
            line: self.cursor.line(),
        }
    }

    fn two_char_token(
        &mut self,
        second: char,
        matched: TokenKind,
        unmatched: TokenKind,
    ) -> Token<'src> {
        let kind = if self.cursor.matches(second) {
            matched
        } else {
            unmatched
        };
        self.make_token(kind)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\r' | '\t' | '\n' => self.cursor.advance(),
                '/' if self.cursor.char_at(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// A string literal runs to the closing quote; newlines inside it are
    /// legal and counted. The lexeme keeps the surrounding quotes.
    fn scan_string(&mut self) -> Token<'src> {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            return self.error_token("Unterminated string.");
        }

        self.cursor.advance();
        self.make_token(TokenKind::String)
    }

    /// One or more digits with an optional `.` followed by one or more
    /// digits. No exponents.
    fn scan_number(&mut self) -> Token<'src> {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.char_at(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        self.make_token(TokenKind::Number)
    }

    fn scan_identifier(&mut self) -> Token<'src> {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        self.make_token(keyword_from_ident(text).unwrap_or(TokenKind::Identifier))
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(source: &str) -> Vec<Token<'_>> {
        Scanner::new(source).collect()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan_all(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_is_eof() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
        // Eof repeats forever.
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_single_character_tokens() {
        assert_eq!(
            kinds("(){},.-+;/*"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Slash,
                TokenKind::Star,
            ]
        );
    }

    #[test]
    fn test_operators_with_equals_lookahead() {
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ]
        );
    }

    #[test]
    fn test_number_lexemes() {
        let tokens = scan_all("123 45.6 7.");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "123");
        assert_eq!(tokens[1].lexeme, "45.6");
        // A trailing dot is not part of the number.
        assert_eq!(tokens[2].lexeme, "7");
        assert_eq!(tokens[3].kind, TokenKind::Dot);
    }

    #[test]
    fn test_string_lexeme_keeps_quotes() {
        let tokens = scan_all("\"hello\"");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "\"hello\"");
    }

    #[test]
    fn test_multiline_string_counts_lines() {
        let tokens = scan_all("\"a\nb\" x");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = scan_all("\"oops");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "Unterminated string.");
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            kinds("var foo while whilex"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::While,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_underscore_identifiers() {
        let tokens = scan_all("_private _0");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "_private");
        assert_eq!(tokens[1].lexeme, "_0");
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("1 // comment to end of line\n2"),
            vec![TokenKind::Number, TokenKind::Number]
        );
    }

    #[test]
    fn test_comment_at_eof_without_newline() {
        assert_eq!(kinds("// nothing after"), vec![]);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = scan_all("1\n2\n\n3");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_unexpected_character() {
        let tokens = scan_all("@");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "Unexpected character.");
    }

    #[test]
    fn test_slash_is_not_comment() {
        assert_eq!(
            kinds("8 / 2"),
            vec![TokenKind::Number, TokenKind::Slash, TokenKind::Number]
        );
    }
}
