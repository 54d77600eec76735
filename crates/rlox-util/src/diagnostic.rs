//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! This module provides types for creating, formatting, and collecting
//! compile-time diagnostics. The compiler pushes diagnostics into a
//! [`Handler`] as it parses; the caller decides when and where to render
//! them (the driver prints them to stderr once compilation finishes).
//!
//! # Examples
//!
//! ```
//! use rlox_util::{Diagnostic, Handler, Location};
//!
//! let handler = Handler::new();
//! handler.emit(Diagnostic::error(1, Location::Lexeme("}".to_string()), "Expect expression."));
//!
//! if handler.has_errors() {
//!     for diagnostic in handler.diagnostics() {
//!         eprintln!("{diagnostic}");
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents the chunk from being handed to the VM.
    Error,
    /// A warning that does not prevent execution.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "Error"),
            Level::Warning => write!(f, "Warning"),
        }
    }
}

/// Where in the token stream a diagnostic points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// The diagnostic refers to a concrete lexeme in the source.
    Lexeme(String),
    /// The diagnostic refers to the end of the input.
    End,
    /// No usable location; the offending token was itself synthetic.
    Unspecified,
}

/// A single diagnostic message with its source line.
///
/// Rendering follows the interpreter's reporting convention:
///
/// ```text
/// [line 2] Error at 'x': Expect ';' after value.
/// [line 7] Error at end: Expect '}' after block.
/// [line 1] Error: Unexpected character.
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic severity level.
    pub level: Level,
    /// Source line the diagnostic refers to (1-based).
    pub line: u32,
    /// Token-stream location.
    pub location: Location,
    /// Main diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, line: u32, location: Location, message: impl Into<String>) -> Self {
        Self {
            level,
            line,
            location,
            message: message.into(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(line: u32, location: Location, message: impl Into<String>) -> Self {
        Self::new(Level::Error, line, location, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(line: u32, location: Location, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, line, location, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {}", self.line, self.level)?;
        match &self.location {
            Location::Lexeme(lexeme) => write!(f, " at '{lexeme}'")?,
            Location::End => write!(f, " at end")?,
            Location::Unspecified => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// Handler for collecting diagnostics during compilation.
///
/// The handler collects diagnostics in emission order and answers count
/// queries. Interior mutability lets several compiler stages share one
/// handler without threading `&mut` through every call.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new, empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check whether any errors have been reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// All collected diagnostics, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Discard every collected diagnostic.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
