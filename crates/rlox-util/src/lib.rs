//! rlox-util - Shared interpreter infrastructure.
//!
//! This crate provides the diagnostic types used by the compiler front end
//! to collect and format errors before they are reported to the user.

pub mod diagnostic;

pub use diagnostic::{Diagnostic, Handler, Level, Location};
