//! Shared types for Scheem.
//!
//! This crate defines the expression tree produced by the parser and
//! consumed by the evaluator, source spans, and the syntax error types
//! shared by the lexer and parser.

mod error;
mod span;
pub mod ast;

pub use error::{ErrorCategory, ErrorCode, SyntaxError, SyntaxErrors, MAX_ERRORS};
pub use span::{SourceFile, Span};
