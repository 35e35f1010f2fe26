//! Parser infrastructure for the grammar language.
//!
//! The parser produces a lossless concrete syntax tree via Rowan's green tree
//! builder:
//!
//! - Zero-copy lexing: tokens carry spans, text is sliced only when building
//!   tree nodes
//! - Trivia buffering: whitespace/comments are collected, then attached as
//!   leading trivia of the next node
//! - Checkpoint-based wrapping: quantifiers `* + ?` and infix operators wrap
//!   already-built nodes retroactively
//!
//! The parser is resilient and always produces a tree. Unknown tokens get
//! wrapped in `SyntaxKind::Error` nodes and consumed; missing expected tokens
//! emit a diagnostic without consuming, so the parent production can recover.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;

#[cfg(test)]
mod ast_tests;

pub use ast::{Element, Root};
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};
pub use self::core::{ParseResult, Parser};

use lexer::lex;

/// Main entry point. Always returns a tree; parse errors are diagnostics.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source, lex(source)).parse()
}
