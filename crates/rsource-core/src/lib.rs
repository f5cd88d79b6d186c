// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer and parser for R source code.
//!
//! This crate turns a source buffer into a flat token stream and a
//! position-annotated syntax tree, for use by editor tooling, linters, and
//! static analyzers:
//!
//! - [`tokenizer`] — maximal-munch lexical scanning with error recovery;
//!   whitespace and comments are preserved in the stream.
//! - [`token_cursor`] — read-only navigation over a lexed token sequence,
//!   including matching-bracket search and position lookup.
//! - [`parse`] — a precedence-climbing expression parser with dedicated
//!   control-flow routines, accumulating structured errors instead of
//!   failing.
//! - [`ast`] — the arena-backed tree the parser produces, with monotone
//!   span widening and parent links stored as indices.
//!
//! Malformed input never fails a pass: the tokenizer tags what it cannot
//! classify as error tokens, and the parser always returns a complete tree
//! alongside every error it found.
//!
//! # Example
//!
//! ```
//! use rsource_core::parse::parse;
//! use rsource_core::token::TokenKind;
//!
//! let source = "x <- f(1, 2)";
//! let result = parse(source);
//! assert!(result.errors().is_empty());
//!
//! let ast = result.ast();
//! let assignment = ast.children(ast.root())[0];
//! assert_eq!(ast.kind(assignment), TokenKind::LeftAssign);
//! assert_eq!(ast.text(assignment, source), source);
//! ```
//!
//! Parsing one buffer is a single synchronous call with no shared state
//! between invocations, so separate buffers may be parsed concurrently on
//! separate threads without synchronization.

pub mod ast;
pub mod location;
pub mod parse;
pub mod token;
pub mod token_cursor;
pub mod tokenizer;

#[cfg(test)]
mod tokenizer_property_tests;

/// Re-export of commonly used types.
pub mod prelude {
    pub use crate::ast::{Ast, NodeId};
    pub use crate::location::{Position, Range, Span};
    pub use crate::parse::{ParseError, ParseResult, ParserOptions, parse, parse_with_options};
    pub use crate::token::{Token, TokenKind};
    pub use crate::token_cursor::TokenCursor;
    pub use crate::tokenizer::{Tokenizer, tokenize, tokenize_with_end};
}
