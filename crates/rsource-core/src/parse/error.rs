// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parse diagnostics.
//!
//! Parse errors are collected, never thrown: the parser always returns a
//! (possibly partial) tree plus the full error list, and the caller decides
//! whether to reject, warn, or best-effort-use the result. Errors carry both
//! a byte [`Span`] (for [`miette`] labeled reports) and start/end
//! [`Position`]s (for row/column consumers).

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use crate::location::{Position, Span};
use crate::token::Token;

/// A syntax error recorded during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic()]
pub struct ParseError {
    /// A human-readable description of what went wrong.
    pub message: EcoString,
    /// The byte extent of the offending source.
    #[label("here")]
    pub span: Span,
    /// The row/column position where the error starts.
    pub start: Position,
    /// The row/column position where the error ends.
    pub end: Position,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(
        message: impl Into<EcoString>,
        span: Span,
        start: Position,
        end: Position,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            start,
            end,
        }
    }

    /// Creates a parse error covering `token`.
    #[must_use]
    pub fn at_token(token: &Token, message: impl Into<EcoString>) -> Self {
        Self::new(
            message,
            token.span(),
            token.position(),
            token.end_position(),
        )
    }
}
