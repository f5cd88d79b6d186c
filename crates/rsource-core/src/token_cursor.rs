// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Read-only navigation over a lexed token stream.
//!
//! [`TokenCursor`] walks a fixed token slice without mutating it: stepping
//! forward and backward, skipping insignificant tokens (whitespace and
//! comments), locating the token at a row/column position by binary search,
//! and finding the matching bracket for a bracket token. Both the parser's
//! consumers and external diagnostics use it to move around a finished
//! token sequence.
//!
//! # Example
//!
//! ```
//! use rsource_core::tokenizer::tokenize;
//! use rsource_core::token_cursor::TokenCursor;
//!
//! let source = "if (foo) { print(bar) }";
//! let tokens = tokenize(source);
//! let mut cursor = TokenCursor::new(&tokens, source);
//!
//! assert_eq!(cursor.current().text(source), "if");
//! cursor.advance_significant();
//! assert_eq!(cursor.current().text(source), "(");
//! assert!(cursor.fwd_to_matching_bracket());
//! assert_eq!(cursor.current().text(source), ")");
//! ```

use crate::location::{Position, Span};
use crate::token::{Token, TokenKind};

/// A cursor over a fixed, position-sorted token slice.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    source: &'a str,
    offset: usize,
    /// Sentinel returned when peeking past either end of the stream.
    end: Token,
}

impl<'a> TokenCursor<'a> {
    /// Creates a cursor positioned on the first token.
    #[must_use]
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        let length = source.len();
        Self {
            tokens,
            source,
            offset: 0,
            end: Token::new(
                TokenKind::End,
                Span::from(length..length),
                Position::default(),
            ),
        }
    }

    /// Returns the token under the cursor, or the end sentinel when the
    /// stream is empty.
    #[must_use]
    pub fn current(&self) -> &Token {
        self.tokens.get(self.offset).unwrap_or(&self.end)
    }

    /// Returns the kind of the token under the cursor.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.current().kind()
    }

    /// Returns the position of the token under the cursor.
    #[must_use]
    pub fn position(&self) -> Position {
        self.current().position()
    }

    /// Returns the cursor's index into the token slice.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns `true` if the current token has the given kind.
    #[must_use]
    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Moves to the next token; fails at the end of the stream.
    pub fn advance(&mut self) -> bool {
        if self.tokens.is_empty() || self.offset + 1 >= self.tokens.len() {
            return false;
        }
        self.offset += 1;
        true
    }

    /// Moves to the previous token; fails at the start of the stream.
    pub fn retreat(&mut self) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset -= 1;
        true
    }

    /// Moves forward to the next significant token.
    pub fn advance_significant(&mut self) -> bool {
        self.advance() && self.skip_insignificant_forward()
    }

    /// Moves backward to the previous significant token.
    pub fn retreat_significant(&mut self) -> bool {
        self.retreat() && self.skip_insignificant_backward()
    }

    /// Skips forward over whitespace and comments; fails if the stream ends
    /// before a significant token is found.
    pub fn skip_insignificant_forward(&mut self) -> bool {
        while !self.kind().is_significant() {
            if !self.advance() {
                return false;
            }
        }
        true
    }

    /// Skips backward over whitespace and comments; fails if the stream
    /// starts before a significant token is found.
    pub fn skip_insignificant_backward(&mut self) -> bool {
        while !self.kind().is_significant() {
            if !self.retreat() {
                return false;
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Peeking
    // ------------------------------------------------------------------

    /// Returns the token `ahead` places forward, or the end sentinel.
    #[must_use]
    pub fn peek_forward(&self, ahead: usize) -> &Token {
        self.tokens.get(self.offset + ahead).unwrap_or(&self.end)
    }

    /// Returns the token `back` places backward, or the end sentinel.
    #[must_use]
    pub fn peek_backward(&self, back: usize) -> &Token {
        if back > self.offset {
            return &self.end;
        }
        self.tokens.get(self.offset - back).unwrap_or(&self.end)
    }

    /// Returns the significant token `count` significant steps forward,
    /// without moving this cursor.
    #[must_use]
    pub fn next_significant(&self, count: usize) -> Token {
        let mut cursor = self.clone();
        for _ in 0..count {
            cursor.advance_significant();
        }
        cursor.current().clone()
    }

    /// Returns the significant token `count` significant steps backward,
    /// without moving this cursor.
    #[must_use]
    pub fn previous_significant(&self, count: usize) -> Token {
        let mut cursor = self.clone();
        for _ in 0..count {
            cursor.retreat_significant();
        }
        cursor.current().clone()
    }

    // ------------------------------------------------------------------
    // Searching
    // ------------------------------------------------------------------

    /// Moves to the token containing (or immediately preceding) `target`.
    ///
    /// The token stream is sorted by position, so this is a binary search.
    /// Fails only when the stream is empty.
    pub fn move_to_position(&mut self, target: Position) -> bool {
        if self.tokens.is_empty() {
            return false;
        }
        let index = self
            .tokens
            .partition_point(|token| token.position() <= target);
        self.offset = index.saturating_sub(1);
        true
    }

    /// Scans forward (starting with the current token) for a token matching
    /// `predicate`, leaving the cursor on the match.
    ///
    /// The predicate receives the cursor itself and may move it; this lets a
    /// locator skip over matched bracket pairs as it tests each candidate.
    pub fn find_forward(&mut self, mut predicate: impl FnMut(&mut Self) -> bool) -> bool {
        loop {
            if predicate(self) {
                return true;
            }
            if !self.advance() {
                return false;
            }
        }
    }

    /// Scans backward (starting with the current token) for a token matching
    /// `predicate`, leaving the cursor on the match.
    pub fn find_backward(&mut self, mut predicate: impl FnMut(&mut Self) -> bool) -> bool {
        loop {
            if predicate(self) {
                return true;
            }
            if !self.retreat() {
                return false;
            }
        }
    }

    /// Scans forward for a token whose text equals `text`.
    pub fn find_forward_text(&mut self, text: &str) -> bool {
        let source = self.source;
        self.find_forward(|cursor| cursor.current().text(source) == text)
    }

    /// Scans backward for a token whose text equals `text`.
    pub fn find_backward_text(&mut self, text: &str) -> bool {
        let source = self.source;
        self.find_backward(|cursor| cursor.current().text(source) == text)
    }

    /// From a left bracket token, moves forward to its matching close.
    ///
    /// Walks significant tokens keeping a signed balance counter; fails if
    /// the cursor is not on a left bracket or the stream ends first.
    pub fn fwd_to_matching_bracket(&mut self) -> bool {
        let open = self.kind();
        if !open.is_left_bracket() {
            return false;
        }
        let Some(close) = open.complement() else {
            return false;
        };

        let mut balance: i32 = 1;
        while self.advance_significant() {
            let kind = self.kind();
            if kind == open {
                balance += 1;
            } else if kind == close {
                balance -= 1;
                if balance == 0 {
                    return true;
                }
            }
        }
        false
    }

    /// From a right bracket token, moves backward to its matching open.
    pub fn bwd_to_matching_bracket(&mut self) -> bool {
        let close = self.kind();
        if !close.is_right_bracket() {
            return false;
        }
        let Some(open) = close.complement() else {
            return false;
        };

        let mut balance: i32 = 1;
        while self.retreat_significant() {
            let kind = self.kind();
            if kind == close {
                balance += 1;
            } else if kind == open {
                balance -= 1;
                if balance == 0 {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn cursor_navigation() {
        let source = "if (foo) { print(bar) } else {}";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);

        assert_eq!(cursor.current().text(source), "if");
        assert!(cursor.advance_significant());
        assert_eq!(cursor.current().text(source), "(");
        assert!(cursor.fwd_to_matching_bracket());
        assert_eq!(cursor.current().text(source), ")");
    }

    #[test]
    fn matching_bracket_backward() {
        let source = "x[f(1, 2)]";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);

        assert!(cursor.find_forward_text("]"));
        assert!(cursor.bwd_to_matching_bracket());
        assert_eq!(cursor.current().text(source), "[");
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn matching_bracket_skips_other_families() {
        let source = "f(g(h(x)))";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);

        assert!(cursor.advance()); // the first '('
        assert!(cursor.fwd_to_matching_bracket());
        assert_eq!(cursor.offset(), tokens.len() - 1);
    }

    #[test]
    fn matching_bracket_fails_without_partner() {
        let source = "(x";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);
        assert!(!cursor.fwd_to_matching_bracket());

        // Not on a bracket at all.
        let source = "x";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);
        assert!(!cursor.fwd_to_matching_bracket());
    }

    #[test]
    fn move_to_position_lands_on_covering_token() {
        let source = "if (foo) { print(1) }";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);

        assert!(cursor.move_to_position(Position::new(0, 0)));
        assert_eq!(cursor.kind(), TokenKind::If);

        // The whitespace just before `print`.
        assert!(cursor.move_to_position(Position::new(0, 10)));
        assert_eq!(cursor.current().text(source), " ");

        // Anywhere inside `print` resolves to `print`.
        for column in 11..=15 {
            assert!(cursor.move_to_position(Position::new(0, column)));
            assert_eq!(cursor.current().text(source), "print");
        }

        assert!(cursor.move_to_position(Position::new(0, 16)));
        assert_eq!(cursor.current().text(source), "(");

        // Past the end of input resolves to the last token.
        assert!(cursor.move_to_position(Position::new(99, 0)));
        assert_eq!(cursor.offset(), tokens.len() - 1);
    }

    #[test]
    fn find_operations() {
        let source = "(if (foo) { print(1) })";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);

        // An unmatched-open locator: a left bracket with no close before
        // the cursor. Matched pairs are skipped by jumping to their open.
        let open_bracket = |cursor: &mut TokenCursor| {
            if cursor.bwd_to_matching_bracket() {
                return false;
            }
            cursor.kind().is_left_bracket()
        };

        assert!(cursor.move_to_position(Position::new(0, 13)));
        assert_eq!(cursor.current().text(source), "print");
        assert!(cursor.find_backward(open_bracket));
        assert_eq!(cursor.current().text(source), "{");
        assert!(cursor.fwd_to_matching_bracket());
        assert_eq!(cursor.current().text(source), "}");
        assert!(cursor.find_backward(open_bracket));
        assert_eq!(cursor.current().text(source), "(");
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn significant_peeking() {
        let source = "a # comment\nb";
        let tokens = tokenize(source);
        let cursor = TokenCursor::new(&tokens, source);

        assert_eq!(cursor.next_significant(1).text(source), "b");
        assert_eq!(cursor.current().text(source), "a"); // cursor unmoved

        let mut cursor = TokenCursor::new(&tokens, source);
        assert!(cursor.find_forward_text("b"));
        assert_eq!(cursor.previous_significant(1).text(source), "a");
    }

    #[test]
    fn movement_fails_at_stream_ends() {
        let source = "x";
        let tokens = tokenize(source);
        let mut cursor = TokenCursor::new(&tokens, source);

        assert!(!cursor.retreat());
        assert!(!cursor.advance());
        assert_eq!(cursor.current().text(source), "x");

        let empty: Vec<Token> = Vec::new();
        let mut cursor = TokenCursor::new(&empty, "");
        assert!(!cursor.advance());
        assert!(!cursor.move_to_position(Position::new(0, 0)));
        assert_eq!(cursor.kind(), TokenKind::End);
    }
}
