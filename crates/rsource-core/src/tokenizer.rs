// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for R source code.
//!
//! The tokenizer is hand-written for maximum control over error recovery and
//! IDE features. It performs a single left-to-right scan over the source
//! bytes, dispatching on the current byte and consuming the longest valid
//! lexeme at each position (maximal munch).
//!
//! # Design Principles
//!
//! - **Error recovery**: never fail on malformed input; emit
//!   [`TokenKind::Error`] tokens and keep scanning. Every dispatch consumes
//!   at least one byte, so tokenization always terminates.
//! - **Trivia preservation**: whitespace and comments are tagged and kept in
//!   the stream, so callers that need original formatting can skip them
//!   explicitly and the concatenated token spans reconstruct the buffer.
//! - **Precise positions**: every token carries its byte span and its
//!   row/column position.
//!
//! Bracket tokens need one piece of state: `]` closes either `[` or the
//! second half of `[[`, so the tokenizer keeps a stack of open square
//! brackets. The stack is pushed on `[`/`[[`, popped on a matched close, and
//! an unmatched `]` is tagged [`TokenKind::Error`] without popping.
//!
//! # Example
//!
//! ```
//! use rsource_core::tokenizer::Tokenizer;
//!
//! let tokens: Vec<_> = Tokenizer::new("x + 1").collect();
//! assert_eq!(tokens.len(), 5); // x, space, +, space, 1
//! ```

use std::collections::VecDeque;

use crate::location::{Position, Span};
use crate::token::{Token, TokenKind};

/// A cursor over raw source bytes.
///
/// Walks the buffer one byte at a time, tracking the byte offset and the
/// row/column position; a newline advances the row and resets the column.
#[derive(Debug, Clone)]
pub struct TextCursor<'src> {
    source: &'src str,
    offset: usize,
    position: Position,
}

impl<'src> TextCursor<'src> {
    /// Creates a cursor at the start of `source`.
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            position: Position::new(0, 0),
        }
    }

    /// Returns the byte at `ahead` bytes past the cursor, or NUL past the
    /// end of the buffer.
    #[must_use]
    pub fn peek(&self, ahead: usize) -> u8 {
        self.source
            .as_bytes()
            .get(self.offset + ahead)
            .copied()
            .unwrap_or(0)
    }

    /// Advances the cursor by `count` bytes, stopping at the end of the
    /// buffer and updating the row/column position along the way.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            match self.source.as_bytes().get(self.offset) {
                None => break,
                Some(b'\n') => {
                    self.position.row += 1;
                    self.position.column = 0;
                }
                Some(_) => self.position.column += 1,
            }
            self.offset += 1;
        }
    }

    /// Returns `true` while the cursor has bytes left to read.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.offset < self.source.len()
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the current row/column position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the number of bytes left in the buffer.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.source.len() - self.offset
    }
}

/// Returns `true` for bytes that may start an R symbol.
///
/// Note `_` may continue a symbol but not start one; any non-ASCII byte is a
/// valid symbol constituent.
const fn is_symbol_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'.' || byte >= 0x80
}

/// Returns `true` for bytes that may continue an R symbol.
const fn is_symbol_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'_' || byte >= 0x80
}

/// A tokenizer for R source code.
///
/// Produces the full token stream, whitespace and comments included.
/// Implements [`Iterator`], yielding tokens until end of input; the
/// [`Tokenizer::next_token`] and [`Tokenizer::peek`] methods additionally
/// expose the stream to callers that pull tokens lazily, such as the parser.
#[derive(Debug)]
pub struct Tokenizer<'src> {
    source: &'src str,
    cursor: TextCursor<'src>,
    /// Open square brackets awaiting their close.
    brackets: Vec<TokenKind>,
    /// Tokens scanned ahead of the consumer by [`Tokenizer::peek`].
    pending: VecDeque<Token>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: TextCursor::new(source),
            brackets: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token, or an [`TokenKind::End`] token at (and after)
    /// the end of input.
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.pop_front() {
            return token;
        }
        self.scan_token()
    }

    /// Peeks `ahead` tokens past the last one returned by
    /// [`Tokenizer::next_token`], without consuming anything.
    pub fn peek(&mut self, ahead: usize) -> &Token {
        while self.pending.len() <= ahead {
            let token = self.scan_token();
            self.pending.push_back(token);
        }
        &self.pending[ahead]
    }

    /// Returns `true` if no open square bracket is awaiting its close.
    #[must_use]
    pub fn brackets_balanced(&self) -> bool {
        self.brackets.is_empty()
    }

    // ------------------------------------------------------------------
    // Scanning
    // ------------------------------------------------------------------

    /// Emits a token of `length` bytes at the cursor and advances past it.
    fn emit(&mut self, kind: TokenKind, length: usize) -> Token {
        let start = self.cursor.offset();
        let position = self.cursor.position();
        self.cursor.advance(length);
        Token::new(kind, Span::from(start..self.cursor.offset()), position)
    }

    /// Scans one token at the cursor.
    fn scan_token(&mut self) -> Token {
        if !self.cursor.is_valid() {
            let offset = self.cursor.offset();
            return Token::new(
                TokenKind::End,
                Span::from(offset..offset),
                self.cursor.position(),
            );
        }

        match self.cursor.peek(0) {
            // Brackets
            b'{' => self.emit(TokenKind::LeftBrace, 1),
            b'}' => self.emit(TokenKind::RightBrace, 1),
            b'(' => self.emit(TokenKind::LeftParen, 1),
            b')' => self.emit(TokenKind::RightParen, 1),
            b'[' => {
                if self.cursor.peek(1) == b'[' {
                    self.brackets.push(TokenKind::LeftDoubleBracket);
                    self.emit(TokenKind::LeftDoubleBracket, 2)
                } else {
                    self.brackets.push(TokenKind::LeftBracket);
                    self.emit(TokenKind::LeftBracket, 1)
                }
            }
            b']' => self.scan_right_bracket(),

            // Operators, longest match first
            b'<' => match self.cursor.peek(1) {
                b'-' => self.emit(TokenKind::LeftAssign, 2),
                b'=' => self.emit(TokenKind::LessEqual, 2),
                b'<' if self.cursor.peek(2) == b'-' => self.emit(TokenKind::LeftSuperAssign, 3),
                _ => self.emit(TokenKind::Less, 1),
            },
            b'>' => {
                if self.cursor.peek(1) == b'=' {
                    self.emit(TokenKind::GreaterEqual, 2)
                } else {
                    self.emit(TokenKind::Greater, 1)
                }
            }
            b'=' => {
                if self.cursor.peek(1) == b'=' {
                    self.emit(TokenKind::Equal, 2)
                } else {
                    self.emit(TokenKind::EqualsAssign, 1)
                }
            }
            b'|' => {
                if self.cursor.peek(1) == b'|' {
                    self.emit(TokenKind::OrScalar, 2)
                } else {
                    self.emit(TokenKind::OrVector, 1)
                }
            }
            b'&' => {
                if self.cursor.peek(1) == b'&' {
                    self.emit(TokenKind::AndScalar, 2)
                } else {
                    self.emit(TokenKind::AndVector, 1)
                }
            }
            b'*' => {
                if self.cursor.peek(1) == b'*' {
                    self.emit(TokenKind::StarStar, 2)
                } else {
                    self.emit(TokenKind::Multiply, 1)
                }
            }
            b':' => match self.cursor.peek(1) {
                b':' => {
                    if self.cursor.peek(2) == b':' {
                        self.emit(TokenKind::NamespaceAll, 3)
                    } else {
                        self.emit(TokenKind::NamespaceExports, 2)
                    }
                }
                b'=' => self.emit(TokenKind::ColonAssign, 2),
                _ => self.emit(TokenKind::Sequence, 1),
            },
            b'!' => {
                if self.cursor.peek(1) == b'=' {
                    self.emit(TokenKind::NotEqual, 2)
                } else {
                    self.emit(TokenKind::Not, 1)
                }
            }
            // A leading '-' or '+' is never folded into a numeric literal;
            // sign application is the parser's job.
            b'-' => {
                if self.cursor.peek(1) == b'>' {
                    if self.cursor.peek(2) == b'>' {
                        self.emit(TokenKind::RightSuperAssign, 3)
                    } else {
                        self.emit(TokenKind::RightAssign, 2)
                    }
                } else {
                    self.emit(TokenKind::Minus, 1)
                }
            }
            b'+' => self.emit(TokenKind::Plus, 1),
            b'~' => self.emit(TokenKind::Formula, 1),
            b'?' => self.emit(TokenKind::Help, 1),
            b'/' => self.emit(TokenKind::Divide, 1),
            b'@' => self.emit(TokenKind::At, 1),
            b'$' => self.emit(TokenKind::Dollar, 1),
            b'^' => self.emit(TokenKind::Caret, 1),

            // User operators: %...%
            b'%' => self.scan_delimited(b'%', TokenKind::UserOperator, false),

            // Punctuation
            b',' => self.emit(TokenKind::Comma, 1),
            b';' => self.emit(TokenKind::Semicolon, 1),

            // Strings and quoted symbols
            b'\'' => self.scan_delimited(b'\'', TokenKind::String, true),
            b'"' => self.scan_delimited(b'"', TokenKind::String, true),
            b'`' => self.scan_delimited(b'`', TokenKind::Symbol, true),

            // Comments
            b'#' => self.scan_comment(),

            // Whitespace
            byte if byte.is_ascii_whitespace() => self.scan_whitespace(),

            // Numbers before symbols, so `.5` lexes as a number while `.x`
            // stays a symbol.
            byte if byte.is_ascii_digit() => self.scan_number(),
            b'.' if self.cursor.peek(1).is_ascii_digit() => self.scan_number(),

            byte if is_symbol_start(byte) => self.scan_symbol(),

            // Nothing matched: consume exactly one byte so scanning always
            // makes progress.
            _ => self.emit(TokenKind::Error, 1),
        }
    }

    /// Scans `]`, which closes either `[` or the second half of `[[`.
    fn scan_right_bracket(&mut self) -> Token {
        match self.brackets.last().copied() {
            None => self.emit(TokenKind::Error, 1),
            Some(TokenKind::LeftDoubleBracket) => {
                let token = if self.cursor.peek(1) == b']' {
                    self.emit(TokenKind::RightDoubleBracket, 2)
                } else {
                    self.emit(TokenKind::Error, 1)
                };
                self.brackets.pop();
                token
            }
            Some(_) => {
                self.brackets.pop();
                self.emit(TokenKind::RightBracket, 1)
            }
        }
    }

    /// Scans a lexeme delimited by `terminator`, starting at the opening
    /// delimiter. When `skip_escaped` is set, a backslash consumes the
    /// following byte unconditionally. Unterminated lexemes become an
    /// [`TokenKind::Error`] token covering the rest of the buffer.
    fn scan_delimited(&mut self, terminator: u8, kind: TokenKind, skip_escaped: bool) -> Token {
        let remaining = self.cursor.remaining();
        let mut distance = 1;
        while distance < remaining {
            let byte = self.cursor.peek(distance);
            if skip_escaped && byte == b'\\' {
                distance += 2;
                continue;
            }
            if byte == terminator {
                return self.emit(kind, distance + 1);
            }
            distance += 1;
        }
        self.emit(TokenKind::Error, remaining)
    }

    /// Scans a `#` comment up to (but not including) the line terminator.
    fn scan_comment(&mut self) -> Token {
        let remaining = self.cursor.remaining();
        let mut distance = 1;
        while distance < remaining && self.cursor.peek(distance) != b'\n' {
            distance += 1;
        }
        self.emit(TokenKind::Comment, distance)
    }

    /// Scans a run of whitespace.
    fn scan_whitespace(&mut self) -> Token {
        let mut distance = 1;
        while self.cursor.peek(distance).is_ascii_whitespace() {
            distance += 1;
        }
        self.emit(TokenKind::Whitespace, distance)
    }

    /// Scans a numeric literal.
    ///
    /// Leading-dot (`.5`) and trailing-dot (`100.`) forms are legal, as are
    /// exponents with an optional sign and a trailing `L` integer suffix.
    /// Malformed exponents are still consumed as a single token, tagged
    /// [`TokenKind::Error`] rather than split.
    fn scan_number(&mut self) -> Token {
        if self.cursor.peek(0) == b'0' && matches!(self.cursor.peek(1), b'x' | b'X') {
            return self.scan_hex_number();
        }

        let mut valid = true;
        let mut distance = 0;

        while self.cursor.peek(distance).is_ascii_digit() {
            distance += 1;
        }

        if self.cursor.peek(distance) == b'.' {
            distance += 1;
            while self.cursor.peek(distance).is_ascii_digit() {
                distance += 1;
            }
        }

        if matches!(self.cursor.peek(distance), b'e' | b'E') {
            distance += 1;
            if matches!(self.cursor.peek(distance), b'+' | b'-') {
                distance += 1;
            }
            valid = self.cursor.peek(distance).is_ascii_digit();
            while self.cursor.peek(distance).is_ascii_digit() {
                distance += 1;
            }
            // A decimal point in the exponent is not a valid number, but it
            // reads better to consume it as one malformed token than to
            // split it.
            if self.cursor.peek(distance) == b'.' {
                valid = false;
                distance += 1;
                while self.cursor.peek(distance).is_ascii_digit() {
                    distance += 1;
                }
            }
        }

        if self.cursor.peek(distance) == b'L' {
            distance += 1;
        }

        let kind = if valid { TokenKind::Number } else { TokenKind::Error };
        self.emit(kind, distance)
    }

    /// Scans a hexadecimal literal: `0x`/`0X`, hex digits, and an optional
    /// `i` (imaginary) or `L` (integer) suffix.
    fn scan_hex_number(&mut self) -> Token {
        let mut distance = 2;
        if !self.cursor.peek(distance).is_ascii_hexdigit() {
            return self.emit(TokenKind::Error, distance);
        }
        while self.cursor.peek(distance).is_ascii_hexdigit() {
            distance += 1;
        }
        if matches!(self.cursor.peek(distance), b'i' | b'L') {
            distance += 1;
        }
        self.emit(TokenKind::Number, distance)
    }

    /// Scans a symbol and classifies it against the keyword table.
    fn scan_symbol(&mut self) -> Token {
        let mut distance = 1;
        while is_symbol_byte(self.cursor.peek(distance)) {
            distance += 1;
        }
        let start = self.cursor.offset();
        let text = &self.source[start..start + distance];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Symbol);
        self.emit(kind, distance)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind() == TokenKind::End {
            None
        } else {
            Some(token)
        }
    }
}

/// Tokenizes `source` into a vector of tokens, excluding the end-of-input
/// sentinel.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

/// Tokenizes `source` into a vector of tokens, including the end-of-input
/// sentinel as the final element.
#[must_use]
pub fn tokenize_with_end(source: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let is_end = token.kind() == TokenKind::End;
        tokens.push(token);
        if is_end {
            break;
        }
    }
    tokens
}
