// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for R lexical analysis.
//!
//! [`TokenKind`] is a single closed enum covering every lexical category the
//! tokenizer can produce: brackets, the full operator set, keywords,
//! literals, trivia, and the synthetic kinds the parser uses for placeholder
//! nodes. Classification queries (`is_operator`, `is_bracket`, and friends)
//! are exhaustive matches, so every one of them is O(1) and the compiler
//! checks coverage whenever a variant is added.
//!
//! A [`Token`] is a classified slice of the source buffer: kind, byte span,
//! and row/column position. Tokens never own their text — contents are
//! recovered by slicing the original buffer with the token's span.
//!
//! # Example
//!
//! ```
//! use rsource_core::tokenizer::tokenize;
//! use rsource_core::token::TokenKind;
//!
//! let source = "x <- 1";
//! let tokens = tokenize(source);
//! assert_eq!(tokens[2].kind(), TokenKind::LeftAssign);
//! assert_eq!(tokens[2].text(source), "<-");
//! ```

use std::fmt;

use crate::location::{Position, Span};

/// The lexical category of a token.
///
/// Operator variants that can appear in prefix position (`+ - ! ~ ?`) are
/// distinguished by [`TokenKind::is_unary_operator`] so the parser never has
/// to re-derive prefix capability from token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Brackets
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `[[`
    LeftDoubleBracket,
    /// `]]`
    RightDoubleBracket,

    // Punctuation
    /// `;`
    Semicolon,
    /// `,`
    Comma,

    // Literals, names, and trivia
    /// An identifier or backtick-quoted symbol.
    Symbol,
    /// A single- or double-quoted string literal.
    String,
    /// A numeric literal (decimal, hex, integer-suffixed, or imaginary).
    Number,
    /// A `#` comment, up to but not including the line terminator.
    Comment,
    /// A run of whitespace, preserved in the token stream.
    Whitespace,

    // Operators that also work as unary prefixes
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `?`
    Help,
    /// `!`
    Not,
    /// `~`
    Formula,

    // Binary-only operators
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `^`
    Caret,
    /// `**`
    StarStar,
    /// `:`
    Sequence,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `&`
    AndVector,
    /// `&&`
    AndScalar,
    /// `|`
    OrVector,
    /// `||`
    OrScalar,
    /// `<-`
    LeftAssign,
    /// `<<-`
    LeftSuperAssign,
    /// `->`
    RightAssign,
    /// `->>`
    RightSuperAssign,
    /// `=`
    EqualsAssign,
    /// `:=`
    ColonAssign,
    /// `::`
    NamespaceExports,
    /// `:::`
    NamespaceAll,
    /// `$`
    Dollar,
    /// `@`
    At,
    /// A user-defined `%op%` operator.
    UserOperator,

    // Keywords
    /// `if`
    If,
    /// `else`
    Else,
    /// `repeat`
    Repeat,
    /// `while`
    While,
    /// `function`
    Function,
    /// `for`
    For,
    /// `in`
    In,
    /// `next`
    Next,
    /// `break`
    Break,
    /// `TRUE`
    True,
    /// `FALSE`
    False,
    /// `NULL`
    Null,
    /// `Inf`
    Inf,
    /// `NaN`
    NaN,
    /// `NA`
    Na,
    /// `NA_integer_`
    NaInteger,
    /// `NA_real_`
    NaReal,
    /// `NA_complex_`
    NaComplex,
    /// `NA_character_`
    NaCharacter,

    // Synthetic kinds
    /// The synthetic root of a syntax tree.
    Root,
    /// Placeholder for an omitted call argument (`f()`).
    Empty,
    /// Placeholder for an omitted function argument (`x[, 1]`).
    Missing,
    /// End of input.
    End,
    /// A malformed lexeme, or a parser-synthesized error placeholder.
    Error,
}

impl TokenKind {
    /// Classifies a symbol's text against the R keyword table.
    ///
    /// Keyed by length first, then byte comparison, so classification stays a
    /// small decision tree rather than a hash lookup.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        let kind = match text.len() {
            2 => match text {
                "if" => Self::If,
                "in" => Self::In,
                "NA" => Self::Na,
                _ => return None,
            },
            3 => match text {
                "for" => Self::For,
                "Inf" => Self::Inf,
                "NaN" => Self::NaN,
                _ => return None,
            },
            4 => match text {
                "else" => Self::Else,
                "next" => Self::Next,
                "TRUE" => Self::True,
                "NULL" => Self::Null,
                _ => return None,
            },
            5 => match text {
                "while" => Self::While,
                "break" => Self::Break,
                "FALSE" => Self::False,
                _ => return None,
            },
            6 => match text {
                "repeat" => Self::Repeat,
                _ => return None,
            },
            8 => match text {
                "function" => Self::Function,
                "NA_real_" => Self::NaReal,
                _ => return None,
            },
            11 => match text {
                "NA_integer_" => Self::NaInteger,
                "NA_complex_" => Self::NaComplex,
                _ => return None,
            },
            13 => match text {
                "NA_character_" => Self::NaCharacter,
                _ => return None,
            },
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` for any operator, unary-capable or not.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        self.is_unary_operator()
            || matches!(
                self,
                Self::Multiply
                    | Self::Divide
                    | Self::Caret
                    | Self::StarStar
                    | Self::Sequence
                    | Self::Less
                    | Self::LessEqual
                    | Self::Greater
                    | Self::GreaterEqual
                    | Self::Equal
                    | Self::NotEqual
                    | Self::AndVector
                    | Self::AndScalar
                    | Self::OrVector
                    | Self::OrScalar
                    | Self::LeftAssign
                    | Self::LeftSuperAssign
                    | Self::RightAssign
                    | Self::RightSuperAssign
                    | Self::EqualsAssign
                    | Self::ColonAssign
                    | Self::NamespaceExports
                    | Self::NamespaceAll
                    | Self::Dollar
                    | Self::At
                    | Self::UserOperator
            )
    }

    /// Returns `true` for operators that can appear in prefix position.
    #[must_use]
    pub const fn is_unary_operator(self) -> bool {
        matches!(
            self,
            Self::Plus | Self::Minus | Self::Help | Self::Not | Self::Formula
        )
    }

    /// Returns `true` for any of the eight bracket kinds.
    #[must_use]
    pub const fn is_bracket(self) -> bool {
        self.is_left_bracket() || self.is_right_bracket()
    }

    /// Returns `true` for `(`, `{`, `[`, and `[[`.
    #[must_use]
    pub const fn is_left_bracket(self) -> bool {
        matches!(
            self,
            Self::LeftParen | Self::LeftBrace | Self::LeftBracket | Self::LeftDoubleBracket
        )
    }

    /// Returns `true` for `)`, `}`, `]`, and `]]`.
    #[must_use]
    pub const fn is_right_bracket(self) -> bool {
        matches!(
            self,
            Self::RightParen | Self::RightBrace | Self::RightBracket | Self::RightDoubleBracket
        )
    }

    /// Returns the matching bracket for a bracket kind.
    #[must_use]
    pub const fn complement(self) -> Option<Self> {
        let complement = match self {
            Self::LeftParen => Self::RightParen,
            Self::RightParen => Self::LeftParen,
            Self::LeftBrace => Self::RightBrace,
            Self::RightBrace => Self::LeftBrace,
            Self::LeftBracket => Self::RightBracket,
            Self::RightBracket => Self::LeftBracket,
            Self::LeftDoubleBracket => Self::RightDoubleBracket,
            Self::RightDoubleBracket => Self::LeftDoubleBracket,
            _ => return None,
        };
        Some(complement)
    }

    /// Returns `true` for any reserved word.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        self.is_control_flow_keyword()
            || matches!(
                self,
                Self::True
                    | Self::False
                    | Self::Null
                    | Self::Inf
                    | Self::NaN
                    | Self::Na
                    | Self::NaInteger
                    | Self::NaReal
                    | Self::NaComplex
                    | Self::NaCharacter
            )
    }

    /// Returns `true` for keywords participating in control flow.
    #[must_use]
    pub const fn is_control_flow_keyword(self) -> bool {
        matches!(
            self,
            Self::If
                | Self::Else
                | Self::Repeat
                | Self::While
                | Self::Function
                | Self::For
                | Self::In
                | Self::Next
                | Self::Break
        )
    }

    /// Returns `true` for symbols, strings, and numbers.
    #[must_use]
    pub const fn is_symbolic(self) -> bool {
        matches!(self, Self::Symbol | Self::String | Self::Number)
    }

    /// Returns `true` for the brackets that open a call or index
    /// continuation: `(`, `[`, `[[`.
    #[must_use]
    pub const fn is_call_operator(self) -> bool {
        matches!(
            self,
            Self::LeftParen | Self::LeftBracket | Self::LeftDoubleBracket
        )
    }

    /// Returns `false` for whitespace and comments, `true` otherwise.
    #[must_use]
    pub const fn is_significant(self) -> bool {
        !matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftDoubleBracket => "[[",
            Self::RightDoubleBracket => "]]",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Symbol => "symbol",
            Self::String => "string",
            Self::Number => "number",
            Self::Comment => "comment",
            Self::Whitespace => "whitespace",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Help => "?",
            Self::Not => "!",
            Self::Formula => "~",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Caret => "^",
            Self::StarStar => "**",
            Self::Sequence => ":",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::AndVector => "&",
            Self::AndScalar => "&&",
            Self::OrVector => "|",
            Self::OrScalar => "||",
            Self::LeftAssign => "<-",
            Self::LeftSuperAssign => "<<-",
            Self::RightAssign => "->",
            Self::RightSuperAssign => "->>",
            Self::EqualsAssign => "=",
            Self::ColonAssign => ":=",
            Self::NamespaceExports => "::",
            Self::NamespaceAll => ":::",
            Self::Dollar => "$",
            Self::At => "@",
            Self::UserOperator => "%op%",
            Self::If => "if",
            Self::Else => "else",
            Self::Repeat => "repeat",
            Self::While => "while",
            Self::Function => "function",
            Self::For => "for",
            Self::In => "in",
            Self::Next => "next",
            Self::Break => "break",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Null => "NULL",
            Self::Inf => "Inf",
            Self::NaN => "NaN",
            Self::Na => "NA",
            Self::NaInteger => "NA_integer_",
            Self::NaReal => "NA_real_",
            Self::NaComplex => "NA_complex_",
            Self::NaCharacter => "NA_character_",
            Self::Root => "<root>",
            Self::Empty => "<empty>",
            Self::Missing => "<missing>",
            Self::End => "<end>",
            Self::Error => "<error>",
        };
        f.write_str(text)
    }
}

/// A classified slice of the source buffer.
///
/// Tokens are immutable once produced. Zero-length spans occur only on
/// synthetic tokens (`End` and the parser's placeholder kinds), which carry
/// no buffer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    position: Position,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
        }
    }

    /// Creates a synthetic token with no buffer span.
    #[must_use]
    pub const fn placeholder(kind: TokenKind, position: Position) -> Self {
        Self {
            kind,
            span: Span::new(0, 0),
            position,
        }
    }

    /// Returns the token's lexical category.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the token's byte span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the token's row/column position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the position one past the token's final column.
    #[must_use]
    pub const fn end_position(&self) -> Position {
        self.position.shifted(self.span.len())
    }

    /// Returns `true` for tokens with no backing buffer text.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.span.is_empty()
    }

    /// Slices this token's text out of the source buffer it was lexed from.
    ///
    /// Synthetic tokens return the empty string.
    #[must_use]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        if self.is_synthetic() {
            ""
        } else {
            &source[self.span.as_range()]
        }
    }
}
