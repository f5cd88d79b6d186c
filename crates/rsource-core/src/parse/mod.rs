// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parser for R source code.
//!
//! The parser drives tokenization lazily — pulling one significant token at
//! a time and silently skipping whitespace and comments — and builds an
//! arena-backed [`Ast`] using precedence climbing for expressions plus
//! dedicated recursive routines for control-flow constructs and call
//! argument lists.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** — parsing always produces a complete
//!   tree, possibly containing error placeholder nodes.
//! - **Multiple errors** — all errors are reported, not just the first;
//!   errors are accumulated as values, never thrown.
//! - **Precise positions** — every diagnostic points at an exact token, and
//!   every node created from a buffer-backed token is recorded in a
//!   position-to-node index for cursor lookups.
//!
//! # Statement termination
//!
//! A newline ends a statement at top level and inside braces, but is
//! insignificant inside parentheses and call argument lists. The parser
//! tracks a single active [`ParseState`] and allows an expression to
//! continue onto an operator only when that operator sits on the same row as
//! the previous token — unless the state is `Paren`. This one rule is the
//! grammar's most important context-sensitivity:
//!
//! ```
//! use rsource_core::parse::parse;
//!
//! // One two-argument call: the newline inside `(...)` does not terminate.
//! let result = parse("f(1,\n2)");
//! assert!(result.errors().is_empty());
//!
//! // Two statements: `1` then unary `+2`.
//! let result = parse("1\n+2");
//! assert_eq!(result.ast().children(result.ast().root()).len(), 2);
//! ```

mod control_flow;
mod error;
mod expressions;
mod precedence;


pub use error::ParseError;

use std::collections::BTreeMap;

use ecow::EcoString;
use tracing::debug;

use crate::ast::{Ast, NodeId};
use crate::location::Position;
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;

/// The parser's statement-termination context.
///
/// One value is active at a time; it is saved and restored around entry into
/// braced blocks, parenthesized expressions, and call argument lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// At the top level of the program.
    TopLevel,
    /// Inside a `{...}` block.
    Brace,
    /// Inside `(...)`, a call argument list, or a control-flow header.
    Paren,
}

/// Configuration for a parse.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    max_depth: usize,
}

impl ParserOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recursion-depth bound.
    ///
    /// Exceeding the bound is reported as a [`ParseError`] and the offending
    /// subtree becomes an error placeholder node, rather than exhausting the
    /// stack.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// The outcome of a parse: a complete tree plus every error encountered.
#[derive(Debug)]
pub struct ParseResult {
    ast: Ast,
    errors: Vec<ParseError>,
    node_index: BTreeMap<Position, NodeId>,
}

impl ParseResult {
    /// Returns the syntax tree.
    #[must_use]
    pub const fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Consumes the result, returning the syntax tree.
    #[must_use]
    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// Returns the accumulated parse errors, in source order of discovery.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Returns `true` if any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Looks up the node created at exactly `position` (a token's start
    /// position), mapping an external cursor location back to the tree.
    #[must_use]
    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.node_index.get(&position).copied()
    }
}

/// Parses `source` with default options.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParserOptions::default())
}

/// Parses `source` with explicit options.
#[must_use]
pub fn parse_with_options(source: &str, options: ParserOptions) -> ParseResult {
    debug!(bytes = source.len(), "parsing buffer");
    let mut parser = Parser::new(source, options);
    parser.parse_program();
    debug!(
        nodes = parser.ast.len(),
        errors = parser.errors.len(),
        "parse finished"
    );
    ParseResult {
        ast: parser.ast,
        errors: parser.errors,
        node_index: parser.node_index,
    }
}

/// The parser state machine.
///
/// Submodules add the expression and control-flow routines in further `impl`
/// blocks; this module holds token management, error reporting, and the
/// program loop.
pub(crate) struct Parser<'src> {
    source: &'src str,
    tokenizer: Tokenizer<'src>,
    current: Token,
    previous: Token,
    state: ParseState,
    ast: Ast,
    errors: Vec<ParseError>,
    node_index: BTreeMap<Position, NodeId>,
    depth: usize,
    max_depth: usize,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, options: ParserOptions) -> Self {
        let mut parser = Self {
            source,
            tokenizer: Tokenizer::new(source),
            current: Token::placeholder(TokenKind::End, Position::new(0, 0)),
            previous: Token::placeholder(TokenKind::End, Position::new(0, 0)),
            state: ParseState::TopLevel,
            ast: Ast::new(),
            errors: Vec::new(),
            node_index: BTreeMap::new(),
            depth: 0,
            max_depth: options.max_depth,
        };
        parser.advance();
        parser
    }

    /// Parses the whole program into the tree's root.
    fn parse_program(&mut self) {
        while let Some(node) = self.parse_expression(0) {
            let root = self.ast.root();
            self.ast.add_child(root, node);
        }
    }

    // ------------------------------------------------------------------
    // Token management
    // ------------------------------------------------------------------

    /// Returns `true` when the current token is the end of input.
    fn at_end(&self) -> bool {
        self.current.kind() == TokenKind::End
    }

    /// Moves to the next significant token.
    fn advance(&mut self) {
        let mut next = self.tokenizer.next_token();
        while !next.kind().is_significant() {
            next = self.tokenizer.next_token();
        }
        self.previous = std::mem::replace(&mut self.current, next);
    }

    /// Returns the current token and moves past it.
    fn consume(&mut self) -> Token {
        let token = self.current.clone();
        self.advance();
        token
    }

    /// Peeks at the first significant token after the current one, without
    /// consuming anything.
    fn peek_significant(&mut self) -> &Token {
        let mut ahead = 0;
        loop {
            if self.tokenizer.peek(ahead).kind().is_significant() {
                break;
            }
            ahead += 1;
        }
        self.tokenizer.peek(ahead)
    }

    /// Checks that the current token has the expected kind, reporting an
    /// error otherwise.
    fn check(&mut self, expected: TokenKind) -> bool {
        if self.current.kind() == expected {
            true
        } else {
            self.error_expected(expected);
            false
        }
    }

    /// Checks the current token and advances past it on a match. On a
    /// mismatch, advances only when `advance_on_error` is set — structural
    /// closers leave the offending token in place for the caller.
    fn check_and_advance(&mut self, expected: TokenKind, advance_on_error: bool) -> bool {
        let matched = self.check(expected);
        if matched || advance_on_error {
            self.advance();
        }
        matched
    }

    /// Skips statement separators. A `;` is legal between statements at top
    /// level and inside braces, but is an error inside parentheses.
    fn skip_semicolons(&mut self) {
        while self.current.kind() == TokenKind::Semicolon {
            if self.state == ParseState::Paren {
                let token = self.consume();
                self.error_unexpected_token(&token);
            } else {
                self.advance();
            }
        }
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    /// Creates a node wrapping `token`, recording buffer-backed tokens in
    /// the position-to-node index.
    fn node_from_token(&mut self, token: Token) -> NodeId {
        let position = token.position();
        let synthetic = token.is_synthetic();
        let id = self.ast.add_node(token);
        if !synthetic {
            self.node_index.insert(position, id);
        }
        id
    }

    /// Creates a placeholder node of the given kind at `position`.
    fn placeholder_node(&mut self, kind: TokenKind, position: Position) -> NodeId {
        self.ast.add_node(Token::placeholder(kind, position))
    }

    /// Creates a `Missing` placeholder at the current token.
    fn missing_node(&mut self) -> NodeId {
        let position = self.current.position();
        self.placeholder_node(TokenKind::Missing, position)
    }

    /// Creates an `Error` placeholder at `position`.
    fn error_node(&mut self, position: Position) -> NodeId {
        self.placeholder_node(TokenKind::Error, position)
    }

    // ------------------------------------------------------------------
    // Error reporting
    // ------------------------------------------------------------------

    /// Records an error at the current token.
    fn error_at_current(&mut self, message: impl Into<EcoString>) {
        let error = ParseError::at_token(&self.current, message);
        self.errors.push(error);
    }

    /// Records an "unexpected token" error at `token`.
    fn error_unexpected_token(&mut self, token: &Token) {
        let message = format!("unexpected token '{}'", token.text(self.source));
        self.errors.push(ParseError::at_token(token, message));
    }

    /// Records an expected-vs-actual error at the current token.
    fn error_expected(&mut self, expected: TokenKind) {
        let message = format!(
            "unexpected token '{}'; expected '{}'",
            self.current.text(self.source),
            expected
        );
        self.error_at_current(message);
    }

    /// Records an "unexpected end of input" error.
    fn error_unexpected_end(&mut self) {
        self.error_at_current("unexpected end of input");
    }

    /// Reports and returns `true` if the current token is the end of input.
    fn check_unexpected_end(&mut self) -> bool {
        if self.at_end() {
            self.error_unexpected_end();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_cursor::TokenCursor;
    use crate::tokenizer::tokenize;

    /// Parses source expected to be well-formed and returns the result.
    fn parse_clean(source: &str) -> ParseResult {
        let result = parse(source);
        assert!(
            result.errors().is_empty(),
            "unexpected errors for {source:?}: {:?}",
            result.errors()
        );
        result
    }

    /// Returns the root's children.
    fn top_level(result: &ParseResult) -> Vec<NodeId> {
        result.ast().children(result.ast().root()).to_vec()
    }

    #[test]
    fn parse_empty_source() {
        let result = parse_clean("");
        assert!(top_level(&result).is_empty());

        let result = parse_clean("   # just a comment\n");
        assert!(top_level(&result).is_empty());
    }

    #[test]
    fn parse_simple_assignment() {
        let result = parse_clean("x <- 1");
        let ast = result.ast();
        let statements = top_level(&result);
        assert_eq!(statements.len(), 1);

        let assign = statements[0];
        assert_eq!(ast.kind(assign), TokenKind::LeftAssign);
        let children = ast.children(assign);
        assert_eq!(children.len(), 2);
        assert_eq!(ast.text(children[0], "x <- 1"), "x");
        assert_eq!(ast.text(children[1], "x <- 1"), "1");
        assert_eq!(ast.text(assign, "x <- 1"), "x <- 1");
    }

    #[test]
    fn multiplication_nests_deeper_than_addition() {
        let source = "1 + 2 * 3";
        let result = parse_clean(source);
        let ast = result.ast();

        let plus = top_level(&result)[0];
        assert_eq!(ast.kind(plus), TokenKind::Plus);
        let children = ast.children(plus);
        assert_eq!(ast.text(children[0], source), "1");

        let times = children[1];
        assert_eq!(ast.kind(times), TokenKind::Multiply);
        assert_eq!(ast.text(times, source), "2 * 3");
    }

    #[test]
    fn exponentiation_is_right_associative() {
        let source = "2 ^ 3 ^ 2";
        let result = parse_clean(source);
        let ast = result.ast();

        let outer = top_level(&result)[0];
        assert_eq!(ast.kind(outer), TokenKind::Caret);
        let children = ast.children(outer);
        assert_eq!(ast.text(children[0], source), "2");
        assert_eq!(ast.text(children[1], source), "3 ^ 2");
    }

    #[test]
    fn assignment_is_right_associative() {
        let source = "x <- y <- 1";
        let result = parse_clean(source);
        let ast = result.ast();

        let outer = top_level(&result)[0];
        assert_eq!(ast.kind(outer), TokenKind::LeftAssign);
        let children = ast.children(outer);
        assert_eq!(ast.text(children[0], source), "x");

        let inner = children[1];
        assert_eq!(ast.kind(inner), TokenKind::LeftAssign);
        assert_eq!(ast.text(inner, source), "y <- 1");
    }

    #[test]
    fn addition_is_left_associative() {
        let source = "1 - 2 - 3";
        let result = parse_clean(source);
        let ast = result.ast();

        let outer = top_level(&result)[0];
        assert_eq!(ast.kind(outer), TokenKind::Minus);
        let children = ast.children(outer);
        assert_eq!(ast.text(children[0], source), "1 - 2");
        assert_eq!(ast.text(children[1], source), "3");
    }

    #[test]
    fn newline_suppressed_inside_parens() {
        let source = "f(1,\n2)";
        let result = parse_clean(source);
        let ast = result.ast();

        let statements = top_level(&result);
        assert_eq!(statements.len(), 1);

        let call = statements[0];
        assert_eq!(ast.kind(call), TokenKind::LeftParen);
        // callee + two arguments
        let children = ast.children(call);
        assert_eq!(children.len(), 3);
        assert_eq!(ast.text(children[0], source), "f");
        assert_eq!(ast.text(children[1], source), "1");
        assert_eq!(ast.text(children[2], source), "2");
    }

    #[test]
    fn newline_terminates_at_top_level() {
        let source = "1\n+2";
        let result = parse_clean(source);
        let ast = result.ast();

        let statements = top_level(&result);
        assert_eq!(statements.len(), 2);
        assert_eq!(ast.kind(statements[0]), TokenKind::Number);
        assert_eq!(ast.kind(statements[1]), TokenKind::Plus);
    }

    #[test]
    fn named_and_missing_arguments() {
        let source = "f(a = 1, , c)";
        let result = parse_clean(source);
        let ast = result.ast();

        let call = top_level(&result)[0];
        let children = ast.children(call);
        // callee, `a = 1`, missing, `c`
        assert_eq!(children.len(), 4);
        assert_eq!(ast.text(children[0], source), "f");

        let named = children[1];
        assert_eq!(ast.kind(named), TokenKind::EqualsAssign);
        let pair = ast.children(named);
        assert_eq!(ast.text(pair[0], source), "a");
        assert_eq!(ast.text(pair[1], source), "1");

        assert_eq!(ast.kind(children[2]), TokenKind::Missing);
        assert_eq!(ast.text(children[3], source), "c");
    }

    #[test]
    fn empty_call_placeholders() {
        let source = "f()";
        let result = parse_clean(source);
        let ast = result.ast();
        let call = top_level(&result)[0];
        let children = ast.children(call);
        assert_eq!(children.len(), 2);
        assert_eq!(ast.kind(children[1]), TokenKind::Empty);

        let source = "x[]";
        let result = parse_clean(source);
        let ast = result.ast();
        let index = top_level(&result)[0];
        let children = ast.children(index);
        assert_eq!(ast.kind(index), TokenKind::LeftBracket);
        assert_eq!(children.len(), 2);
        assert_eq!(ast.kind(children[1]), TokenKind::Missing);
    }

    #[test]
    fn call_chains_reopen_on_the_result() {
        let source = "f(1)(2)";
        let result = parse_clean(source);
        let ast = result.ast();

        let outer = top_level(&result)[0];
        assert_eq!(ast.kind(outer), TokenKind::LeftParen);
        let children = ast.children(outer);
        assert_eq!(ast.text(children[0], source), "f(1)");
        assert_eq!(ast.text(children[1], source), "2");

        let source = "x[1][2]";
        let result = parse_clean(source);
        let ast = result.ast();
        let outer = top_level(&result)[0];
        assert_eq!(ast.kind(outer), TokenKind::LeftBracket);
        assert_eq!(ast.text(ast.children(outer)[0], source), "x[1]");
    }

    #[test]
    fn indexing_forms() {
        let source = "x[[1]]";
        let result = parse_clean(source);
        let ast = result.ast();
        let index = top_level(&result)[0];
        assert_eq!(ast.kind(index), TokenKind::LeftDoubleBracket);
        assert_eq!(ast.text(index, source), "x[[1]]");
    }

    #[test]
    fn unary_operators_bind_tighter_than_sequence() {
        let source = "-1:2";
        let result = parse_clean(source);
        let ast = result.ast();

        let sequence = top_level(&result)[0];
        assert_eq!(ast.kind(sequence), TokenKind::Sequence);
        let children = ast.children(sequence);
        assert_eq!(ast.kind(children[0]), TokenKind::Minus);
        assert_eq!(ast.text(children[0], source), "-1");
    }

    #[test]
    fn semicolons_separate_statements() {
        let result = parse_clean("x <- 1; y <- 2");
        assert_eq!(top_level(&result).len(), 2);

        let result = parse_clean("{ 1; 2; 3 }");
        let ast = result.ast();
        let brace = top_level(&result)[0];
        assert_eq!(ast.children(brace).len(), 3);
    }

    #[test]
    fn semicolon_in_parens_is_an_error() {
        let result = parse("f(1; 2)");
        assert!(result.has_errors());
    }

    #[test]
    fn empty_braces_hold_a_placeholder() {
        let result = parse_clean("{}");
        let ast = result.ast();
        let brace = top_level(&result)[0];
        let children = ast.children(brace);
        assert_eq!(children.len(), 1);
        assert_eq!(ast.kind(children[0]), TokenKind::Empty);
    }

    #[test]
    fn empty_parens_are_an_error() {
        let result = parse("()");
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].message.contains("unexpected token ')'"));
    }

    #[test]
    fn truncated_if_reports_exactly_one_error() {
        let source = "if (x";
        let result = parse(source);
        assert_eq!(result.errors().len(), 1, "errors: {:?}", result.errors());
        assert!(result.errors()[0].message.contains("expected ')'"));

        // The tree still contains the if node with its condition.
        let ast = result.ast();
        let statements = ast.children(ast.root());
        assert_eq!(statements.len(), 1);
        let if_node = statements[0];
        assert_eq!(ast.kind(if_node), TokenKind::If);
        let children = ast.children(if_node);
        assert_eq!(ast.text(children[0], source), "x");
        assert_eq!(ast.kind(children[1]), TokenKind::Missing);
    }

    #[test]
    fn missing_operand_reports_an_error() {
        let result = parse("1 +");
        assert!(result.has_errors());
        let ast = result.ast();
        let plus = ast.children(ast.root())[0];
        assert_eq!(ast.kind(plus), TokenKind::Plus);
        assert_eq!(ast.kind(ast.children(plus)[1]), TokenKind::Missing);
    }

    #[test]
    fn depth_bound_is_reported_not_fatal() {
        let source = "(".repeat(64);
        let options = ParserOptions::new().with_max_depth(16);
        let result = parse_with_options(&source, options);
        assert!(result.has_errors());
        assert!(
            result
                .errors()
                .iter()
                .any(|error| error.message.contains("nesting"))
        );
    }

    #[test]
    fn node_index_maps_positions_to_nodes() {
        let source = "foo <- function(a = {1 + 2}) {}";
        let tokens = tokenize(source);
        let result = parse(source);

        let mut cursor = TokenCursor::new(&tokens, source);
        assert!(cursor.find_forward_text("="));
        let node = result.node_at(cursor.position()).unwrap();
        assert_eq!(result.ast().text(node, source), "a = {1 + 2}");

        assert!(cursor.find_forward_text("{"));
        let node = result.node_at(cursor.position()).unwrap();
        assert_eq!(result.ast().text(node, source), "{1 + 2}");
    }

    #[test]
    fn control_flow_corpus_parses_clean() {
        for source in [
            "if (x) y",
            "if (x) y else z",
            "if (x > 1) { y } else { z }",
            "while (TRUE) { next }",
            "while (x < 10) x <- x + 1",
            "for (i in 1:10) print(i)",
            "repeat { break }",
            "function(x) x + 1",
            "f <- function(a, b = 2, ...) a + b",
            "x[[\"name\"]]",
            "lst$field",
            "obj@slot",
            "pkg::fun(1)",
            "a %in% b",
            "y ~ x + 1",
            "?print",
            "x = 1",
            "`quoted name` <- 1",
        ] {
            let result = parse(source);
            assert!(
                result.errors().is_empty(),
                "unexpected errors for {source:?}: {:?}",
                result.errors()
            );
        }
    }

    #[test]
    fn standalone_else_is_an_error() {
        let result = parse("else");
        assert!(result.has_errors());
    }

    #[test]
    fn break_and_next_are_expressions() {
        let result = parse_clean("while (TRUE) break");
        let ast = result.ast();
        let while_node = top_level(&result)[0];
        let children = ast.children(while_node);
        assert_eq!(ast.kind(children[1]), TokenKind::Break);
    }

    #[test]
    fn spans_contain_descendant_spans() {
        let source = "f <- function(a = {1 + 2}) { if (a) g(a, 1) else h() }";
        let result = parse_clean(source);
        let ast = result.ast();
        for id in ast.ids() {
            let Some(span) = ast.span(id) else { continue };
            if let Some(parent) = ast.parent(id) {
                let parent_span = ast.span(parent).unwrap();
                assert!(parent_span.contains(span));
            }
        }
    }
}
