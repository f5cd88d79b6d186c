// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing: precedence climbing, continuations, and call
//! argument lists.
//!
//! `parse_expression` first parses a prefix/primary term, then repeatedly
//! folds infix and postfix continuations whose precedence exceeds the
//! caller's minimum. Right-associative operators recurse at
//! `precedence - 1`, so assignment chains and exponentiation nest to the
//! right. Call-opening brackets are continuations too: `f(x)` is the `(`
//! node with the callee and arguments as children, and a closed call can
//! reopen (`f()()`, `x[1][2]`).

use tracing::trace;

use super::precedence;
use super::{Parser, ParseState};
use crate::ast::NodeId;
use crate::token::TokenKind;

impl Parser<'_> {
    /// Parses one expression, folding continuations while their precedence
    /// exceeds `min_precedence`. Returns `None` at the end of input.
    pub(super) fn parse_expression(&mut self, min_precedence: u8) -> Option<NodeId> {
        if self.depth >= self.max_depth {
            self.error_at_current("maximum expression nesting depth exceeded");
            let position = self.current.position();
            return Some(self.error_node(position));
        }
        self.depth += 1;
        let result = self.parse_expression_inner(min_precedence);
        self.depth -= 1;
        result
    }

    fn parse_expression_inner(&mut self, min_precedence: u8) -> Option<NodeId> {
        let mut node = self.parse_expression_start()?;
        while self.can_continue(min_precedence) {
            node = self.parse_continuation(node);
        }
        Some(node)
    }

    /// Parses an expression where one is required; at the end of input,
    /// reports the error and substitutes a `Missing` placeholder.
    pub(super) fn parse_nonempty_expression(&mut self, min_precedence: u8) -> NodeId {
        if self.check_unexpected_end() {
            return self.missing_node();
        }
        match self.parse_expression(min_precedence) {
            Some(node) => node,
            None => self.missing_node(),
        }
    }

    /// Parses the prefix/primary term an expression starts with.
    fn parse_expression_start(&mut self) -> Option<NodeId> {
        self.skip_semicolons();
        let kind = self.current.kind();
        trace!(?kind, "parse_expression_start");

        match kind {
            TokenKind::If => Some(self.parse_if()),
            TokenKind::While => Some(self.parse_while()),
            TokenKind::For => Some(self.parse_for()),
            TokenKind::Repeat => Some(self.parse_repeat()),
            TokenKind::Function => Some(self.parse_function_definition()),
            TokenKind::LeftBrace => Some(self.parse_braced_expression()),
            TokenKind::LeftParen => Some(self.parse_parenthesized_expression()),
            TokenKind::End => None,
            // `else` and `in` only appear inside their parent constructs.
            TokenKind::Else | TokenKind::In => {
                let token = self.consume();
                self.error_unexpected_token(&token);
                Some(self.error_node(token.position()))
            }
            kind if kind.is_unary_operator() => Some(self.parse_unary_operator()),
            kind if kind.is_symbolic() || kind.is_keyword() => {
                let token = self.consume();
                Some(self.node_from_token(token))
            }
            _ => {
                let token = self.consume();
                self.error_unexpected_token(&token);
                Some(self.error_node(token.position()))
            }
        }
    }

    /// Parses a unary prefix operator and its operand.
    fn parse_unary_operator(&mut self) -> NodeId {
        let token = self.consume();
        let operand_precedence = precedence::unary(token.kind());
        let node = self.node_from_token(token);
        let operand = self.parse_nonempty_expression(operand_precedence);
        self.ast.add_child(node, operand);
        node
    }

    /// An expression continues onto the next token only when that token
    /// binds tighter than `min_precedence` and — outside of parentheses —
    /// sits on the same row as the previous token. The row condition is what
    /// makes a newline terminate a statement at top level and inside braces.
    fn can_continue(&self, min_precedence: u8) -> bool {
        min_precedence < precedence::binary(self.current.kind())
            && (self.state == ParseState::Paren
                || self.previous.position().row == self.current.position().row)
    }

    /// Folds one infix or postfix continuation onto `lhs`.
    fn parse_continuation(&mut self, lhs: NodeId) -> NodeId {
        if self.current.kind().is_call_operator() {
            return self.parse_call(lhs);
        }

        let token = self.consume();
        let kind = token.kind();
        let node = self.node_from_token(token);
        self.ast.add_child(node, lhs);

        let min_precedence =
            precedence::binary(kind) - u8::from(precedence::is_right_associative(kind));
        let rhs = self.parse_nonempty_expression(min_precedence);
        self.ast.add_child(node, rhs);
        node
    }

    /// Parses a call or index continuation: `f(...)`, `x[...]`, `x[[...]]`.
    ///
    /// The node wraps the opening bracket; its first child is the callee and
    /// the rest are arguments. Arguments may be bare expressions, named
    /// `name = value` pairs, or placeholders where an argument was omitted.
    fn parse_call(&mut self, lhs: NodeId) -> NodeId {
        let opener = self.current.kind();
        trace!(?opener, "parse_call");
        let Some(closer) = opener.complement() else {
            return lhs;
        };

        let token = self.consume();
        let node = self.node_from_token(token);
        self.ast.add_child(node, lhs);

        let saved = self.state;
        self.state = ParseState::Paren;

        if self.current.kind() == closer {
            // `f()` passes nothing; `x[]` and `x[[]]` have one missing
            // subscript.
            let kind = if opener == TokenKind::LeftParen {
                TokenKind::Empty
            } else {
                TokenKind::Missing
            };
            let position = self.current.position();
            let placeholder = self.placeholder_node(kind, position);
            self.ast.add_child(node, placeholder);
        } else {
            loop {
                if self.check_unexpected_end() {
                    break;
                }
                let argument = self.parse_call_argument(closer);
                self.ast.add_child(node, argument);

                if self.current.kind() == TokenKind::Comma {
                    self.advance();
                    continue;
                }
                if self.current.kind() == closer {
                    break;
                }
                if self.at_end() {
                    self.error_expected(closer);
                    break;
                }
                let message = format!("expected ',' or '{closer}'");
                self.error_at_current(message);
            }
        }

        if self.current.kind() == closer {
            let closing = self.consume();
            self.ast.extend_to_token(node, &closing);
        }
        self.state = saved;

        if self.current.kind().is_call_operator() && self.can_continue(0) {
            return self.parse_call(node);
        }
        node
    }

    /// Parses one call argument, with `closer` the bracket that ends the
    /// argument list.
    fn parse_call_argument(&mut self, closer: TokenKind) -> NodeId {
        // Two adjacent commas, or a comma directly against the closer,
        // stand for an omitted argument.
        if self.current.kind() == TokenKind::Comma || self.current.kind() == closer {
            return self.missing_node();
        }

        // A name is captured only when the very next significant token is a
        // single `=`.
        if self.peek_significant().kind() == TokenKind::EqualsAssign {
            let name_token = self.consume();
            let name = self.node_from_token(name_token);
            let equals_token = self.consume();
            let equals = self.node_from_token(equals_token);
            self.ast.add_child(equals, name);

            if self.current.kind() == TokenKind::Comma || self.current.kind() == closer {
                let missing = self.missing_node();
                self.ast.add_child(equals, missing);
            } else {
                let value = self.parse_nonempty_expression(0);
                self.ast.add_child(equals, value);
            }
            return equals;
        }

        self.parse_nonempty_expression(0)
    }
}
