// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Control-flow constructs, braced blocks, parenthesized expressions, and
//! function definitions.
//!
//! Each routine consumes its keyword, parses the required `(...)` header
//! with the parse state switched to `Paren` (newlines are insignificant
//! inside a header), restores the state, and parses the body as one —
//! possibly braced — expression.
//!
//! When a construct is cut off at the end of input after its header, the
//! missing closer is reported once and a `Missing` placeholder stands in
//! for the body; the routine returns without piling further end-of-input
//! errors on top.

use tracing::trace;

use super::{Parser, ParseState};
use crate::ast::NodeId;
use crate::token::TokenKind;

impl Parser<'_> {
    /// Parses `if (condition) body [else alternative]`.
    pub(super) fn parse_if(&mut self) -> NodeId {
        trace!("parse_if");
        let token = self.consume();
        let node = self.node_from_token(token);

        self.check_and_advance(TokenKind::LeftParen, false);
        let saved = self.state;
        self.state = ParseState::Paren;
        let condition = self.parse_nonempty_expression(0);
        self.ast.add_child(node, condition);
        self.state = saved;

        if !self.check_and_advance(TokenKind::RightParen, false) && self.at_end() {
            let missing = self.missing_node();
            self.ast.add_child(node, missing);
            return node;
        }

        let body = self.parse_nonempty_expression(0);
        self.ast.add_child(node, body);

        if self.current.kind() == TokenKind::Else {
            self.advance();
            let alternative = self.parse_nonempty_expression(0);
            self.ast.add_child(node, alternative);
        }
        node
    }

    /// Parses `while (condition) body`.
    pub(super) fn parse_while(&mut self) -> NodeId {
        trace!("parse_while");
        let token = self.consume();
        let node = self.node_from_token(token);

        self.check_and_advance(TokenKind::LeftParen, false);
        let saved = self.state;
        self.state = ParseState::Paren;
        let condition = self.parse_nonempty_expression(0);
        self.ast.add_child(node, condition);
        self.state = saved;

        if !self.check_and_advance(TokenKind::RightParen, false) && self.at_end() {
            let missing = self.missing_node();
            self.ast.add_child(node, missing);
            return node;
        }

        let body = self.parse_nonempty_expression(0);
        self.ast.add_child(node, body);
        node
    }

    /// Parses `for (variable in iterable) body`.
    pub(super) fn parse_for(&mut self) -> NodeId {
        trace!("parse_for");
        let token = self.consume();
        let node = self.node_from_token(token);

        self.check_and_advance(TokenKind::LeftParen, false);
        let saved = self.state;
        self.state = ParseState::Paren;

        self.check(TokenKind::Symbol);
        let variable_token = self.consume();
        let variable = self.node_from_token(variable_token);
        self.ast.add_child(node, variable);

        self.check_and_advance(TokenKind::In, false);
        let iterable = self.parse_nonempty_expression(0);
        self.ast.add_child(node, iterable);
        self.state = saved;

        if !self.check_and_advance(TokenKind::RightParen, false) && self.at_end() {
            let missing = self.missing_node();
            self.ast.add_child(node, missing);
            return node;
        }

        let body = self.parse_nonempty_expression(0);
        self.ast.add_child(node, body);
        node
    }

    /// Parses `repeat body`.
    pub(super) fn parse_repeat(&mut self) -> NodeId {
        trace!("parse_repeat");
        let token = self.consume();
        let node = self.node_from_token(token);
        let body = self.parse_nonempty_expression(0);
        self.ast.add_child(node, body);
        node
    }

    /// Parses `function(formals) body`.
    pub(super) fn parse_function_definition(&mut self) -> NodeId {
        trace!("parse_function_definition");
        let token = self.consume();
        let node = self.node_from_token(token);

        self.check_and_advance(TokenKind::LeftParen, false);
        let saved = self.state;
        self.state = ParseState::Paren;
        let formals = self.parse_formal_list();
        self.ast.add_child(node, formals);
        self.state = saved;

        if !self.check_and_advance(TokenKind::RightParen, false) && self.at_end() {
            let missing = self.missing_node();
            self.ast.add_child(node, missing);
            return node;
        }

        let body = self.parse_nonempty_expression(0);
        self.ast.add_child(node, body);
        node
    }

    /// Parses a function's formal argument list into a synthetic container
    /// node. A bare formal is a symbol leaf; a defaulted formal parses as a
    /// `name = default` subtree.
    fn parse_formal_list(&mut self) -> NodeId {
        let position = self.current.position();
        let list = self.placeholder_node(TokenKind::Empty, position);
        if self.current.kind() == TokenKind::RightParen {
            return list;
        }

        loop {
            if self.check_unexpected_end() {
                break;
            }
            let formal = self.parse_formal();
            self.ast.add_child(list, formal);

            if self.current.kind() == TokenKind::RightParen {
                break;
            }
            if self.current.kind() == TokenKind::Comma {
                self.advance();
                continue;
            }
            if self.at_end() {
                continue;
            }
            self.error_at_current("expected ',' or ')'");
        }
        list
    }

    /// Parses one formal argument.
    fn parse_formal(&mut self) -> NodeId {
        self.check(TokenKind::Symbol);

        let lookahead = self.peek_significant().kind();
        if matches!(lookahead, TokenKind::Comma | TokenKind::RightParen) {
            let token = self.consume();
            return self.node_from_token(token);
        }
        if lookahead == TokenKind::EqualsAssign {
            return self.parse_nonempty_expression(0);
        }
        if lookahead.is_operator() {
            let lookahead_token = self.peek_significant().clone();
            self.errors.push(super::ParseError::at_token(
                &lookahead_token,
                "expected '=', ',' or ')' following an argument name",
            ));
        }
        self.parse_nonempty_expression(0)
    }

    /// Parses a `{...}` block: statements separated by newlines or
    /// semicolons, with an `Empty` placeholder child when the block holds
    /// nothing.
    pub(super) fn parse_braced_expression(&mut self) -> NodeId {
        trace!("parse_braced_expression");
        let token = self.consume();
        let node = self.node_from_token(token);

        let saved = self.state;
        self.state = ParseState::Brace;
        self.skip_semicolons();

        if self.current.kind() == TokenKind::RightBrace {
            let position = self.current.position();
            let empty = self.placeholder_node(TokenKind::Empty, position);
            self.ast.add_child(node, empty);
        } else {
            while self.current.kind() != TokenKind::RightBrace {
                if self.check_unexpected_end() {
                    break;
                }
                let statement = self.parse_nonempty_expression(0);
                self.ast.add_child(node, statement);
                self.skip_semicolons();
            }
        }
        self.state = saved;

        if self.current.kind() == TokenKind::RightBrace {
            let closing = self.consume();
            self.ast.extend_to_token(node, &closing);
        }
        node
    }

    /// Parses a `(...)` grouping. An empty `()` is reported — a
    /// parenthesized expression requires an inner expression.
    pub(super) fn parse_parenthesized_expression(&mut self) -> NodeId {
        trace!("parse_parenthesized_expression");
        let token = self.consume();
        let node = self.node_from_token(token);

        let saved = self.state;
        self.state = ParseState::Paren;
        if self.current.kind() == TokenKind::RightParen {
            let unexpected = self.current.clone();
            self.error_unexpected_token(&unexpected);
        } else {
            let inner = self.parse_nonempty_expression(0);
            self.ast.add_child(node, inner);
        }
        self.state = saved;

        if self.current.kind() == TokenKind::RightParen {
            let closing = self.consume();
            self.ast.extend_to_token(node, &closing);
        } else {
            self.error_expected(TokenKind::RightParen);
            if !self.at_end() {
                self.advance();
            }
        }
        node
    }
}
