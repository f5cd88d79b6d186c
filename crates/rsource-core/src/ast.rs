// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Arena-backed syntax tree.
//!
//! Nodes live in a single [`Ast`] arena and are addressed by [`NodeId`]
//! index. The arena owns every node; a node's `parent` is stored as an
//! index, never a pointer, so reparenting during error recovery cannot
//! dangle and the whole tree is dropped together when the caller discards
//! the [`Ast`].
//!
//! Every node wraps one [`Token`] and an ordered list of children. Attaching
//! a child widens the byte span and position range of the entire ancestor
//! chain monotonically — a span never shrinks, and a node's span always
//! contains the spans of all its descendants. Placeholder nodes (those
//! wrapping synthetic tokens) carry no span and do not participate in
//! widening.

use crate::location::{Position, Range, Span};
use crate::token::{Token, TokenKind};

/// An index addressing a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node's storage inside the arena.
#[derive(Debug)]
struct NodeData {
    token: Token,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Byte extent covered by this node's token and descendants; `None`
    /// while the node covers no buffer text.
    span: Option<Span>,
    /// Position extent, widened in lockstep with `span`.
    range: Option<Range>,
}

/// A syntax tree produced by the parser.
///
/// The tree always has a synthetic root node whose children are the
/// top-level expressions of the program.
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Ast {
    /// Creates an empty tree containing only the synthetic root.
    #[must_use]
    pub fn new() -> Self {
        let mut ast = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = ast.add_node(Token::placeholder(TokenKind::Root, Position::new(0, 0)));
        ast.root = root;
        ast
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds nothing but the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterates over every node id in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        let count = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        (0..count).map(NodeId)
    }

    /// Creates a detached node wrapping `token`.
    pub fn add_node(&mut self, token: Token) -> NodeId {
        let (span, range) = if token.is_synthetic() {
            (None, None)
        } else {
            (
                Some(token.span()),
                Some(Range::new(token.position(), token.end_position())),
            )
        };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the arena never holds more nodes than the buffer has bytes"
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            token,
            parent: None,
            children: Vec::new(),
            span,
            range,
        });
        id
    }

    /// Appends `child` to `parent`'s children.
    ///
    /// If the child already has a parent it is detached from it first — no
    /// node ever has two parents. The child's extent (if any) widens the
    /// ancestor chain.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child, "a node cannot parent itself");

        if let Some(previous) = self.nodes[child.index()].parent {
            self.nodes[previous.index()]
                .children
                .retain(|&sibling| sibling != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);

        let child_data = &self.nodes[child.index()];
        if let (Some(span), Some(range)) = (child_data.span, child_data.range) {
            self.widen(parent, span, range);
        }
    }

    /// Widens `id` and every ancestor to cover `token`.
    ///
    /// Used for closing delimiters, which terminate a construct without
    /// becoming children of its node. Synthetic tokens are ignored.
    pub fn extend_to_token(&mut self, id: NodeId, token: &Token) {
        if token.is_synthetic() {
            return;
        }
        self.widen(
            id,
            token.span(),
            Range::new(token.position(), token.end_position()),
        );
    }

    /// Merges `span`/`range` into `start` and its ancestor chain.
    fn widen(&mut self, start: NodeId, span: Span, range: Range) {
        let mut next = Some(start);
        while let Some(id) = next {
            let data = &mut self.nodes[id.index()];
            data.span = Some(match data.span {
                Some(existing) => existing.merge(span),
                None => span,
            });
            data.range = Some(match data.range {
                Some(existing) => existing.merge(range),
                None => range,
            });
            next = data.parent;
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the token a node wraps.
    #[must_use]
    pub fn token(&self, id: NodeId) -> &Token {
        &self.nodes[id.index()].token
    }

    /// Returns the kind of the token a node wraps.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> TokenKind {
        self.nodes[id.index()].token.kind()
    }

    /// Returns a node's children, in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Returns a node's parent, if it has one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Returns the byte extent a node covers, or `None` for placeholder
    /// nodes with no buffer-backed content.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.nodes[id.index()].span
    }

    /// Returns the position extent a node covers.
    #[must_use]
    pub fn range(&self, id: NodeId) -> Option<Range> {
        self.nodes[id.index()].range
    }

    /// Slices the source text a node covers; empty for placeholder nodes.
    #[must_use]
    pub fn text<'src>(&self, id: NodeId, source: &'src str) -> &'src str {
        match self.span(id) {
            Some(span) => &source[span.as_range()],
            None => "",
        }
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}
