//! The tree builder.
//!
//! A `NodeBuilder` collects the children of one production while the parser
//! recognizes it, then allocates the finished node in the arena. Ranges and
//! error propagation are derived from the children, never set by hand.

use crate::fields::FieldName;
use crate::syntax_kind::SyntaxKind;
use crate::tree::{Child, NodeFlags, SyntaxNode};
use rcst_core::text::{TextPos, TextRange};
use rcst_core::SyntaxArena;

/// Collects children for a node under construction.
#[derive(Debug)]
pub struct NodeBuilder<'a> {
    kind: SyntaxKind,
    flags: NodeFlags,
    children: Vec<Child<'a>>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            flags: NodeFlags::NONE,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Change the kind of the node being built. Used when a later token
    /// decides which production the collected children belong to.
    pub fn set_kind(&mut self, kind: SyntaxKind) {
        self.kind = kind;
    }

    pub fn add_flags(&mut self, flags: NodeFlags) {
        self.flags |= flags;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn push(&mut self, node: &'a SyntaxNode<'a>) {
        self.children.push(Child { field: None, node });
    }

    pub fn push_field(&mut self, field: FieldName, node: &'a SyntaxNode<'a>) {
        self.children.push(Child {
            field: Some(field),
            node,
        });
    }

    pub fn push_child(&mut self, child: Child<'a>) {
        self.children.push(child);
    }

    pub fn extend(&mut self, children: impl IntoIterator<Item = Child<'a>>) {
        self.children.extend(children);
    }

    /// The most recently pushed child that is not trivia.
    pub fn last_significant(&self) -> Option<&'a SyntaxNode<'a>> {
        self.children
            .iter()
            .rev()
            .map(|c| c.node)
            .find(|n| !n.is_extra())
    }

    /// Whether any collected child is an error or contains one.
    pub fn has_error(&self) -> bool {
        self.children.iter().any(|c| c.node.has_error())
    }

    /// Drop every field label. Error nodes carry no fields.
    pub fn clear_fields(&mut self) {
        for child in &mut self.children {
            child.field = None;
        }
    }

    /// Remove and return every child from `index` on.
    pub fn split_off(&mut self, index: usize) -> Vec<Child<'a>> {
        self.children.split_off(index)
    }

    /// Allocate the node. An empty builder yields a zero-width node at `pos`.
    pub fn finish(self, arena: &'a SyntaxArena, pos: TextPos) -> &'a SyntaxNode<'a> {
        // Missing leaves sit at the end of the previous token and may
        // precede comments already collected, so every child counts.
        let range = self
            .children
            .iter()
            .map(|c| c.node.range)
            .reduce(|a, b| a.cover(b))
            .unwrap_or(TextRange::empty(pos));
        self.finish_with_range(arena, range)
    }

    /// Allocate the node with an explicit range covering its children.
    ///
    /// The root uses this so that it spans the whole input, including
    /// whitespace before the first token and after the last one.
    pub fn finish_with_range(self, arena: &'a SyntaxArena, range: TextRange) -> &'a SyntaxNode<'a> {
        let mut flags = self.flags;
        if self.kind == SyntaxKind::Error {
            flags |= NodeFlags::ERROR;
        }
        if self.children.iter().any(|c| c.node.has_error()) {
            flags |= NodeFlags::HAS_ERROR;
        }
        debug_assert!(self
            .children
            .iter()
            .all(|c| range.contains_range(c.node.range)));
        arena.alloc(SyntaxNode {
            kind: self.kind,
            range,
            flags,
            children: arena.alloc_vec(self.children),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_is_zero_width() {
        let arena = SyntaxArena::new();
        let node = NodeBuilder::new(SyntaxKind::Parameters).finish(&arena, 7);
        assert_eq!(node.range(), TextRange::empty(7));
        assert!(node.is_leaf());
    }

    #[test]
    fn test_error_node_clears_fields() {
        let arena = SyntaxArena::new();
        let mut b = NodeBuilder::new(SyntaxKind::Parameters);
        b.push_field(
            FieldName::Pattern,
            arena.alloc(SyntaxNode::leaf(
                SyntaxKind::Identifier,
                TextRange::new(3, 4),
                NodeFlags::NONE,
            )),
        );
        b.set_kind(SyntaxKind::Error);
        b.clear_fields();
        let node = b.finish(&arena, 0);
        assert!(node.is_error());
        assert_eq!(node.child_by_field(FieldName::Pattern), None);
        assert_eq!(node.to_sexp(), "(ERROR (identifier))");
    }

    #[test]
    fn test_last_significant_skips_trivia() {
        let arena = SyntaxArena::new();
        let mut b = NodeBuilder::new(SyntaxKind::Block);
        let ident = arena.alloc(SyntaxNode::leaf(
            SyntaxKind::Identifier,
            TextRange::new(0, 1),
            NodeFlags::NONE,
        ));
        b.push(ident);
        b.push(arena.alloc(SyntaxNode::leaf(
            SyntaxKind::LineComment,
            TextRange::new(2, 6),
            NodeFlags::EXTRA,
        )));
        assert_eq!(b.last_significant().map(|n| n.kind()), Some(SyntaxKind::Identifier));
    }
}
