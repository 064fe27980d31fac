//! Tree traversal.
//!
//! Provides a `Visitor` trait with enter/leave hooks and a preorder iterator
//! over every node of a subtree.

use crate::fields::FieldName;
use crate::tree::SyntaxNode;

/// What a visitor wants to happen after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent {
    /// Visit the node's children.
    Continue,
    /// Skip the node's children; `leave` is still called.
    SkipChildren,
}

/// A visitor over a concrete syntax tree. Default implementations walk into
/// every child.
pub trait Visitor<'a> {
    fn enter(&mut self, _node: &'a SyntaxNode<'a>, _field: Option<FieldName>) -> WalkEvent {
        WalkEvent::Continue
    }

    fn leave(&mut self, _node: &'a SyntaxNode<'a>) {}
}

/// Drive `visitor` over `node` and its descendants in source order.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, node: &'a SyntaxNode<'a>) {
    walk_child(visitor, node, None);
}

fn walk_child<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    node: &'a SyntaxNode<'a>,
    field: Option<FieldName>,
) {
    if visitor.enter(node, field) == WalkEvent::Continue {
        for child in node.children() {
            walk_child(visitor, child.node, child.field);
        }
    }
    visitor.leave(node);
}

/// Preorder iterator over a subtree.
pub struct Preorder<'a> {
    stack: Vec<&'a SyntaxNode<'a>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a SyntaxNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|c| c.node));
        Some(node)
    }
}

/// Iterate over `node` and every descendant in preorder.
pub fn preorder<'a>(node: &'a SyntaxNode<'a>) -> Preorder<'a> {
    Preorder { stack: vec![node] }
}

/// Iterate over the leaves under `node` in source order.
pub fn leaves<'a>(node: &'a SyntaxNode<'a>) -> impl Iterator<Item = &'a SyntaxNode<'a>> {
    preorder(node).filter(|n| n.is_leaf())
}
