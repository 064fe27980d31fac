//! Concrete syntax tree nodes.
//!
//! Every token and every production becomes a `SyntaxNode`. Nodes live in a
//! `SyntaxArena` and reference their children through arena slices, so a
//! tree is immutable once built and is dropped wholesale with its arena.

use crate::fields::FieldName;
use crate::supertype::Supertype;
use crate::syntax_kind::SyntaxKind;
use rcst_core::text::{LineMap, TextPos, TextRange};
use rcst_diagnostics::Diagnostic;
use std::fmt;

bitflags::bitflags! {
    /// Flags for CST nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        const NONE      = 0;
        /// Trivia (comments) that may sit between any two siblings.
        const EXTRA     = 1 << 0;
        /// The node itself is erroneous.
        const ERROR     = 1 << 1;
        /// A zero-width leaf inserted in place of an expected token.
        const MISSING   = 1 << 2;
        /// Some descendant is erroneous or missing.
        const HAS_ERROR = 1 << 3;
        /// The position allowed more than one reading; the kind is the
        /// preferred one.
        const AMBIGUOUS = 1 << 4;
    }
}

/// A child slot: an optional field label and the child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Child<'a> {
    pub field: Option<FieldName>,
    pub node: &'a SyntaxNode<'a>,
}

/// A node of the concrete syntax tree.
#[derive(Clone, PartialEq, Eq)]
pub struct SyntaxNode<'a> {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) flags: NodeFlags,
    pub(crate) children: &'a [Child<'a>],
}

impl<'a> SyntaxNode<'a> {
    /// Create a leaf node for a token.
    pub fn leaf(kind: SyntaxKind, range: TextRange, flags: NodeFlags) -> Self {
        let mut flags = flags;
        if kind == SyntaxKind::ErrorSentinel {
            flags |= NodeFlags::ERROR;
        }
        Self {
            kind,
            range,
            flags,
            children: &[],
        }
    }

    /// A copy of this node with a different kind and the same children.
    pub fn with_kind(&self, kind: SyntaxKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// A copy of this node with `flags` added.
    pub fn with_flags(&self, flags: NodeFlags) -> Self {
        Self {
            flags: self.flags | flags,
            ..self.clone()
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// The grammar name of this node, as printed in S-expressions.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.range
    }

    #[inline]
    pub fn start(&self) -> TextPos {
        self.range.pos
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.range.end
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    #[inline]
    pub fn children(&self) -> &'a [Child<'a>] {
        self.children
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&'a SyntaxNode<'a>> {
        self.children.get(index).map(|c| c.node)
    }

    pub fn named_children(&self) -> impl Iterator<Item = &'a SyntaxNode<'a>> + 'a {
        self.children.iter().map(|c| c.node).filter(|n| n.is_named())
    }

    pub fn named_child(&self, index: usize) -> Option<&'a SyntaxNode<'a>> {
        self.named_children().nth(index)
    }

    /// The first child labeled with `field`.
    pub fn child_by_field(&self, field: FieldName) -> Option<&'a SyntaxNode<'a>> {
        self.children
            .iter()
            .find(|c| c.field == Some(field))
            .map(|c| c.node)
    }

    /// Every child labeled with `field`, in source order.
    pub fn children_by_field(
        &self,
        field: FieldName,
    ) -> impl Iterator<Item = &'a SyntaxNode<'a>> + 'a {
        self.children
            .iter()
            .filter(move |c| c.field == Some(field))
            .map(|c| c.node)
    }

    /// The field label of the child at `index`.
    pub fn field_of_child(&self, index: usize) -> Option<FieldName> {
        self.children.get(index).and_then(|c| c.field)
    }

    /// The source text this node covers.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.range.slice(source)
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        self.kind.is_named()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_extra(&self) -> bool {
        self.flags.contains(NodeFlags::EXTRA)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == SyntaxKind::Error || self.flags.contains(NodeFlags::ERROR)
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.flags.contains(NodeFlags::MISSING)
    }

    /// Whether this node or any descendant is an error or missing node.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.is_error() || self.is_missing() || self.flags.contains(NodeFlags::HAS_ERROR)
    }

    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.flags.contains(NodeFlags::AMBIGUOUS)
    }

    /// Whether this node's kind is a variant of `supertype`.
    #[inline]
    pub fn is_a(&self, supertype: Supertype) -> bool {
        supertype.contains(self.kind)
    }

    /// The smallest named descendant whose range contains `[start, end)`.
    pub fn descendant_for_range(&'a self, start: TextPos, end: TextPos) -> &'a SyntaxNode<'a> {
        let mut node = self;
        'descend: loop {
            for child in node.children {
                let r = child.node.range;
                if child.node.is_named() && r.pos <= start && end <= r.end {
                    node = child.node;
                    continue 'descend;
                }
            }
            return node;
        }
    }

    /// Total number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node.node_count()).sum::<usize>()
    }

    /// Render the named structure of this subtree as an S-expression.
    ///
    /// Anonymous tokens are omitted, fields are printed as `name:` prefixes
    /// and missing leaves as `(MISSING kind)`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(self, None, &mut out);
        out
    }
}

fn write_sexp(node: &SyntaxNode<'_>, field: Option<FieldName>, out: &mut String) {
    if !out.is_empty() {
        out.push(' ');
    }
    if let Some(field) = field {
        out.push_str(field.as_str());
        out.push_str(": ");
    }
    if node.is_missing() {
        out.push_str("(MISSING ");
        if node.is_named() {
            out.push_str(node.kind_name());
        } else {
            out.push('"');
            out.push_str(node.kind_name());
            out.push('"');
        }
        out.push(')');
        return;
    }
    out.push('(');
    out.push_str(node.kind_name());
    for child in node.children {
        if child.node.is_named() || child.node.is_missing() {
            write_sexp(child.node, child.field, out);
        }
    }
    out.push(')');
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.kind_name(), self.range)
    }
}

/// The result of parsing one source unit.
pub struct SyntaxTree<'a> {
    root: &'a SyntaxNode<'a>,
    source: &'a str,
    file_name: String,
    diagnostics: Vec<Diagnostic>,
    had_errors: bool,
}

impl<'a> SyntaxTree<'a> {
    pub fn new(
        root: &'a SyntaxNode<'a>,
        source: &'a str,
        file_name: String,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let had_errors = root.has_error() || diagnostics.iter().any(|d| d.is_error());
        Self {
            root,
            source,
            file_name,
            diagnostics,
            had_errors,
        }
    }

    #[inline]
    pub fn root(&self) -> &'a SyntaxNode<'a> {
        self.root
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether an error node, a missing node or an error diagnostic was
    /// produced.
    #[inline]
    pub fn had_errors(&self) -> bool {
        self.had_errors
    }

    /// The source text covered by `node`.
    pub fn text_of(&self, node: &SyntaxNode<'_>) -> &'a str {
        node.range.slice(self.source)
    }

    pub fn to_sexp(&self) -> String {
        self.root.to_sexp()
    }

    pub fn line_map(&self) -> LineMap {
        LineMap::new(self.source)
    }

    /// Render every diagnostic with `file:line:column` locations.
    pub fn render_diagnostics(&self) -> Vec<String> {
        let line_map = self.line_map();
        self.diagnostics
            .iter()
            .map(|d| d.render(&line_map))
            .collect()
    }
}

impl fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("file_name", &self.file_name)
            .field("root", &self.root)
            .field("had_errors", &self.had_errors)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NodeBuilder;
    use rcst_core::SyntaxArena;

    fn leaf<'a>(arena: &'a SyntaxArena, kind: SyntaxKind, pos: u32, end: u32) -> &'a SyntaxNode<'a> {
        arena.alloc(SyntaxNode::leaf(kind, TextRange::new(pos, end), NodeFlags::NONE))
    }

    #[test]
    fn test_fields_and_sexp() {
        // a + b
        let arena = SyntaxArena::new();
        let mut b = NodeBuilder::new(SyntaxKind::BinaryExpression);
        b.push_field(FieldName::Left, leaf(&arena, SyntaxKind::Identifier, 0, 1));
        b.push_field(FieldName::Operator, leaf(&arena, SyntaxKind::Plus, 2, 3));
        b.push_field(FieldName::Right, leaf(&arena, SyntaxKind::Identifier, 4, 5));
        let node = b.finish(&arena, 0);

        assert_eq!(node.range(), TextRange::new(0, 5));
        assert_eq!(node.child_by_field(FieldName::Right).map(|n| n.start()), Some(4));
        assert_eq!(node.named_children().count(), 2);
        assert_eq!(node.to_sexp(), "(binary_expression left: (identifier) right: (identifier))");
        assert_eq!(node.text("a + b"), "a + b");
        assert!(node.is_a(Supertype::Expression));
    }

    #[test]
    fn test_missing_and_error_propagation() {
        let arena = SyntaxArena::new();
        let mut b = NodeBuilder::new(SyntaxKind::ExpressionStatement);
        b.push(leaf(&arena, SyntaxKind::Identifier, 0, 1));
        b.push(arena.alloc(SyntaxNode::leaf(
            SyntaxKind::Semicolon,
            TextRange::empty(1),
            NodeFlags::MISSING,
        )));
        let stmt = b.finish(&arena, 0);
        assert!(stmt.has_error());
        assert!(!stmt.is_error());
        assert_eq!(stmt.to_sexp(), "(expression_statement (identifier) (MISSING \";\"))");

        let mut root = NodeBuilder::new(SyntaxKind::SourceFile);
        root.push(stmt);
        let root = root.finish(&arena, 0);
        let tree = SyntaxTree::new(root, "x", "a.rs".to_string(), Vec::new());
        assert!(tree.had_errors());
    }

    #[test]
    fn test_descendant_for_range() {
        let arena = SyntaxArena::new();
        let mut inner = NodeBuilder::new(SyntaxKind::CallExpression);
        inner.push_field(FieldName::Function, leaf(&arena, SyntaxKind::Identifier, 0, 1));
        let mut args = NodeBuilder::new(SyntaxKind::Arguments);
        args.push(leaf(&arena, SyntaxKind::OpenParen, 1, 2));
        args.push(leaf(&arena, SyntaxKind::CloseParen, 2, 3));
        inner.push_field(FieldName::Arguments, args.finish(&arena, 1));
        let call = inner.finish(&arena, 0);

        assert_eq!(call.descendant_for_range(0, 1).kind(), SyntaxKind::Identifier);
        assert_eq!(call.descendant_for_range(1, 2).kind(), SyntaxKind::Arguments);
        assert_eq!(call.descendant_for_range(0, 3).kind(), SyntaxKind::CallExpression);
        assert_eq!(call.node_count(), 5);
    }
}
