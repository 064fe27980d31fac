//! Patterns.

use rcst_syntax::{FieldName, NodeBuilder, SyntaxKind, SyntaxNode};

use crate::conflicts::ConflictId;

use crate::parser::Parser;

const PATTERN_LIST_SYNC: &[SyntaxKind] = &[
    SyntaxKind::Semicolon,
    SyntaxKind::CloseBrace,
    SyntaxKind::FatArrow,
    SyntaxKind::Eq,
];

impl<'a> Parser<'a> {
    pub(crate) fn at_pattern_start(&self) -> bool {
        use SyntaxKind::*;
        matches!(
            self.current(),
            Identifier
                | SelfTypeKw
                | SelfKw
                | SuperKw
                | CrateKw
                | ColonColon
                | Lt
                | Metavariable
                | Underscore
                | DotDot
                | DotDotEq
                | OpenParen
                | OpenBracket
                | Amp
                | AmpAmp
                | RefKw
                | MutKw
                | Minus
                | Pipe
                | IntegerToken
                | FloatToken
                | StringToken
                | RawStringToken
                | CharToken
                | TrueKw
                | FalseKw
        )
    }

    /// A pattern, alternatives included: `Some(x) | None`.
    pub(crate) fn parse_pattern(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        self.guarded(|p| p.parse_or_pattern(parent))
    }

    fn parse_or_pattern(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        let mut node = if self.at(SyntaxKind::Pipe) {
            let mut b = NodeBuilder::new(SyntaxKind::OrPattern);
            self.bump(&mut b);
            let first = self.parse_single_pattern(&mut b);
            b.push(first);
            self.finish(b)
        } else {
            self.parse_single_pattern(parent)
        };
        while self.at(SyntaxKind::Pipe) {
            let mut b = NodeBuilder::new(SyntaxKind::OrPattern);
            b.push(node);
            self.bump(&mut b);
            let next = self.parse_single_pattern(&mut b);
            b.push(next);
            node = self.finish(b);
        }
        node
    }

    /// A pattern without top-level alternatives, as in closure parameters
    /// where `|` ends the list.
    pub(crate) fn parse_single_pattern(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let node = self.guarded(|p| p.parse_pattern_inner(parent));
        if self.at(SyntaxKind::At) {
            let mut b = NodeBuilder::new(SyntaxKind::CapturedPattern);
            b.push(node);
            self.bump(&mut b);
            let sub = self.parse_single_pattern(&mut b);
            b.push(sub);
            return self.finish(b);
        }
        node
    }

    fn parse_pattern_inner(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        match self.current() {
            Underscore => self.leaf(parent, None),
            DotDot => {
                if self.at_range_bound_after(1) {
                    return self.parse_prefix_range_pattern();
                }
                let mut b = NodeBuilder::new(RestPattern);
                self.bump(&mut b);
                self.finish(b)
            }
            DotDotEq => self.parse_prefix_range_pattern(),
            OpenParen => self.parse_tuple_pattern(),
            OpenBracket => {
                let mut b = NodeBuilder::new(SlicePattern);
                self.parse_pattern_list(&mut b, OpenBracket, CloseBracket);
                self.finish(b)
            }
            Amp | AmpAmp => self.parse_reference_pattern(),
            RefKw => {
                let mut b = NodeBuilder::new(RefPattern);
                self.bump(&mut b);
                let sub = self.parse_single_pattern(&mut b);
                b.push(sub);
                self.finish(b)
            }
            MutKw => {
                let mut b = NodeBuilder::new(MutPattern);
                self.bump(&mut b);
                let sub = self.parse_single_pattern(&mut b);
                b.push(sub);
                self.finish(b)
            }
            Minus | IntegerToken | FloatToken | StringToken | RawStringToken | CharToken | TrueKw
            | FalseKw => {
                let literal = self.parse_literal_pattern(parent);
                self.parse_range_pattern_rest(literal)
            }
            Metavariable if !self.next_is(ColonColon) && !self.next_is(Bang) => self.leaf(parent, None),
            Identifier | SelfTypeKw | SelfKw | SuperKw | CrateKw | ColonColon | Lt | Shl | Metavariable => {
                self.parse_path_pattern(parent)
            }
            _ => {
                self.error_expected("pattern");
                self.missing(Identifier)
            }
        }
    }

    fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.nth(1) == kind
    }

    fn parse_literal_pattern(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        if self.at(SyntaxKind::Minus) {
            let mut b = NodeBuilder::new(SyntaxKind::NegativeLiteral);
            self.bump(&mut b);
            let literal = self.parse_literal(&mut b);
            b.push(literal);
            return self.finish(b);
        }
        self.parse_literal(parent)
    }

    fn parse_path_pattern(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let path = self.parse_expression_path(parent);
        match self.current() {
            OpenParen => {
                let mut b = NodeBuilder::new(TupleStructPattern);
                b.push_field(FieldName::Type, path);
                self.parse_pattern_list(&mut b, OpenParen, CloseParen);
                self.finish(b)
            }
            OpenBrace => self.parse_struct_pattern(path),
            Bang if self.nth(1).is_open_delimiter() => self.parse_macro_invocation(path),
            _ => self.parse_range_pattern_rest(path),
        }
    }

    /// `()` and `(a, b, ..)`.
    fn parse_tuple_pattern(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::TuplePattern);
        if self.nth(1) == SyntaxKind::CloseParen {
            self.resolved(ConflictId::UnitTypeVsUnitPattern, SyntaxKind::TuplePattern);
        }
        self.parse_pattern_list(&mut b, SyntaxKind::OpenParen, SyntaxKind::CloseParen);
        self.finish(b)
    }

    fn parse_pattern_list(&mut self, b: &mut NodeBuilder<'a>, open: SyntaxKind, close: SyntaxKind) {
        self.parse_list(
            b,
            open,
            close,
            PATTERN_LIST_SYNC,
            |p| p.at_pattern_start(),
            |p, list| {
                let pattern = p.parse_pattern(list);
                list.push(pattern);
            },
        );
    }

    fn parse_reference_pattern(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::ReferencePattern);
        if self.at(SyntaxKind::AmpAmp) {
            self.scanner.split_token(SyntaxKind::Amp);
            self.bump(&mut b);
            let inner = self.guarded(|p| p.parse_reference_pattern());
            b.push(inner);
            return self.finish(b);
        }
        self.bump(&mut b);
        if self.at(SyntaxKind::MutKw) {
            self.bump(&mut b);
        }
        let sub = self.parse_single_pattern(&mut b);
        b.push(sub);
        self.finish(b)
    }

    /// `S { a, b: ref c, .. }`.
    fn parse_struct_pattern(&mut self, path: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(StructPattern);
        b.push_field(FieldName::Type, self.retag_as_type(path));
        self.parse_list(
            &mut b,
            OpenBrace,
            CloseBrace,
            &[Semicolon],
            |p| p.at_any(&[Identifier, IntegerToken, RefKw, MutKw, DotDot, Pound]),
            |p, list| {
                while p.at(Pound) {
                    let attr = p.parse_attribute_item(list);
                    list.push(attr);
                }
                let field = p.parse_field_pattern(list);
                list.push(field);
            },
        );
        self.finish(b)
    }

    fn parse_field_pattern(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        if self.at(DotDot) {
            let mut b = NodeBuilder::new(RemainingFieldPattern);
            self.bump(&mut b);
            return self.finish(b);
        }
        let mut b = NodeBuilder::new(FieldPattern);
        if self.at(RefKw) {
            self.bump(&mut b);
        }
        if self.at(MutKw) {
            self.bump(&mut b);
        }
        if self.nth(1) == Colon && (self.at(Identifier) || self.at(IntegerToken)) {
            if self.at(IntegerToken) {
                let index = self.parse_literal(&mut b);
                b.push_field(FieldName::Name, index);
            } else {
                self.bump_as_field(&mut b, FieldName::Name, FieldIdentifier);
            }
            self.bump(&mut b);
            let pattern = self.parse_pattern(&mut b);
            b.push_field(FieldName::Pattern, pattern);
        } else {
            self.expect_name(&mut b, FieldName::Name, ShorthandFieldIdentifier);
        }
        self.finish(b)
    }

    // ========================================================================
    // Range patterns
    // ========================================================================

    /// Whether the token `n` ahead can end a range pattern: a literal, a
    /// negative literal or a path.
    fn at_range_bound_after(&mut self, n: usize) -> bool {
        use SyntaxKind::*;
        matches!(
            self.nth(n),
            Minus | IntegerToken | FloatToken | CharToken | StringToken | RawStringToken | Identifier
                | SelfTypeKw | SelfKw | SuperKw | CrateKw | ColonColon
        )
    }

    /// `..=b` and `..b`.
    fn parse_prefix_range_pattern(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::RangePattern);
        self.bump(&mut b);
        let right = self.parse_range_bound(&mut b);
        b.push_field(FieldName::Right, right);
        self.finish(b)
    }

    /// `a..=b`, `a...b`, `a..` after a literal or path `left`.
    fn parse_range_pattern_rest(&mut self, left: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        if !self.at_any(&[DotDot, DotDotEq, DotDotDot]) {
            return left;
        }
        let mut b = NodeBuilder::new(RangePattern);
        b.push_field(FieldName::Left, left);
        let open_ended = self.at(DotDot);
        self.bump(&mut b);
        if !open_ended || self.at_range_bound_after(0) {
            let right = self.parse_range_bound(&mut b);
            b.push_field(FieldName::Right, right);
        }
        self.finish(b)
    }

    fn parse_range_bound(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        match self.current() {
            Minus | IntegerToken | FloatToken | CharToken | StringToken | RawStringToken => {
                self.parse_literal_pattern(parent)
            }
            Identifier | SelfTypeKw | SelfKw | SuperKw | CrateKw | ColonColon => {
                self.parse_expression_path(parent)
            }
            _ => {
                self.error_expected("range bound");
                self.missing(IntegerLiteral)
            }
        }
    }
}
