//! Expressions, statements and blocks.
//!
//! Binary operators are parsed by precedence climbing over
//! `PRECEDENCE_TABLE`; prefix, postfix and primary forms are plain
//! recursive descent.

use rcst_core::text::TextRange;
use rcst_diagnostics::messages;
use rcst_scanner::ScanSet;
use rcst_syntax::{FieldName, NodeBuilder, NodeFlags, SyntaxKind, SyntaxNode};

use crate::conflicts::ConflictId;
use crate::parser::{Parser, Restrictions};
use crate::precedence::{infix_operator, Associativity, OperatorClass, OperatorPrecedence};

/// Tokens that end an argument or element list during recovery.
const ARGUMENT_SYNC: &[SyntaxKind] = &[SyntaxKind::Semicolon, SyntaxKind::CloseBrace];

impl<'a> Parser<'a> {
    pub(crate) fn at_expression_start(&self) -> bool {
        use SyntaxKind::*;
        match self.current() {
            IntegerToken | FloatToken | StringToken | RawStringToken | CharToken | TrueKw | FalseKw
            | ErrorSentinel | Identifier | SelfTypeKw | SelfKw | SuperKw | CrateKw | ColonColon | Lt
            | Shl | Metavariable | OpenParen | OpenBracket | Minus | Bang | Star | Amp | AmpAmp | Pipe
            | PipePipe | DotDot | DotDotEq | MoveKw | AsyncKw | UnsafeKw | ConstKw | IfKw | MatchKw
            | WhileKw | LoopKw | ForKw | ReturnKw | BreakKw | ContinueKw | YieldKw | Quote => true,
            OpenBrace => !self.restrictions.contains(Restrictions::NO_STRUCT_LITERAL),
            LetKw => self.restrictions.contains(Restrictions::ALLOW_LET),
            _ => false,
        }
    }

    pub(crate) fn parse_expression(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.parse_expression_min(parent, OperatorPrecedence::Closure)
    }

    /// An expression whose infix operators all bind at least as tightly as
    /// `min`.
    pub(crate) fn parse_expression_min(
        &mut self,
        parent: &mut NodeBuilder<'a>,
        min: OperatorPrecedence,
    ) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        self.guarded(|p| {
            let lhs = p.parse_unary(parent);
            p.parse_binary_rest(lhs, min)
        })
    }

    fn parse_binary_rest(&mut self, mut lhs: &'a SyntaxNode<'a>, min: OperatorPrecedence) -> &'a SyntaxNode<'a> {
        loop {
            let kind = self.scanner.rescan_greater_than();
            let Some(class) = infix_operator(kind) else {
                break;
            };
            let entry = class.entry();
            if entry.precedence < min {
                break;
            }
            lhs = match class {
                OperatorClass::Cast => {
                    let mut b = NodeBuilder::new(class.node_kind());
                    b.push_field(FieldName::Value, lhs);
                    self.bump(&mut b);
                    let ty = self.parse_type(&mut b);
                    b.push_field(FieldName::Type, ty);
                    self.finish(b)
                }
                OperatorClass::Range => {
                    // `a..b..c` is not an expression.
                    if lhs.kind() == SyntaxKind::RangeExpression {
                        break;
                    }
                    let mut b = NodeBuilder::new(class.node_kind());
                    b.push(lhs);
                    self.bump(&mut b);
                    if self.at_expression_start() {
                        let rhs = self.parse_expression_min(&mut b, entry.precedence.next());
                        b.push(rhs);
                    }
                    self.finish(b)
                }
                _ => {
                    let rhs_min = match entry.assoc {
                        Associativity::Left => entry.precedence.next(),
                        Associativity::Right | Associativity::None => entry.precedence,
                    };
                    let node_kind = class.node_kind();
                    let mut b = NodeBuilder::new(node_kind);
                    b.push_field(FieldName::Left, lhs);
                    if node_kind == SyntaxKind::AssignmentExpression {
                        self.bump(&mut b);
                    } else {
                        self.bump_field(&mut b, FieldName::Operator);
                    }
                    let rhs = self.parse_expression_min(&mut b, rhs_min);
                    b.push_field(FieldName::Right, rhs);
                    self.finish(b)
                }
            };
        }
        lhs
    }

    // ========================================================================
    // Prefix forms
    // ========================================================================

    fn parse_unary(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        match self.current() {
            Minus | Bang | Star => {
                let mut b = NodeBuilder::new(UnaryExpression);
                self.bump(&mut b);
                let operand = self.parse_operand(&mut b);
                b.push(operand);
                self.finish(b)
            }
            Amp | AmpAmp => self.parse_reference_expression(),
            DotDot | DotDotEq => {
                let mut b = NodeBuilder::new(RangeExpression);
                self.bump(&mut b);
                if self.at_expression_start() {
                    let rhs = self.parse_expression_min(&mut b, OperatorClass::Range.precedence().next());
                    b.push(rhs);
                }
                self.finish(b)
            }
            Pipe | PipePipe | MoveKw => self.parse_closure(),
            AsyncKw if self.at_async_closure() => self.parse_closure(),
            ReturnKw | YieldKw => {
                let kind = if self.at(ReturnKw) { ReturnExpression } else { YieldExpression };
                let mut b = NodeBuilder::new(kind);
                self.bump(&mut b);
                if self.at_expression_start() {
                    let value = self.parse_expression(&mut b);
                    b.push(value);
                }
                self.finish(b)
            }
            BreakKw | ContinueKw => {
                let kind = if self.at(BreakKw) { BreakExpression } else { ContinueExpression };
                let mut b = NodeBuilder::new(kind);
                self.bump(&mut b);
                if self.at(Quote) {
                    let label = self.parse_quoted_name(Label);
                    b.push(label);
                }
                if kind == BreakExpression && self.at_expression_start() {
                    let value = self.parse_expression(&mut b);
                    b.push(value);
                }
                self.finish(b)
            }
            _ => {
                let primary = self.parse_primary(parent);
                self.parse_postfix(primary)
            }
        }
    }

    /// The operand of a prefix operator: another prefix form or a postfix
    /// expression.
    fn parse_operand(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        self.guarded(|p| p.parse_unary(parent))
    }

    fn parse_reference_expression(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::ReferenceExpression);
        if self.at(SyntaxKind::AmpAmp) {
            self.scanner.split_token(SyntaxKind::Amp);
            self.bump(&mut b);
            let inner = self.guarded(|p| p.parse_reference_expression());
            b.push_field(FieldName::Value, inner);
            return self.finish(b);
        }
        self.bump(&mut b);
        if self.at_contextual("raw") && matches!(self.nth(1), SyntaxKind::ConstKw | SyntaxKind::MutKw) {
            self.bump_as(&mut b, SyntaxKind::RawKw);
            self.bump(&mut b);
        } else if self.at(SyntaxKind::MutKw) {
            self.bump(&mut b);
        }
        let value = self.parse_operand(&mut b);
        b.push_field(FieldName::Value, value);
        self.finish(b)
    }

    fn at_async_closure(&mut self) -> bool {
        match self.nth(1) {
            SyntaxKind::Pipe | SyntaxKind::PipePipe => true,
            SyntaxKind::MoveKw => matches!(self.nth(2), SyntaxKind::Pipe | SyntaxKind::PipePipe),
            _ => false,
        }
    }

    /// `[async] [move] |params| [-> T] body`.
    fn parse_closure(&mut self) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(ClosureExpression);
        if self.at(AsyncKw) {
            self.bump(&mut b);
        }
        if self.at(MoveKw) {
            self.bump(&mut b);
        }
        self.flush_trivia(&mut b);
        let mut params = NodeBuilder::new(ClosureParameters);
        if self.at(PipePipe) {
            self.scanner.split_token(Pipe);
            self.bump(&mut params);
            self.bump(&mut params);
        } else {
            self.expect(&mut params, Pipe);
            loop {
                self.flush_trivia(&mut params);
                if self.at(Pipe) {
                    self.bump(&mut params);
                    break;
                }
                if !self.at_pattern_start() && !self.at(Pound) {
                    self.expect(&mut params, Pipe);
                    break;
                }
                while self.at(Pound) {
                    let attr = self.parse_attribute_item(&mut params);
                    params.push(attr);
                }
                let param = self.parse_closure_parameter(&mut params);
                params.push(param);
                if self.at(Comma) {
                    self.bump(&mut params);
                } else if !self.at(Pipe) {
                    self.expect(&mut params, Pipe);
                    break;
                }
            }
        }
        b.push_field(FieldName::Parameters, self.finish(params));
        let body = if self.at(Arrow) {
            self.bump(&mut b);
            let ret = self.parse_type(&mut b);
            b.push_field(FieldName::ReturnType, ret);
            self.parse_block(&mut b)
        } else {
            self.parse_expression_min(&mut b, OperatorPrecedence::Closure)
        };
        b.push_field(FieldName::Body, body);
        self.finish(b)
    }

    /// A closure parameter is a bare pattern unless a `: Type` follows it.
    fn parse_closure_parameter(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::Parameter);
        let pattern = self.parse_single_pattern(&mut b);
        if !self.at(SyntaxKind::Colon) {
            self.resolved(ConflictId::ParameterListVsTuplePattern, SyntaxKind::TuplePattern);
            return pattern;
        }
        self.resolved(ConflictId::ParameterListVsTuplePattern, SyntaxKind::Parameter);
        b.push_field(FieldName::Pattern, pattern);
        self.bump(&mut b);
        let ty = self.parse_type(&mut b);
        b.push_field(FieldName::Type, ty);
        self.finish(b)
    }

    // ========================================================================
    // Postfix forms
    // ========================================================================

    fn parse_postfix(&mut self, mut lhs: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        loop {
            lhs = match self.current() {
                OpenParen => {
                    let mut b = NodeBuilder::new(CallExpression);
                    b.push_field(FieldName::Function, lhs);
                    let args = self.parse_arguments(&mut b);
                    b.push_field(FieldName::Arguments, args);
                    self.finish(b)
                }
                OpenBracket => {
                    let mut b = NodeBuilder::new(IndexExpression);
                    b.push(lhs);
                    let open_range = self.scanner.token().range;
                    self.bump(&mut b);
                    let index = self.with_restrictions(Restrictions::NONE, |p| p.parse_expression(&mut b));
                    b.push(index);
                    self.close_delimiter(&mut b, OpenBracket, open_range);
                    self.finish(b)
                }
                Question => {
                    let mut b = NodeBuilder::new(TryExpression);
                    b.push(lhs);
                    self.bump(&mut b);
                    self.finish(b)
                }
                Dot => self.parse_dot_expression(lhs),
                ColonColon if lhs.kind() == FieldExpression && matches!(self.nth(1), Lt | Shl) => {
                    // `x.collect::<Vec<_>>()`
                    let mut b = NodeBuilder::new(GenericFunction);
                    b.push_field(FieldName::Function, lhs);
                    self.bump(&mut b);
                    let args = self.parse_type_arguments(&mut b);
                    b.push_field(FieldName::TypeArguments, args);
                    self.finish(b)
                }
                _ => return lhs,
            };
        }
    }

    /// `.await`, `.field`, `.0`.
    fn parse_dot_expression(&mut self, lhs: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        if self.nth(1) == AwaitKw {
            let mut b = NodeBuilder::new(AwaitExpression);
            b.push(lhs);
            self.bump(&mut b);
            self.bump(&mut b);
            return self.finish(b);
        }
        let mut b = NodeBuilder::new(FieldExpression);
        b.push_field(FieldName::Value, lhs);
        // `t.0.1` must not scan `0.1` as a float.
        self.bump_with(&mut b, None, None, ScanSet::TUPLE_INDEX);
        match self.current() {
            Identifier => self.bump_as_field(&mut b, FieldName::Field, FieldIdentifier),
            Metavariable => self.bump_field(&mut b, FieldName::Field),
            IntegerToken => {
                let mut index = NodeBuilder::new(IntegerLiteral);
                self.bump_number(&mut index, ScanSet::TUPLE_INDEX);
                b.push_field(FieldName::Field, self.finish(index));
            }
            _ => {
                self.error_expected("field name");
                b.push_field(FieldName::Field, self.missing(FieldIdentifier));
            }
        }
        self.finish(b)
    }

    pub(crate) fn parse_arguments(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::Arguments);
        self.with_restrictions(Restrictions::NONE, |p| {
            p.parse_list(
                &mut b,
                SyntaxKind::OpenParen,
                SyntaxKind::CloseParen,
                ARGUMENT_SYNC,
                |p| p.at_expression_start() || p.at(SyntaxKind::Pound),
                |p, list| {
                    while p.at(SyntaxKind::Pound) {
                        let attr = p.parse_attribute_item(list);
                        list.push(attr);
                    }
                    let arg = p.parse_expression(list);
                    list.push(arg);
                },
            )
        });
        self.finish(b)
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        match self.current() {
            IntegerToken | FloatToken | StringToken | RawStringToken | CharToken | TrueKw | FalseKw => {
                self.parse_literal(parent)
            }
            ErrorSentinel => self.leaf(parent, None),
            Identifier | SelfTypeKw | SelfKw | SuperKw | CrateKw | ColonColon | Lt | Shl | Metavariable => {
                self.parse_path_expression(parent)
            }
            OpenParen => self.parse_paren_expression(),
            OpenBracket => self.parse_array_expression(),
            OpenBrace => self.parse_block(parent),
            Quote => self.parse_labeled_expression(),
            UnsafeKw if self.nth(1) == OpenBrace => {
                let mut b = NodeBuilder::new(UnsafeBlock);
                self.bump(&mut b);
                let block = self.parse_block(&mut b);
                b.push(block);
                self.finish(b)
            }
            AsyncKw => {
                let mut b = NodeBuilder::new(AsyncBlock);
                self.bump(&mut b);
                if self.at(MoveKw) {
                    self.bump(&mut b);
                }
                let block = self.parse_block(&mut b);
                b.push(block);
                self.finish(b)
            }
            ConstKw if self.nth(1) == OpenBrace => {
                let mut b = NodeBuilder::new(ConstBlock);
                self.bump(&mut b);
                let block = self.parse_block(&mut b);
                b.push_field(FieldName::Body, block);
                self.finish(b)
            }
            IfKw => self.parse_if(),
            MatchKw => self.parse_match(),
            WhileKw => self.parse_while(NodeBuilder::new(WhileExpression)),
            LoopKw => self.parse_loop(NodeBuilder::new(LoopExpression)),
            ForKw => self.parse_for(NodeBuilder::new(ForExpression)),
            LetKw if self.restrictions.contains(Restrictions::ALLOW_LET) => self.parse_let_condition(),
            _ => self.error_expression(),
        }
    }

    /// Report a missing expression. A token that cannot continue the
    /// enclosing construct is wrapped in an error node.
    fn error_expression(&mut self) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.error_expected("expression");
        let kind = self.current();
        if kind == EndOfFile || kind.is_close_delimiter() || matches!(kind, Semicolon | Comma | FatArrow) {
            return self.missing(Identifier);
        }
        self.skip_group_as_error()
    }

    pub(crate) fn parse_literal(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let kind = match self.current() {
            IntegerToken => IntegerLiteral,
            FloatToken => FloatLiteral,
            TrueKw | FalseKw => {
                let mut b = NodeBuilder::new(BooleanLiteral);
                self.bump(&mut b);
                return self.finish(b);
            }
            StringToken | RawStringToken | CharToken => {
                let Some(literal) = self.take_token(parent, None, ScanSet::AFTER_LITERAL) else {
                    return self.missing(StringLiteral);
                };
                if !self.at(LiteralSuffix) {
                    return literal;
                }
                let mut b = NodeBuilder::new(literal.kind());
                b.add_flags(literal.flags() & NodeFlags::ERROR);
                b.extend(literal.children().iter().copied());
                self.bump(&mut b);
                return self.finish(b);
            }
            _ => {
                self.error_expected("literal");
                return self.missing(IntegerLiteral);
            }
        };
        let mut b = NodeBuilder::new(kind);
        self.bump_number(&mut b, ScanSet::AFTER_LITERAL);
        if self.at(LiteralSuffix) {
            self.bump(&mut b);
        }
        self.finish(b)
    }

    /// A value path: `a`, `a::b`, `Vec::<u8>::new`, `<T as Tr>::f`.
    pub(crate) fn parse_expression_path(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut pending: Option<NodeBuilder<'a>> = None;
        if self.at(Lt) || self.at(Shl) {
            let bracketed = self.parse_bracketed_type();
            let mut b = NodeBuilder::new(ScopedIdentifier);
            b.push_field(FieldName::Path, bracketed);
            self.expect(&mut b, ColonColon);
            pending = Some(b);
        } else if self.at(ColonColon) {
            let mut b = NodeBuilder::new(ScopedIdentifier);
            self.bump(&mut b);
            pending = Some(b);
        }
        loop {
            let mut node = match pending.take() {
                Some(mut b) => {
                    let name = self.path_segment(&mut b, Identifier);
                    b.push_field(FieldName::Name, name);
                    self.finish(b)
                }
                None => self.path_segment(parent, Identifier),
            };
            if self.at(ColonColon) && matches!(self.nth(1), Lt | Shl) {
                self.resolved(ConflictId::GenericArgsVsLessThan, GenericFunction);
                let mut g = NodeBuilder::new(GenericFunction);
                g.push_field(FieldName::Function, node);
                self.bump(&mut g);
                let args = self.parse_type_arguments(&mut g);
                g.push_field(FieldName::TypeArguments, args);
                node = self.finish(g);
            }
            if self.at(ColonColon) && self.next_is_path_segment() {
                let prefix = if node.kind() == GenericFunction {
                    self.retag_as_type(node)
                } else {
                    node
                };
                let mut b = NodeBuilder::new(ScopedIdentifier);
                b.push_field(FieldName::Path, prefix);
                self.bump(&mut b);
                pending = Some(b);
                continue;
            }
            return node;
        }
    }

    /// A path, possibly followed by a struct literal body or a macro
    /// invocation.
    fn parse_path_expression(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let path = self.parse_expression_path(parent);
        let is_name = matches!(path.kind(), Identifier | ScopedIdentifier);
        if is_name && self.at(Bang) && self.nth(1).is_open_delimiter() {
            return self.parse_macro_invocation(path);
        }
        if self.at(OpenBrace) && (is_name || path.kind() == GenericFunction) {
            if self.restrictions.contains(Restrictions::NO_STRUCT_LITERAL) {
                self.resolved(ConflictId::StructLiteralVsBlock, Block);
            } else {
                self.resolved(ConflictId::StructLiteralVsBlock, StructExpression);
                return self.parse_struct_expression(path);
            }
        }
        path
    }

    fn parse_struct_expression(&mut self, path: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(StructExpression);
        b.push_field(FieldName::Name, self.retag_as_type(path));
        let mut body = NodeBuilder::new(FieldInitializerList);
        self.with_restrictions(Restrictions::NONE, |p| {
            p.parse_list(
                &mut body,
                OpenBrace,
                CloseBrace,
                &[Semicolon],
                |p| p.at_any(&[Identifier, IntegerToken, DotDot, Pound, Metavariable]),
                |p, list| {
                    while p.at(Pound) {
                        let attr = p.parse_attribute_item(list);
                        list.push(attr);
                    }
                    let field = p.parse_field_initializer(list);
                    list.push(field);
                },
            )
        });
        b.push_field(FieldName::Body, self.finish(body));
        self.finish(b)
    }

    fn parse_field_initializer(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        match self.current() {
            DotDot => {
                let mut b = NodeBuilder::new(BaseFieldInitializer);
                self.bump(&mut b);
                let base = self.parse_expression(&mut b);
                b.push(base);
                self.finish(b)
            }
            Identifier | IntegerToken if self.nth(1) == Colon => {
                let mut b = NodeBuilder::new(FieldInitializer);
                if self.at(IntegerToken) {
                    let index = self.parse_literal(&mut b);
                    b.push_field(FieldName::Field, index);
                } else {
                    self.bump_as_field(&mut b, FieldName::Field, FieldIdentifier);
                }
                self.bump(&mut b);
                let value = self.parse_expression(&mut b);
                b.push_field(FieldName::Value, value);
                self.finish(b)
            }
            _ => {
                let mut b = NodeBuilder::new(ShorthandFieldInitializer);
                if self.at(Metavariable) {
                    self.bump(&mut b);
                } else {
                    self.expect_name(&mut b, FieldName::Name, Identifier);
                }
                self.finish(b)
            }
        }
    }

    /// `()`, `(a)`, `(a,)`, `(a, b)`.
    fn parse_paren_expression(&mut self) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(ParenthesizedExpression);
        if self.nth(1) == CloseParen {
            b.set_kind(UnitExpression);
            self.bump(&mut b);
            self.bump(&mut b);
            return self.finish(b);
        }
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        self.with_restrictions(Restrictions::NONE, |p| {
            let first = p.parse_expression(&mut b);
            b.push(first);
            if p.at(Comma) {
                b.set_kind(TupleExpression);
            }
            while p.at(Comma) {
                p.bump(&mut b);
                p.flush_trivia(&mut b);
                if !p.at_expression_start() {
                    break;
                }
                let element = p.parse_expression(&mut b);
                b.push(element);
            }
        });
        self.close_delimiter(&mut b, OpenParen, open_range);
        self.finish(b)
    }

    /// `[a, b]` or `[a; n]`, told apart by the token after the first element.
    fn parse_array_expression(&mut self) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(ArrayExpression);
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        self.with_restrictions(Restrictions::NONE, |p| {
            p.flush_trivia(&mut b);
            if !p.at_expression_start() {
                return;
            }
            let first = p.parse_expression(&mut b);
            b.push(first);
            if p.at(Semicolon) {
                p.resolved(ConflictId::ArrayExpression, ArrayExpression);
                p.bump(&mut b);
                let length = p.parse_expression(&mut b);
                b.push_field(FieldName::Length, length);
                return;
            }
            while p.at(Comma) {
                p.bump(&mut b);
                p.flush_trivia(&mut b);
                if !p.at_expression_start() {
                    break;
                }
                let element = p.parse_expression(&mut b);
                b.push(element);
            }
        });
        self.close_delimiter(&mut b, OpenBracket, open_range);
        self.finish(b)
    }

    /// Consume the closer matching `open`, or report it and insert a missing
    /// one. At end of input the opener is reported as unclosed.
    pub(crate) fn close_delimiter(&mut self, b: &mut NodeBuilder<'a>, open: SyntaxKind, open_range: TextRange) {
        let close = open.matching_close().unwrap_or(SyntaxKind::CloseParen);
        if self.at(close) {
            self.bump(b);
            return;
        }
        if self.at(SyntaxKind::EndOfFile) {
            self.error_at(open_range, &messages::UNCLOSED_DELIMITER_0, &[open.name()]);
        } else {
            self.error_here(&messages::_0_EXPECTED, &[close.name()]);
        }
        b.push(self.missing(close));
    }

    // ========================================================================
    // Blocks and control flow
    // ========================================================================

    pub(crate) fn parse_block(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        self.guarded(|p| p.parse_block_into(NodeBuilder::new(SyntaxKind::Block)))
    }

    fn parse_block_into(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        if !self.at(SyntaxKind::OpenBrace) {
            self.error_here(&messages::_0_EXPECTED, &["{"]);
            b.push(self.missing(SyntaxKind::OpenBrace));
            b.push(self.missing(SyntaxKind::CloseBrace));
            return self.finish(b);
        }
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        self.with_restrictions(Restrictions::NONE, |p| {
            p.parse_statements(&mut b, Some(SyntaxKind::CloseBrace), false)
        });
        self.close_delimiter(&mut b, SyntaxKind::OpenBrace, open_range);
        self.finish(b)
    }

    /// `'a: loop {}`, `'a: while ..`, `'a: for ..`, `'a: {}`.
    fn parse_labeled_expression(&mut self) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(Block);
        let label = self.parse_quoted_name(Label);
        b.push(label);
        self.expect(&mut b, Colon);
        match self.current() {
            LoopKw => self.parse_loop(b),
            WhileKw => self.parse_while(b),
            ForKw => self.parse_for(b),
            OpenBrace => self.guarded(|p| p.parse_block_into(b)),
            _ => {
                self.error_expected("loop or block");
                b.set_kind(Error);
                b.clear_fields();
                self.finish(b)
            }
        }
    }

    /// The condition of `if` and `while`: `let` is allowed and a chain of
    /// `&&` containing one becomes a let chain.
    pub(crate) fn parse_condition(
        &mut self,
        parent: &mut NodeBuilder<'a>,
        restrictions: Restrictions,
    ) -> &'a SyntaxNode<'a> {
        let condition = self.with_restrictions(restrictions | Restrictions::ALLOW_LET, |p| {
            p.parse_expression(parent)
        });
        self.flatten_let_chain(condition)
    }

    fn parse_let_condition(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::LetCondition);
        self.bump(&mut b);
        let pattern = self.parse_pattern(&mut b);
        b.push_field(FieldName::Pattern, pattern);
        self.expect(&mut b, SyntaxKind::Eq);
        // The scrutinee stops before `&&` and `||` so the chain continues.
        let restrictions = self.restrictions & Restrictions::NO_STRUCT_LITERAL;
        let value = self.with_restrictions(restrictions, |p| {
            p.parse_expression_min(&mut b, OperatorClass::LogicalAnd.precedence().next())
        });
        b.push_field(FieldName::Value, value);
        self.finish(b)
    }

    fn flatten_let_chain(&self, condition: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        if !is_and(condition) || !chain_has_let(condition) {
            return condition;
        }
        let mut b = NodeBuilder::new(SyntaxKind::LetChain);
        collect_chain(condition, &mut b);
        b.finish_with_range(self.arena, condition.range())
    }

    fn parse_if(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::IfExpression);
        self.bump(&mut b);
        let condition = self.parse_condition(&mut b, Restrictions::NO_STRUCT_LITERAL);
        b.push_field(FieldName::Condition, condition);
        let consequence = self.parse_block(&mut b);
        b.push_field(FieldName::Consequence, consequence);
        if self.at(SyntaxKind::ElseKw) {
            let mut e = NodeBuilder::new(SyntaxKind::ElseClause);
            self.bump(&mut e);
            let alternative = if self.at(SyntaxKind::IfKw) {
                self.flush_trivia(&mut e);
                self.guarded(|p| p.parse_if())
            } else {
                self.parse_block(&mut e)
            };
            e.push(alternative);
            b.push_field(FieldName::Alternative, self.finish(e));
        }
        self.finish(b)
    }

    fn parse_match(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::MatchExpression);
        self.bump(&mut b);
        let value = self.with_restrictions(Restrictions::NO_STRUCT_LITERAL, |p| p.parse_expression(&mut b));
        b.push_field(FieldName::Value, value);
        let body = self.parse_match_block(&mut b);
        b.push_field(FieldName::Body, body);
        self.finish(b)
    }

    fn parse_match_block(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(MatchBlock);
        if !self.at(OpenBrace) {
            self.error_here(&messages::_0_EXPECTED, &["{"]);
            b.push(self.missing(OpenBrace));
            b.push(self.missing(CloseBrace));
            return self.finish(b);
        }
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        self.with_restrictions(Restrictions::NONE, |p| loop {
            p.flush_trivia(&mut b);
            match p.current() {
                EndOfFile => break,
                CloseBrace => {
                    if !p.absorb_unclosed_brace(&mut b) {
                        break;
                    }
                }
                _ if p.at_pattern_start() || p.at(Pound) => {
                    let before = p.token_start();
                    let arm = p.parse_match_arm(&mut b);
                    b.push(arm);
                    if p.token_start() == before {
                        p.recover_until(&mut b, Comma);
                    }
                }
                _ => p.recover_until(&mut b, Comma),
            }
        });
        self.close_delimiter(&mut b, OpenBrace, open_range);
        self.finish(b)
    }

    fn parse_match_arm(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(MatchArm);
        while self.at(Pound) {
            let attr = self.parse_attribute_item(&mut b);
            b.push(attr);
        }
        self.flush_trivia(&mut b);
        let mut pattern = NodeBuilder::new(MatchPattern);
        let inner = self.parse_pattern(&mut pattern);
        pattern.push(inner);
        if self.at(IfKw) {
            self.bump(&mut pattern);
            let guard = self.parse_condition(&mut pattern, Restrictions::NONE);
            pattern.push_field(FieldName::Condition, guard);
        }
        b.push_field(FieldName::Pattern, self.finish(pattern));
        self.expect(&mut b, FatArrow);
        let (value, block_like) = self.parse_statement_expression(&mut b);
        b.push_field(FieldName::Value, value);
        if self.at(Comma) {
            self.bump(&mut b);
        } else if !block_like && !self.at(CloseBrace) {
            self.error_here(&messages::_0_EXPECTED, &[","]);
        }
        self.finish(b)
    }

    fn parse_while(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        b.set_kind(SyntaxKind::WhileExpression);
        self.bump(&mut b);
        let condition = self.parse_condition(&mut b, Restrictions::NO_STRUCT_LITERAL);
        b.push_field(FieldName::Condition, condition);
        let body = self.parse_block(&mut b);
        b.push_field(FieldName::Body, body);
        self.finish(b)
    }

    fn parse_loop(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        b.set_kind(SyntaxKind::LoopExpression);
        self.bump(&mut b);
        let body = self.parse_block(&mut b);
        b.push_field(FieldName::Body, body);
        self.finish(b)
    }

    fn parse_for(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        b.set_kind(SyntaxKind::ForExpression);
        self.bump(&mut b);
        let pattern = self.parse_pattern(&mut b);
        b.push_field(FieldName::Pattern, pattern);
        self.expect(&mut b, SyntaxKind::InKw);
        let value = self.with_restrictions(Restrictions::NO_STRUCT_LITERAL, |p| p.parse_expression(&mut b));
        b.push_field(FieldName::Value, value);
        let body = self.parse_block(&mut b);
        b.push_field(FieldName::Body, body);
        self.finish(b)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse one statement into `parent`. Consumes nothing when the current
    /// token cannot start a statement.
    pub(crate) fn parse_statement(&mut self, parent: &mut NodeBuilder<'a>) {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        match self.current() {
            Semicolon => {
                let mut b = NodeBuilder::new(EmptyStatement);
                self.bump(&mut b);
                parent.push(self.finish(b));
            }
            LetKw => {
                let declaration = self.parse_let_declaration();
                parent.push(declaration);
            }
            _ if self.at_item_start() => {
                self.parse_item(parent);
            }
            _ if self.at_expression_start() => self.parse_expression_statement(parent),
            _ => {}
        }
    }

    fn parse_let_declaration(&mut self) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(LetDeclaration);
        self.bump(&mut b);
        if self.at(MutKw) {
            self.bump(&mut b);
        }
        let pattern = self.parse_pattern(&mut b);
        b.push_field(FieldName::Pattern, pattern);
        if self.at(Colon) {
            self.bump(&mut b);
            let ty = self.parse_type(&mut b);
            b.push_field(FieldName::Type, ty);
        }
        if self.at(Eq) {
            self.bump(&mut b);
            let value = self.parse_expression(&mut b);
            b.push_field(FieldName::Value, value);
        }
        if self.at(ElseKw) {
            self.bump(&mut b);
            let alternative = self.parse_block(&mut b);
            b.push_field(FieldName::Alternative, alternative);
        }
        self.expect(&mut b, Semicolon);
        self.finish(b)
    }

    pub(crate) fn parse_expression_statement(&mut self, parent: &mut NodeBuilder<'a>) {
        let (expr, block_like) = self.parse_statement_expression(parent);
        if self.at(SyntaxKind::Semicolon) {
            let mut b = NodeBuilder::new(SyntaxKind::ExpressionStatement);
            b.push(expr);
            self.bump(&mut b);
            parent.push(self.finish(b));
            return;
        }
        if block_like || is_brace_macro(expr) {
            let mut b = NodeBuilder::new(SyntaxKind::ExpressionStatement);
            b.push(expr);
            parent.push(self.finish(b));
            return;
        }
        if self.at(SyntaxKind::CloseBrace) {
            // The value of the enclosing block.
            parent.push(expr);
            return;
        }
        let mut b = NodeBuilder::new(SyntaxKind::ExpressionStatement);
        b.push(expr);
        self.expect(&mut b, SyntaxKind::Semicolon);
        parent.push(self.finish(b));
    }

    /// An expression in statement position. A block-like expression ends
    /// the statement unless a method call or `?` continues it; the flag
    /// reports whether it did.
    fn parse_statement_expression(&mut self, parent: &mut NodeBuilder<'a>) -> (&'a SyntaxNode<'a>, bool) {
        self.flush_trivia(parent);
        if !self.at_block_like_start() {
            return (self.parse_expression(parent), false);
        }
        let head = self.guarded(|p| p.parse_primary(parent));
        if self.at(SyntaxKind::Dot) || self.at(SyntaxKind::Question) {
            let lhs = self.parse_postfix(head);
            return (self.parse_binary_rest(lhs, OperatorPrecedence::Closure), false);
        }
        (head, true)
    }

    fn at_block_like_start(&mut self) -> bool {
        use SyntaxKind::*;
        match self.current() {
            OpenBrace | IfKw | MatchKw | WhileKw | LoopKw | ForKw => true,
            Quote => self.nth(2) == Colon,
            UnsafeKw | ConstKw => self.nth(1) == OpenBrace,
            AsyncKw => match self.nth(1) {
                OpenBrace => true,
                MoveKw => self.nth(2) == OpenBrace,
                _ => false,
            },
            _ => false,
        }
    }
}

fn is_and(node: &SyntaxNode<'_>) -> bool {
    node.kind() == SyntaxKind::BinaryExpression
        && node.child_by_field(FieldName::Operator).map(|op| op.kind()) == Some(SyntaxKind::AmpAmp)
}

fn chain_has_let(node: &SyntaxNode<'_>) -> bool {
    if node.kind() == SyntaxKind::LetCondition {
        return true;
    }
    is_and(node)
        && node
            .children()
            .iter()
            .filter(|c| matches!(c.field, Some(FieldName::Left) | Some(FieldName::Right)))
            .any(|c| chain_has_let(c.node))
}

fn collect_chain<'a>(node: &'a SyntaxNode<'a>, b: &mut NodeBuilder<'a>) {
    if !is_and(node) {
        b.push(node);
        return;
    }
    for child in node.children() {
        match child.field {
            Some(FieldName::Left) | Some(FieldName::Right) => collect_chain(child.node, b),
            _ => b.push(child.node),
        }
    }
}

/// `m! { .. }` needs no `;` in statement position.
fn is_brace_macro(node: &SyntaxNode<'_>) -> bool {
    node.kind() == SyntaxKind::MacroInvocation
        && node
            .children()
            .last()
            .and_then(|tree| tree.node.child(0))
            .map(|open| open.kind())
            == Some(SyntaxKind::OpenBrace)
}
