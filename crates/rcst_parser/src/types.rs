//! Types, type paths, generic parameters and bounds.

use rcst_syntax::{Child, FieldName, NodeBuilder, NodeFlags, SyntaxKind, SyntaxNode};

use crate::conflicts::ConflictId;
use crate::items::ParamContext;
use crate::parser::{Parser, Restrictions};

/// Tokens that end a list of types or generics during recovery.
const TYPE_LIST_SYNC: &[SyntaxKind] = &[
    SyntaxKind::Semicolon,
    SyntaxKind::CloseBrace,
    SyntaxKind::CloseParen,
    SyntaxKind::CloseBracket,
];

impl<'a> Parser<'a> {
    pub(crate) fn at_type_start(&self) -> bool {
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
                | OpenParen
                | OpenBracket
                | Amp
                | AmpAmp
                | Star
                | Bang
                | Underscore
                | ImplKw
                | DynKw
                | FnKw
                | UnsafeKw
                | ExternKw
                | ForKw
        )
    }

    pub(crate) fn parse_type(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        self.guarded(|p| p.parse_type_inner(parent))
    }

    fn parse_type_inner(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        match self.current() {
            OpenParen => self.parse_tuple_type(),
            OpenBracket => self.parse_array_type(),
            Amp | AmpAmp => self.parse_reference_type(),
            Star => self.parse_pointer_type(),
            Bang => {
                let mut b = NodeBuilder::new(NeverType);
                self.bump(&mut b);
                self.finish(b)
            }
            Underscore | Metavariable => self.leaf(parent, None),
            ImplKw => self.parse_bounded_type_with(AbstractType),
            DynKw => self.parse_bounded_type_with(DynamicType),
            FnKw | UnsafeKw | ExternKw => self.parse_function_type(NodeBuilder::new(FunctionType)),
            ForKw => {
                let binder = self.parse_for_binder();
                if self.at_any(&[FnKw, UnsafeKw, ExternKw]) {
                    let mut b = NodeBuilder::new(FunctionType);
                    b.push(binder);
                    self.parse_function_type(b)
                } else {
                    let mut b = NodeBuilder::new(HigherRankedTraitBound);
                    b.push_field(FieldName::TypeParameters, binder);
                    let ty = self.parse_type(&mut b);
                    b.push_field(FieldName::Type, ty);
                    self.finish(b)
                }
            }
            Identifier | SelfTypeKw | SelfKw | SuperKw | CrateKw | ColonColon | Lt | Shl => {
                self.parse_type_path(parent)
            }
            _ => {
                self.error_expected("type");
                self.missing(TypeIdentifier)
            }
        }
    }

    fn parse_tuple_type(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::TupleType);
        if self.nth(1) == SyntaxKind::CloseParen {
            self.resolved(ConflictId::UnitTypeVsUnitPattern, SyntaxKind::UnitType);
            b.set_kind(SyntaxKind::UnitType);
            self.bump(&mut b);
            self.bump(&mut b);
            return self.finish(b);
        }
        self.parse_list(
            &mut b,
            SyntaxKind::OpenParen,
            SyntaxKind::CloseParen,
            TYPE_LIST_SYNC,
            |p| p.at_type_start(),
            |p, list| {
                let ty = p.parse_type(list);
                list.push(ty);
            },
        );
        self.finish(b)
    }

    fn parse_array_type(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::ArrayType);
        self.bump(&mut b);
        let element = self.parse_type(&mut b);
        b.push_field(FieldName::Element, element);
        if self.at(SyntaxKind::Semicolon) {
            self.bump(&mut b);
            let length = self.with_restrictions(Restrictions::NONE, |p| p.parse_expression(&mut b));
            b.push_field(FieldName::Length, length);
        }
        self.expect(&mut b, SyntaxKind::CloseBracket);
        self.finish(b)
    }

    fn parse_reference_type(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::ReferenceType);
        if self.at(SyntaxKind::AmpAmp) {
            // `&&T` is a reference to a reference.
            self.scanner.split_token(SyntaxKind::Amp);
            self.bump(&mut b);
            let inner = self.guarded(|p| p.parse_reference_type());
            b.push_field(FieldName::Type, inner);
            return self.finish(b);
        }
        self.bump(&mut b);
        if self.at(SyntaxKind::Quote) {
            let lifetime = self.parse_lifetime(&mut b);
            b.push(lifetime);
        }
        if self.at(SyntaxKind::MutKw) {
            self.bump(&mut b);
        }
        let ty = self.parse_type(&mut b);
        b.push_field(FieldName::Type, ty);
        self.finish(b)
    }

    fn parse_pointer_type(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::PointerType);
        self.bump(&mut b);
        if self.at(SyntaxKind::ConstKw) || self.at(SyntaxKind::MutKw) {
            self.bump(&mut b);
        } else {
            self.error_expected("'const' or 'mut'");
        }
        let ty = self.parse_type(&mut b);
        b.push_field(FieldName::Type, ty);
        self.finish(b)
    }

    /// `impl Trait` and `dyn Trait`.
    fn parse_bounded_type_with(&mut self, kind: SyntaxKind) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(kind);
        self.bump(&mut b);
        let bound = self.parse_bound_sum(&mut b);
        b.push_field(FieldName::Trait, bound);
        self.finish(b)
    }

    /// `A + B + 'a` folded into left-nested bounded types.
    fn parse_bound_sum(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        let mut node = self.parse_bound(parent);
        while self.at(SyntaxKind::Plus) {
            let mut b = NodeBuilder::new(SyntaxKind::BoundedType);
            b.push(node);
            self.bump(&mut b);
            let next = self.parse_bound(&mut b);
            b.push(next);
            node = self.finish(b);
        }
        node
    }

    fn at_bound_start(&self) -> bool {
        use SyntaxKind::*;
        matches!(
            self.current(),
            Quote
                | Question
                | ForKw
                | OpenParen
                | Identifier
                | SelfTypeKw
                | SelfKw
                | SuperKw
                | CrateKw
                | ColonColon
                | Lt
                | Metavariable
        )
    }

    fn parse_bound(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        match self.current() {
            SyntaxKind::Quote => self.parse_lifetime(parent),
            SyntaxKind::Question => {
                let mut b = NodeBuilder::new(SyntaxKind::RemovedTraitBound);
                self.bump(&mut b);
                let ty = self.parse_type(&mut b);
                b.push(ty);
                self.finish(b)
            }
            _ => self.parse_type(parent),
        }
    }

    /// `: A + B` after a type parameter, an associated type or a trait name.
    pub(crate) fn parse_trait_bounds(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::TraitBounds);
        self.expect(&mut b, SyntaxKind::Colon);
        while self.at_bound_start() {
            let bound = self.parse_bound(&mut b);
            b.push(bound);
            if !self.at(SyntaxKind::Plus) {
                break;
            }
            self.bump(&mut b);
        }
        self.finish(b)
    }

    // ========================================================================
    // Paths in type position
    // ========================================================================

    /// `a::b::C<T>`, `<T as Tr>::X`, `Fn(A) -> B`, `m!()`.
    pub(crate) fn parse_type_path(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut pending: Option<NodeBuilder<'a>> = None;
        if self.at(Lt) || self.at(Shl) {
            let bracketed = self.parse_bracketed_type();
            pending = Some(self.start_scoped(bracketed));
        } else if self.at(ColonColon) {
            let mut b = NodeBuilder::new(ScopedIdentifier);
            self.bump(&mut b);
            pending = Some(b);
        }
        loop {
            let is_prefix =
                self.at_path_segment() && self.nth(1) == ColonColon && !matches!(self.nth(2), Lt | Shl);
            if is_prefix {
                let prefix = match pending.take() {
                    Some(mut b) => {
                        let name = self.path_segment(&mut b, Identifier);
                        b.push_field(FieldName::Name, name);
                        self.finish(b)
                    }
                    None => self.path_segment(parent, Identifier),
                };
                pending = Some(self.start_scoped(prefix));
                continue;
            }

            let mut ty = match pending.take() {
                Some(mut b) => {
                    b.set_kind(ScopedTypeIdentifier);
                    let name = self.path_segment(&mut b, TypeIdentifier);
                    b.push_field(FieldName::Name, name);
                    self.finish(b)
                }
                None => {
                    let primitive = self.at(Identifier) && SyntaxKind::is_primitive_type_name(self.token_text());
                    let name = self.path_segment(parent, TypeIdentifier);
                    if primitive {
                        self.retag(name, PrimitiveType)
                    } else {
                        name
                    }
                }
            };

            if self.at(Lt) || self.at(Shl) || (self.at(ColonColon) && matches!(self.nth(1), Lt | Shl)) {
                let mut g = NodeBuilder::new(GenericType);
                g.push_field(FieldName::Type, ty);
                if self.at(ColonColon) {
                    self.bump(&mut g);
                }
                let args = self.parse_type_arguments(&mut g);
                g.push_field(FieldName::TypeArguments, args);
                ty = self.finish(g);
                if self.at(ColonColon) && self.next_is_path_segment() {
                    pending = Some(self.start_scoped(ty));
                    continue;
                }
                return ty;
            }

            if self.at(OpenParen) && matches!(ty.kind(), TypeIdentifier | ScopedTypeIdentifier) {
                // `Fn(A) -> B`
                let mut f = NodeBuilder::new(FunctionType);
                f.push_field(FieldName::Trait, ty);
                let parameters = self.parse_parameters(&mut f, ParamContext::FnType);
                f.push_field(FieldName::Parameters, parameters);
                if self.at(Arrow) {
                    self.bump(&mut f);
                    let ret = self.parse_type(&mut f);
                    f.push_field(FieldName::ReturnType, ret);
                }
                return self.finish(f);
            }

            if self.at(Bang) && self.nth(1).is_open_delimiter() {
                let path = self.retag_as_path(ty);
                return self.parse_macro_invocation(path);
            }
            return ty;
        }
    }

    /// Start a scoped path node holding `path` and the `::` after it.
    fn start_scoped(&mut self, path: &'a SyntaxNode<'a>) -> NodeBuilder<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::ScopedIdentifier);
        b.push_field(FieldName::Path, path);
        self.expect(&mut b, SyntaxKind::ColonColon);
        b
    }

    /// `<T>` or `<T as Trait>` at the start of a qualified path.
    pub(crate) fn parse_bracketed_type(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::BracketedType);
        if self.at(SyntaxKind::Shl) {
            self.scanner.split_token(SyntaxKind::Lt);
        }
        self.bump(&mut b);
        let ty = self.parse_type(&mut b);
        if self.at(SyntaxKind::AsKw) {
            let mut q = NodeBuilder::new(SyntaxKind::QualifiedType);
            q.push_field(FieldName::Type, ty);
            self.bump(&mut q);
            let alias = self.parse_type(&mut q);
            q.push_field(FieldName::Alias, alias);
            b.push(self.finish(q));
        } else {
            b.push(ty);
        }
        self.expect(&mut b, SyntaxKind::Gt);
        self.finish(b)
    }

    /// `<T, 'a, N, Item = U>` after a type path or a turbofish.
    pub(crate) fn parse_type_arguments(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::TypeArguments);
        if self.at(SyntaxKind::Shl) {
            self.scanner.split_token(SyntaxKind::Lt);
        }
        self.with_restrictions(Restrictions::NONE, |p| {
            p.parse_list(
                &mut b,
                SyntaxKind::Lt,
                SyntaxKind::Gt,
                TYPE_LIST_SYNC,
                |p| p.at_type_argument_start(),
                |p, list| {
                    let arg = p.parse_type_argument(list);
                    list.push(arg);
                },
            )
        });
        self.finish(b)
    }

    fn at_type_argument_start(&self) -> bool {
        use SyntaxKind::*;
        self.at_type_start()
            || matches!(
                self.current(),
                Quote | OpenBrace | Minus | IntegerToken | FloatToken | StringToken | RawStringToken
                    | CharToken | TrueKw | FalseKw
            )
    }

    fn parse_type_argument(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        match self.current() {
            Quote => self.parse_lifetime(parent),
            OpenBrace => self.parse_block(parent),
            Minus => {
                let mut b = NodeBuilder::new(NegativeLiteral);
                self.bump(&mut b);
                let literal = self.parse_literal(&mut b);
                b.push(literal);
                self.finish(b)
            }
            IntegerToken | FloatToken | StringToken | RawStringToken | CharToken | TrueKw | FalseKw => {
                self.parse_literal(parent)
            }
            Identifier if self.nth(1) == Eq => {
                let mut b = NodeBuilder::new(TypeBinding);
                self.bump_as_field(&mut b, FieldName::Name, TypeIdentifier);
                self.bump(&mut b);
                let ty = self.parse_type(&mut b);
                b.push_field(FieldName::Type, ty);
                self.finish(b)
            }
            _ => {
                let ty = self.parse_type(parent);
                // `N::M` may name a constant as well as a type.
                if ty.kind() == ScopedTypeIdentifier {
                    self.resolved(ConflictId::ScopedValueVsScopedType, ScopedTypeIdentifier);
                    self.arena.alloc(ty.with_flags(NodeFlags::AMBIGUOUS))
                } else {
                    ty
                }
            }
        }
    }

    // ========================================================================
    // Function pointer types and binders
    // ========================================================================

    /// `[for<'a>] [unsafe] [extern "C"] fn(A, B) -> C`. `b` may already hold
    /// a binder.
    fn parse_function_type(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        if self.at(SyntaxKind::UnsafeKw) || self.at(SyntaxKind::ExternKw) {
            let modifiers = self.parse_function_modifiers(&mut b);
            b.push(modifiers);
        }
        self.expect(&mut b, SyntaxKind::FnKw);
        let parameters = self.parse_parameters(&mut b, ParamContext::FnType);
        b.push_field(FieldName::Parameters, parameters);
        if self.at(SyntaxKind::Arrow) {
            self.bump(&mut b);
            let ret = self.parse_type(&mut b);
            b.push_field(FieldName::ReturnType, ret);
        }
        self.finish(b)
    }

    /// `for<'a, 'b>` or `for<T>`. The token after `<` decides which.
    fn parse_for_binder(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::ForLifetimes);
        let lifetimes = self.nth(1) == SyntaxKind::Lt && self.nth(2) == SyntaxKind::Quote;
        if lifetimes {
            self.resolved(ConflictId::GenericParamsVsForLifetimes, SyntaxKind::ForLifetimes);
            self.bump(&mut b);
            self.parse_list(
                &mut b,
                SyntaxKind::Lt,
                SyntaxKind::Gt,
                TYPE_LIST_SYNC,
                |p| p.at(SyntaxKind::Quote),
                |p, list| {
                    let lifetime = p.parse_lifetime(list);
                    list.push(lifetime);
                },
            );
            return self.finish(b);
        }
        self.resolved(ConflictId::GenericParamsVsForLifetimes, SyntaxKind::TypeParameters);
        b.set_kind(SyntaxKind::TypeParameters);
        self.bump(&mut b);
        self.parse_generic_list(&mut b);
        self.finish(b)
    }

    // ========================================================================
    // Generic parameters and where clauses
    // ========================================================================

    pub(crate) fn parse_type_parameters(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::TypeParameters);
        self.parse_generic_list(&mut b);
        self.finish(b)
    }

    fn parse_generic_list(&mut self, b: &mut NodeBuilder<'a>) {
        use SyntaxKind::*;
        self.parse_list(
            b,
            Lt,
            Gt,
            TYPE_LIST_SYNC,
            |p| p.at_any(&[Quote, ConstKw, Identifier, Metavariable, Pound]),
            |p, list| {
                while p.at(Pound) {
                    let attr = p.parse_attribute_item(list);
                    list.push(attr);
                }
                let param = p.parse_generic_parameter(list);
                list.push(param);
            },
        );
    }

    fn parse_generic_parameter(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        match self.current() {
            Quote => {
                let mut b = NodeBuilder::new(LifetimeParameter);
                let name = self.parse_lifetime(&mut b);
                b.push_field(FieldName::Name, name);
                if self.at(Colon) {
                    let bounds = self.parse_trait_bounds(&mut b);
                    b.push_field(FieldName::Bounds, bounds);
                }
                self.finish(b)
            }
            ConstKw => {
                let mut b = NodeBuilder::new(ConstParameter);
                self.bump(&mut b);
                self.expect_name(&mut b, FieldName::Name, Identifier);
                self.expect(&mut b, Colon);
                let ty = self.parse_type(&mut b);
                b.push_field(FieldName::Type, ty);
                if self.at(Eq) {
                    self.bump(&mut b);
                    let value = self.parse_type_argument(&mut b);
                    b.push_field(FieldName::Value, value);
                }
                self.finish(b)
            }
            _ => {
                let mut b = NodeBuilder::new(TypeParameter);
                self.expect_name(&mut b, FieldName::Name, TypeIdentifier);
                if self.at(Colon) {
                    let bounds = self.parse_trait_bounds(&mut b);
                    b.push_field(FieldName::Bounds, bounds);
                }
                if self.at(Eq) {
                    self.bump(&mut b);
                    let ty = self.parse_type(&mut b);
                    b.push_field(FieldName::DefaultType, ty);
                }
                self.finish(b)
            }
        }
    }

    pub(crate) fn parse_where_clause(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::WhereClause);
        self.bump(&mut b);
        loop {
            self.flush_trivia(&mut b);
            if !(self.at(SyntaxKind::Quote) || self.at_type_start()) {
                break;
            }
            let mut predicate = NodeBuilder::new(SyntaxKind::WherePredicate);
            let left = if self.at(SyntaxKind::Quote) {
                self.parse_lifetime(&mut b)
            } else {
                self.parse_type(&mut b)
            };
            predicate.push_field(FieldName::Left, left);
            let bounds = self.parse_trait_bounds(&mut predicate);
            predicate.push_field(FieldName::Bounds, bounds);
            b.push(self.finish(predicate));
            if !self.at(SyntaxKind::Comma) {
                break;
            }
            self.bump(&mut b);
        }
        self.finish(b)
    }

    /// `'a`, `'static`, `'_`.
    pub(crate) fn parse_lifetime(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        self.parse_quoted_name(SyntaxKind::Lifetime)
    }

    /// A lifetime or a label: a quote followed by a name. Keywords are
    /// accepted as names.
    pub(crate) fn parse_quoted_name(&mut self, kind: SyntaxKind) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(kind);
        self.expect(&mut b, SyntaxKind::Quote);
        let current = self.current();
        if current == SyntaxKind::Identifier || current.is_keyword() {
            self.bump_as(&mut b, SyntaxKind::Identifier);
        } else if current == SyntaxKind::Underscore {
            self.bump(&mut b);
        } else {
            self.error_expected("identifier");
            b.push(self.missing(SyntaxKind::Identifier));
        }
        self.finish(b)
    }

    // ========================================================================
    // Retagging
    // ========================================================================

    /// Reinterpret a value path as a type path: `a::B` in `a::B { .. }`.
    pub(crate) fn retag_as_type(&self, node: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        match node.kind() {
            SyntaxKind::Identifier => self.retag(node, SyntaxKind::TypeIdentifier),
            SyntaxKind::ScopedIdentifier => {
                self.rebuild(node, SyntaxKind::ScopedTypeIdentifier, FieldName::Name, |p, n| {
                    p.retag_as_type(n)
                })
            }
            SyntaxKind::GenericFunction => {
                let mut b = NodeBuilder::new(SyntaxKind::GenericType);
                for child in node.children() {
                    if child.field == Some(FieldName::Function) {
                        b.push_field(FieldName::Type, self.retag_as_type(child.node));
                    } else {
                        b.push_child(*child);
                    }
                }
                b.finish_with_range(self.arena, node.range())
            }
            _ => node,
        }
    }

    /// Reinterpret a type path as a value path: the name of a macro.
    pub(crate) fn retag_as_path(&self, node: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        match node.kind() {
            SyntaxKind::TypeIdentifier => self.retag(node, SyntaxKind::Identifier),
            SyntaxKind::ScopedTypeIdentifier => {
                self.rebuild(node, SyntaxKind::ScopedIdentifier, FieldName::Name, |p, n| {
                    p.retag_as_path(n)
                })
            }
            _ => node,
        }
    }

    /// Copy `node` as `kind`, mapping the child labeled `field` with `f`.
    fn rebuild(
        &self,
        node: &'a SyntaxNode<'a>,
        kind: SyntaxKind,
        field: FieldName,
        f: impl Fn(&Self, &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a>,
    ) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(kind);
        b.add_flags(node.flags() & NodeFlags::AMBIGUOUS);
        for child in node.children() {
            let mapped = if child.field == Some(field) {
                f(self, child.node)
            } else {
                child.node
            };
            b.push_child(Child {
                field: child.field,
                node: mapped,
            });
        }
        b.finish_with_range(self.arena, node.range())
    }
}
