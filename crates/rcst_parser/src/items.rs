//! Items: functions, type definitions, modules, `use`, attributes and
//! `macro_rules!` definitions.

use rcst_diagnostics::messages;
use rcst_syntax::{FieldName, NodeBuilder, SyntaxKind, SyntaxNode};

use crate::conflicts::ConflictId;
use crate::macros::{INVOCATION, PATTERN};
use crate::parser::{Parser, Restrictions};

/// Where a parameter list appears. Function types take bare types as
/// parameters; functions only take them as the deprecated anonymous form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamContext {
    Function,
    FnType,
}

const PARAMETER_SYNC: &[SyntaxKind] = &[SyntaxKind::CloseBrace, SyntaxKind::Semicolon];

impl<'a> Parser<'a> {
    pub(crate) fn at_item_start(&mut self) -> bool {
        use SyntaxKind::*;
        match self.current() {
            Pound | PubKw | FnKw | StructKw | EnumKw | TraitKw | ImplKw | TypeKw | ModKw | UseKw
            | ExternKw => true,
            ConstKw | UnsafeKw => self.nth(1) != OpenBrace,
            StaticKw => !matches!(self.nth(1), Pipe | PipePipe | MoveKw),
            AsyncKw => matches!(self.nth(1), FnKw | UnsafeKw | ExternKw),
            Identifier => match self.token_text() {
                "union" => self.nth(1) == Identifier,
                "auto" => matches!(self.nth(1), TraitKw),
                "default" => matches!(
                    self.nth(1),
                    FnKw | ImplKw | TypeKw | ConstKw | UnsafeKw | AsyncKw | ExternKw
                ),
                "macro_rules" => self.nth(1) == Bang,
                _ => false,
            },
            _ => false,
        }
    }

    /// Parse one item (or attribute) into `parent`. Returns false without
    /// consuming anything when the current token cannot start one.
    pub(crate) fn parse_item(&mut self, parent: &mut NodeBuilder<'a>) -> bool {
        self.flush_trivia(parent);
        if self.at(SyntaxKind::Pound) {
            let attr = self.parse_attribute_item(parent);
            parent.push(attr);
            return true;
        }
        if !self.at_item_start() {
            return false;
        }
        let mut b = NodeBuilder::new(SyntaxKind::Error);
        if self.at(SyntaxKind::PubKw) {
            let visibility = self.parse_visibility(&mut b);
            b.push(visibility);
        }
        let item = self.parse_item_after_visibility(b);
        parent.push(item);
        true
    }

    fn parse_item_after_visibility(&mut self, b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        match self.current() {
            FnKw | AsyncKw => self.parse_function(b),
            ConstKw => match self.nth(1) {
                FnKw | UnsafeKw | AsyncKw | ExternKw => self.parse_function(b),
                _ => self.parse_const_item(b),
            },
            UnsafeKw => match self.nth(1) {
                ImplKw => self.parse_impl(b),
                TraitKw => self.parse_trait(b),
                Identifier if self.nth_text(1) == "auto" => self.parse_trait(b),
                ExternKw if self.at_foreign_mod_after(2) => self.parse_foreign_mod(b),
                _ => self.parse_function(b),
            },
            ExternKw => {
                if self.nth(1) == CrateKw {
                    self.parse_extern_crate(b)
                } else if self.at_foreign_mod_after(1) {
                    self.parse_foreign_mod(b)
                } else {
                    self.parse_function(b)
                }
            }
            StaticKw => self.parse_static_item(b),
            StructKw => self.parse_struct(b, StructItem),
            EnumKw => self.parse_enum(b),
            TraitKw => self.parse_trait(b),
            ImplKw => self.parse_impl(b),
            TypeKw => self.parse_type_item(b),
            ModKw => self.parse_mod(b),
            UseKw => self.parse_use_declaration(b),
            Identifier => match self.token_text() {
                "union" if self.nth(1) == Identifier => self.parse_struct(b, UnionItem),
                "auto" if self.nth(1) == TraitKw => self.parse_trait(b),
                "macro_rules" if self.nth(1) == Bang => self.parse_macro_definition(b),
                "default" => match self.nth(1) {
                    ImplKw => self.parse_impl(b),
                    TypeKw => self.parse_type_item(b),
                    ConstKw if !matches!(self.nth(2), FnKw | UnsafeKw | AsyncKw | ExternKw) => {
                        self.parse_const_item(b)
                    }
                    _ => self.parse_function(b),
                },
                _ => self.parse_not_an_item(b),
            },
            _ => self.parse_not_an_item(b),
        }
    }

    /// A visibility modifier with no item after it.
    fn parse_not_an_item(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.error_expected("item");
        b.set_kind(SyntaxKind::Error);
        b.clear_fields();
        self.finish(b)
    }

    /// Whether `extern` at offset `n - 1` opens a foreign module:
    /// `extern {` or `extern "C" {`.
    fn at_foreign_mod_after(&mut self, n: usize) -> bool {
        match self.nth(n) {
            SyntaxKind::OpenBrace => true,
            SyntaxKind::StringToken | SyntaxKind::RawStringToken => self.nth(n + 1) == SyntaxKind::OpenBrace,
            _ => false,
        }
    }

    /// The contextual `default` of specialization.
    fn bump_default(&mut self, b: &mut NodeBuilder<'a>) {
        if self.at_contextual("default") {
            self.bump_as(b, SyntaxKind::DefaultKw);
        }
    }

    // ========================================================================
    // Attributes and visibility
    // ========================================================================

    /// `#[attr]` or `#![attr]`.
    pub(crate) fn parse_attribute_item(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(AttributeItem);
        self.bump(&mut b);
        if self.at(Bang) {
            b.set_kind(InnerAttributeItem);
            self.bump(&mut b);
        }
        if !self.at(OpenBracket) {
            self.expect(&mut b, OpenBracket);
            return self.finish(b);
        }
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        let attribute = self.parse_attribute(&mut b);
        b.push(attribute);
        self.close_delimiter(&mut b, OpenBracket, open_range);
        self.finish(b)
    }

    fn parse_attribute(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::Attribute);
        let path = self.parse_simple_path(&mut b);
        b.push(path);
        if self.at(SyntaxKind::Eq) {
            self.bump(&mut b);
            let value = self.with_restrictions(Restrictions::NONE, |p| p.parse_expression(&mut b));
            b.push_field(FieldName::Value, value);
        } else if self.current().is_open_delimiter() {
            let arguments = self.parse_token_tree(&mut b, &INVOCATION);
            b.push_field(FieldName::Arguments, arguments);
        }
        self.finish(b)
    }

    /// `pub`, `pub(crate)`, `pub(self)`, `pub(super)`, `pub(in path)`.
    pub(crate) fn parse_visibility(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(VisibilityModifier);
        self.bump(&mut b);
        if !self.at(OpenParen) {
            return self.finish(b);
        }
        // `pub (crate::A, B)` in a tuple struct is a visibility and a type.
        let restricted = match self.nth(1) {
            CrateKw | SelfKw | SuperKw => self.nth(2) == CloseParen,
            InKw => true,
            _ => false,
        };
        if !restricted {
            self.resolved(ConflictId::VisibilityModifier, TupleType);
            return self.finish(b);
        }
        self.resolved(ConflictId::VisibilityModifier, VisibilityModifier);
        self.bump(&mut b);
        if self.at(InKw) {
            self.bump(&mut b);
            let path = self.parse_simple_path(&mut b);
            b.push(path);
        } else {
            self.bump(&mut b);
        }
        self.expect(&mut b, CloseParen);
        self.finish(b)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn at_function_modifier(&self) -> bool {
        use SyntaxKind::*;
        self.at_any(&[ConstKw, AsyncKw, UnsafeKw, ExternKw]) || self.at_contextual("default")
    }

    /// `default`, `const`, `async`, `unsafe` and `extern "abi"` before `fn`.
    pub(crate) fn parse_function_modifiers(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(FunctionModifiers);
        loop {
            match self.current() {
                ConstKw | AsyncKw | UnsafeKw => self.bump(&mut b),
                ExternKw => {
                    let modifier = self.parse_extern_modifier(&mut b);
                    b.push(modifier);
                }
                Identifier if self.token_text() == "default" => self.bump_as(&mut b, DefaultKw),
                _ => break,
            }
        }
        self.finish(b)
    }

    fn parse_extern_modifier(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::ExternModifier);
        self.bump(&mut b);
        if self.at_any(&[SyntaxKind::StringToken, SyntaxKind::RawStringToken]) {
            let abi = self.parse_literal(&mut b);
            b.push(abi);
        }
        self.finish(b)
    }

    fn parse_function(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(FunctionItem);
        if self.at_function_modifier() {
            let modifiers = self.parse_function_modifiers(&mut b);
            b.push(modifiers);
        }
        self.expect(&mut b, FnKw);
        self.expect_name(&mut b, FieldName::Name, Identifier);
        if self.at(Lt) {
            let params = self.parse_type_parameters(&mut b);
            b.push_field(FieldName::TypeParameters, params);
        }
        let parameters = self.parse_parameters(&mut b, ParamContext::Function);
        b.push_field(FieldName::Parameters, parameters);
        if self.at(Arrow) {
            self.bump(&mut b);
            let ret = self.parse_type(&mut b);
            b.push_field(FieldName::ReturnType, ret);
        }
        if self.at(WhereKw) {
            let clause = self.parse_where_clause(&mut b);
            b.push(clause);
        }
        match self.current() {
            OpenBrace => {
                let body = self.parse_block(&mut b);
                b.push_field(FieldName::Body, body);
            }
            Semicolon => {
                b.set_kind(FunctionSignatureItem);
                self.bump(&mut b);
            }
            // The `{` was swallowed while recovering the parameters.
            _ if self.absorb_unclosed_brace(&mut b) => {}
            _ => self.error_expected("'{' or ';'"),
        }
        self.finish(b)
    }

    /// `(params)` of a function or a function type.
    pub(crate) fn parse_parameters(
        &mut self,
        parent: &mut NodeBuilder<'a>,
        ctx: ParamContext,
    ) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::Parameters);
        self.with_restrictions(Restrictions::NONE, |p| {
            p.parse_list(
                &mut b,
                SyntaxKind::OpenParen,
                SyntaxKind::CloseParen,
                PARAMETER_SYNC,
                |p| p.at_parameter_start(),
                |p, list| p.parse_parameter(list, ctx),
            )
        });
        self.finish(b)
    }

    fn at_parameter_start(&self) -> bool {
        self.at_pattern_start() || self.at_type_start() || self.at_any(&[SyntaxKind::Pound, SyntaxKind::DotDotDot])
    }

    fn parse_parameter(&mut self, list: &mut NodeBuilder<'a>, ctx: ParamContext) {
        use SyntaxKind::*;
        self.flush_trivia(list);
        while self.at(Pound) {
            let attr = self.parse_attribute_item(list);
            list.push(attr);
        }
        if self.at_self_parameter() {
            let param = self.parse_self_parameter(list);
            list.push(param);
            return;
        }
        if self.at(DotDotDot) {
            let mut b = NodeBuilder::new(VariadicParameter);
            self.bump(&mut b);
            list.push(self.finish(b));
            return;
        }
        if ctx == ParamContext::FnType {
            if self.at_any(&[Identifier, Underscore]) && self.nth(1) == Colon {
                let mut b = NodeBuilder::new(Parameter);
                let name = self.leaf(&mut b, None);
                b.push_field(FieldName::Pattern, name);
                self.bump(&mut b);
                let ty = self.parse_type(&mut b);
                b.push_field(FieldName::Type, ty);
                list.push(self.finish(b));
            } else {
                let ty = self.parse_type(list);
                list.push(ty);
            }
            return;
        }
        let named = self.speculate(ConflictId::TypeVsPattern, |p| {
            let mut b = NodeBuilder::new(Parameter);
            if p.at(MutKw) {
                p.bump(&mut b);
            }
            let pattern = p.parse_single_pattern(&mut b);
            if !p.at(Colon) {
                return None;
            }
            b.push_field(FieldName::Pattern, pattern);
            Some(b)
        });
        match named {
            Some(mut b) => {
                self.bump(&mut b);
                let ty = self.parse_type(&mut b);
                b.push_field(FieldName::Type, ty);
                list.push(self.finish(b));
            }
            None => {
                let mut b = NodeBuilder::new(Parameter);
                let ty = self.parse_type(&mut b);
                b.push_field(FieldName::Type, ty);
                let param = self.finish(b);
                if self.options.allow_anonymous_parameters {
                    self.error_at(param.range(), &messages::ANONYMOUS_PARAMETERS_ARE_DEPRECATED, &[]);
                } else {
                    self.error_at(param.range(), &messages::ANONYMOUS_PARAMETERS_ARE_NOT_ALLOWED, &[]);
                }
                list.push(param);
            }
        }
    }

    fn at_self_parameter(&mut self) -> bool {
        use SyntaxKind::*;
        match self.current() {
            SelfKw => !matches!(self.nth(1), Colon | ColonColon),
            MutKw => self.nth(1) == SelfKw && self.nth(2) != Colon,
            Amp => match self.nth(1) {
                SelfKw => true,
                MutKw => self.nth(2) == SelfKw,
                Quote => match self.nth(3) {
                    SelfKw => true,
                    MutKw => self.nth(4) == SelfKw,
                    _ => false,
                },
                _ => false,
            },
            _ => false,
        }
    }

    /// `self`, `mut self`, `&self`, `&'a mut self`.
    fn parse_self_parameter(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SelfParameter);
        if self.at(Amp) {
            self.bump(&mut b);
            if self.at(Quote) {
                let lifetime = self.parse_lifetime(&mut b);
                b.push(lifetime);
            }
        }
        if self.at(MutKw) {
            self.bump(&mut b);
        }
        self.expect(&mut b, SelfKw);
        self.finish(b)
    }

    // ========================================================================
    // Type definitions
    // ========================================================================

    /// `struct` and `union`.
    fn parse_struct(&mut self, mut b: NodeBuilder<'a>, kind: SyntaxKind) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(kind);
        if kind == UnionItem {
            self.bump_as(&mut b, UnionKw);
        } else {
            self.bump(&mut b);
        }
        self.expect_name(&mut b, FieldName::Name, TypeIdentifier);
        if self.at(Lt) {
            let params = self.parse_type_parameters(&mut b);
            b.push_field(FieldName::TypeParameters, params);
        }
        if self.at(WhereKw) {
            let clause = self.parse_where_clause(&mut b);
            b.push(clause);
        }
        match self.current() {
            OpenBrace => {
                let body = self.parse_field_declaration_list(&mut b);
                b.push_field(FieldName::Body, body);
            }
            OpenParen if kind == StructItem => {
                let body = self.parse_ordered_field_declaration_list(&mut b);
                b.push_field(FieldName::Body, body);
                if self.at(WhereKw) {
                    let clause = self.parse_where_clause(&mut b);
                    b.push(clause);
                }
                self.expect(&mut b, Semicolon);
            }
            Semicolon if kind == StructItem => self.bump(&mut b),
            _ if self.absorb_unclosed_brace(&mut b) => {}
            _ => self.error_expected("'{', '(' or ';'"),
        }
        self.finish(b)
    }

    pub(crate) fn parse_field_declaration_list(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(FieldDeclarationList);
        self.parse_list(
            &mut b,
            OpenBrace,
            CloseBrace,
            &[],
            |p| p.at_any(&[Identifier, PubKw, Pound, Metavariable]),
            |p, list| {
                while p.at(Pound) {
                    let attr = p.parse_attribute_item(list);
                    list.push(attr);
                }
                p.flush_trivia(list);
                let mut field = NodeBuilder::new(FieldDeclaration);
                if p.at(PubKw) {
                    let visibility = p.parse_visibility(&mut field);
                    field.push(visibility);
                }
                p.expect_name(&mut field, FieldName::Name, FieldIdentifier);
                p.expect(&mut field, Colon);
                let ty = p.parse_type(&mut field);
                field.push_field(FieldName::Type, ty);
                list.push(p.finish(field));
            },
        );
        self.finish(b)
    }

    fn parse_ordered_field_declaration_list(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(OrderedFieldDeclarationList);
        self.parse_list(
            &mut b,
            OpenParen,
            CloseParen,
            PARAMETER_SYNC,
            |p| p.at_type_start() || p.at_any(&[PubKw, Pound]),
            |p, list| {
                while p.at(Pound) {
                    let attr = p.parse_attribute_item(list);
                    list.push(attr);
                }
                if p.at(PubKw) {
                    let visibility = p.parse_visibility(list);
                    list.push(visibility);
                }
                let ty = p.parse_type(list);
                list.push_field(FieldName::Type, ty);
            },
        );
        self.finish(b)
    }

    fn parse_enum(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(EnumItem);
        self.bump(&mut b);
        self.expect_name(&mut b, FieldName::Name, TypeIdentifier);
        if self.at(Lt) {
            let params = self.parse_type_parameters(&mut b);
            b.push_field(FieldName::TypeParameters, params);
        }
        if self.at(WhereKw) {
            let clause = self.parse_where_clause(&mut b);
            b.push(clause);
        }
        self.flush_trivia(&mut b);
        let mut body = NodeBuilder::new(EnumVariantList);
        self.parse_list(
            &mut body,
            OpenBrace,
            CloseBrace,
            &[],
            |p| p.at_any(&[Identifier, PubKw, Pound, Metavariable]),
            |p, list| {
                while p.at(Pound) {
                    let attr = p.parse_attribute_item(list);
                    list.push(attr);
                }
                let variant = p.parse_enum_variant(list);
                list.push(variant);
            },
        );
        b.push_field(FieldName::Body, self.finish(body));
        self.finish(b)
    }

    fn parse_enum_variant(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(EnumVariant);
        if self.at(PubKw) {
            let visibility = self.parse_visibility(&mut b);
            b.push(visibility);
        }
        self.expect_name(&mut b, FieldName::Name, Identifier);
        match self.current() {
            OpenBrace => {
                let body = self.parse_field_declaration_list(&mut b);
                b.push_field(FieldName::Body, body);
            }
            OpenParen => {
                let body = self.parse_ordered_field_declaration_list(&mut b);
                b.push_field(FieldName::Body, body);
            }
            _ => {}
        }
        if self.at(Eq) {
            self.bump(&mut b);
            let value = self.parse_expression(&mut b);
            b.push_field(FieldName::Value, value);
        }
        self.finish(b)
    }

    fn parse_trait(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(TraitItem);
        if self.at(UnsafeKw) {
            self.bump(&mut b);
        }
        if self.at_contextual("auto") {
            self.bump_as(&mut b, AutoKw);
        }
        self.expect(&mut b, TraitKw);
        self.expect_name(&mut b, FieldName::Name, TypeIdentifier);
        if self.at(Lt) {
            let params = self.parse_type_parameters(&mut b);
            b.push_field(FieldName::TypeParameters, params);
        }
        if self.at(Colon) {
            let bounds = self.parse_trait_bounds(&mut b);
            b.push_field(FieldName::Bounds, bounds);
        }
        if self.at(WhereKw) {
            let clause = self.parse_where_clause(&mut b);
            b.push(clause);
        }
        let body = self.parse_declaration_list(&mut b);
        b.push_field(FieldName::Body, body);
        self.finish(b)
    }

    /// `impl<T> Trait for Type {}` and `impl Type {}`.
    fn parse_impl(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(ImplItem);
        self.bump_default(&mut b);
        if self.at(UnsafeKw) {
            self.bump(&mut b);
        }
        self.expect(&mut b, ImplKw);
        if self.at(Lt) {
            let params = self.parse_type_parameters(&mut b);
            b.push_field(FieldName::TypeParameters, params);
        }
        if self.at(Bang) {
            self.bump(&mut b);
        }
        let first = self.parse_type(&mut b);
        if self.at(ForKw) {
            b.push_field(FieldName::Trait, first);
            self.bump(&mut b);
            let ty = self.parse_type(&mut b);
            b.push_field(FieldName::Type, ty);
        } else {
            b.push_field(FieldName::Type, first);
        }
        if self.at(WhereKw) {
            let clause = self.parse_where_clause(&mut b);
            b.push(clause);
        }
        if self.at(Semicolon) {
            self.bump(&mut b);
        } else {
            let body = self.parse_declaration_list(&mut b);
            b.push_field(FieldName::Body, body);
        }
        self.finish(b)
    }

    /// `type A = B;` or, with bounds or without a value, an associated type.
    fn parse_type_item(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(AssociatedType);
        self.bump_default(&mut b);
        self.bump(&mut b);
        self.expect_name(&mut b, FieldName::Name, TypeIdentifier);
        if self.at(Lt) {
            let params = self.parse_type_parameters(&mut b);
            b.push_field(FieldName::TypeParameters, params);
        }
        if self.at(Colon) {
            let bounds = self.parse_trait_bounds(&mut b);
            b.push_field(FieldName::Bounds, bounds);
        }
        if self.at(WhereKw) {
            let clause = self.parse_where_clause(&mut b);
            b.push(clause);
        }
        if self.at(Eq) {
            b.set_kind(TypeItem);
            self.bump(&mut b);
            let ty = self.parse_type(&mut b);
            b.push_field(FieldName::Type, ty);
            if self.at(WhereKw) {
                let clause = self.parse_where_clause(&mut b);
                b.push(clause);
            }
        }
        self.expect(&mut b, Semicolon);
        self.finish(b)
    }

    fn parse_const_item(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(ConstItem);
        self.bump_default(&mut b);
        self.bump(&mut b);
        if self.at(Underscore) {
            self.bump_field(&mut b, FieldName::Name);
        } else {
            self.expect_name(&mut b, FieldName::Name, Identifier);
        }
        self.expect(&mut b, Colon);
        let ty = self.parse_type(&mut b);
        b.push_field(FieldName::Type, ty);
        if self.at(Eq) {
            self.bump(&mut b);
            let value = self.parse_expression(&mut b);
            b.push_field(FieldName::Value, value);
        }
        self.expect(&mut b, Semicolon);
        self.finish(b)
    }

    /// `static [ref] [mut] NAME: T [= value];`. `static ref` comes from
    /// `lazy_static!` bodies.
    fn parse_static_item(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(StaticItem);
        self.bump(&mut b);
        if self.at(RefKw) {
            if !self.options.allow_static_ref {
                self.error_here(&messages::STATIC_REF_IS_NOT_ALLOWED, &[]);
            }
            self.bump(&mut b);
        }
        if self.at(MutKw) {
            self.bump(&mut b);
        }
        self.expect_name(&mut b, FieldName::Name, Identifier);
        self.expect(&mut b, Colon);
        let ty = self.parse_type(&mut b);
        b.push_field(FieldName::Type, ty);
        if self.at(Eq) {
            self.bump(&mut b);
            let value = self.parse_expression(&mut b);
            b.push_field(FieldName::Value, value);
        }
        self.expect(&mut b, Semicolon);
        self.finish(b)
    }

    // ========================================================================
    // Modules
    // ========================================================================

    fn parse_mod(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        b.set_kind(SyntaxKind::ModItem);
        self.bump(&mut b);
        self.expect_name(&mut b, FieldName::Name, SyntaxKind::Identifier);
        if self.at(SyntaxKind::Semicolon) {
            self.bump(&mut b);
        } else {
            let body = self.parse_declaration_list(&mut b);
            b.push_field(FieldName::Body, body);
        }
        self.finish(b)
    }

    /// `{ items }` of a module, trait, impl or foreign block.
    pub(crate) fn parse_declaration_list(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(DeclarationList);
        if !self.at(OpenBrace) {
            self.error_here(&messages::_0_EXPECTED, &["{"]);
            b.push(self.missing(OpenBrace));
            b.push(self.missing(CloseBrace));
            return self.finish(b);
        }
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        self.parse_statements(&mut b, Some(CloseBrace), true);
        self.close_delimiter(&mut b, OpenBrace, open_range);
        self.finish(b)
    }

    fn parse_extern_crate(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(ExternCrateDeclaration);
        self.bump(&mut b);
        self.bump(&mut b);
        if self.at(SelfKw) {
            self.bump_field(&mut b, FieldName::Name);
        } else {
            self.expect_name(&mut b, FieldName::Name, Identifier);
        }
        if self.at(AsKw) {
            self.bump(&mut b);
            if self.at(Underscore) {
                self.bump_field(&mut b, FieldName::Alias);
            } else {
                self.expect_name(&mut b, FieldName::Alias, Identifier);
            }
        }
        self.expect(&mut b, Semicolon);
        self.finish(b)
    }

    fn parse_foreign_mod(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        b.set_kind(SyntaxKind::ForeignModItem);
        if self.at(SyntaxKind::UnsafeKw) {
            self.bump(&mut b);
        }
        let modifier = self.parse_extern_modifier(&mut b);
        b.push(modifier);
        let body = self.parse_declaration_list(&mut b);
        b.push_field(FieldName::Body, body);
        self.finish(b)
    }

    fn parse_use_declaration(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        b.set_kind(SyntaxKind::UseDeclaration);
        self.bump(&mut b);
        let argument = self.parse_use_clause(&mut b);
        b.push_field(FieldName::Argument, argument);
        self.expect(&mut b, SyntaxKind::Semicolon);
        self.finish(b)
    }

    fn parse_use_clause(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        match self.current() {
            OpenBrace => return self.parse_use_list(parent),
            Star => {
                let mut b = NodeBuilder::new(UseWildcard);
                self.bump(&mut b);
                return self.finish(b);
            }
            ColonColon if matches!(self.nth(1), OpenBrace | Star) => {
                let mut b = NodeBuilder::new(ScopedUseList);
                self.bump(&mut b);
                if self.at(Star) {
                    b.set_kind(UseWildcard);
                    self.bump(&mut b);
                } else {
                    let list = self.parse_use_list(&mut b);
                    b.push_field(FieldName::List, list);
                }
                return self.finish(b);
            }
            _ => {}
        }
        let path = self.parse_simple_path(parent);
        if self.at(ColonColon) {
            match self.nth(1) {
                OpenBrace => {
                    let mut b = NodeBuilder::new(ScopedUseList);
                    b.push_field(FieldName::Path, path);
                    self.bump(&mut b);
                    let list = self.parse_use_list(&mut b);
                    b.push_field(FieldName::List, list);
                    return self.finish(b);
                }
                Star => {
                    let mut b = NodeBuilder::new(UseWildcard);
                    b.push(path);
                    self.bump(&mut b);
                    self.bump(&mut b);
                    return self.finish(b);
                }
                _ => {}
            }
        }
        if self.at(AsKw) {
            let mut b = NodeBuilder::new(UseAsClause);
            b.push_field(FieldName::Path, path);
            self.bump(&mut b);
            if self.at(Underscore) {
                self.bump_field(&mut b, FieldName::Alias);
            } else {
                self.expect_name(&mut b, FieldName::Alias, Identifier);
            }
            return self.finish(b);
        }
        path
    }

    fn parse_use_list(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(UseList);
        self.parse_list(
            &mut b,
            OpenBrace,
            CloseBrace,
            &[Semicolon],
            |p| p.at_path_segment() || p.at_any(&[ColonColon, OpenBrace, Star]),
            |p, list| {
                let clause = p.parse_use_clause(list);
                list.push(clause);
            },
        );
        self.finish(b)
    }

    // ========================================================================
    // macro_rules!
    // ========================================================================

    /// `macro_rules! name { (pattern) => { expansion }; ... }`.
    fn parse_macro_definition(&mut self, mut b: NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        b.set_kind(MacroDefinition);
        self.bump_as(&mut b, MacroRulesKw);
        self.expect(&mut b, Bang);
        self.expect_name(&mut b, FieldName::Name, Identifier);
        self.flush_trivia(&mut b);
        let open = self.current();
        let Some(close) = open.matching_close() else {
            self.error_expected("'{', '(' or '['");
            return self.finish(b);
        };
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        loop {
            self.flush_trivia(&mut b);
            let kind = self.current();
            if kind == close {
                self.bump(&mut b);
                break;
            }
            if kind == EndOfFile {
                self.error_at(open_range, &messages::UNCLOSED_DELIMITER_0, &[open.name()]);
                b.push(self.missing(close));
                break;
            }
            if kind.is_close_delimiter() {
                self.error_here(
                    &messages::MISMATCHED_CLOSING_DELIMITER_0_EXPECTED_1,
                    &[kind.name(), close.name()],
                );
                b.push(self.missing(close));
                break;
            }
            if kind == Semicolon {
                self.bump(&mut b);
                continue;
            }
            if kind.is_open_delimiter() {
                let rule = self.parse_macro_rule(&mut b);
                b.push(rule);
                continue;
            }
            self.error_unexpected();
            let junk = self.skip_group_as_error();
            b.push(junk);
        }
        if open != OpenBrace {
            self.expect(&mut b, Semicolon);
        }
        self.finish(b)
    }

    fn parse_macro_rule(&mut self, parent: &mut NodeBuilder<'a>) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        let mut b = NodeBuilder::new(SyntaxKind::MacroRule);
        let left = self.parse_token_tree(&mut b, &PATTERN);
        b.push_field(FieldName::Left, left);
        self.expect(&mut b, SyntaxKind::FatArrow);
        let right = self.parse_token_tree(&mut b, &INVOCATION);
        b.push_field(FieldName::Right, right);
        self.finish(b)
    }
}
