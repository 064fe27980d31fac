//! Supertypes: closed grammar categories standing for several node kinds.
//!
//! No wrapper node is ever built for a supertype. A node keeps its concrete
//! kind, and consumers ask whether that kind belongs to a category.

use crate::syntax_kind::SyntaxKind;

/// A grammar category whose members are interchangeable at the positions
/// that expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Supertype {
    Expression,
    Type,
    Pattern,
    Literal,
    LiteralPattern,
    DeclarationStatement,
}

const LITERAL_VARIANTS: &[SyntaxKind] = &[
    SyntaxKind::StringLiteral,
    SyntaxKind::RawStringLiteral,
    SyntaxKind::CharLiteral,
    SyntaxKind::BooleanLiteral,
    SyntaxKind::IntegerLiteral,
    SyntaxKind::FloatLiteral,
];

const LITERAL_PATTERN_VARIANTS: &[SyntaxKind] = &[
    SyntaxKind::StringLiteral,
    SyntaxKind::RawStringLiteral,
    SyntaxKind::CharLiteral,
    SyntaxKind::BooleanLiteral,
    SyntaxKind::IntegerLiteral,
    SyntaxKind::FloatLiteral,
    SyntaxKind::NegativeLiteral,
];

const EXPRESSION_VARIANTS: &[SyntaxKind] = &[
    SyntaxKind::UnaryExpression,
    SyntaxKind::ReferenceExpression,
    SyntaxKind::TryExpression,
    SyntaxKind::BinaryExpression,
    SyntaxKind::AssignmentExpression,
    SyntaxKind::CompoundAssignmentExpr,
    SyntaxKind::TypeCastExpression,
    SyntaxKind::RangeExpression,
    SyntaxKind::CallExpression,
    SyntaxKind::FieldExpression,
    SyntaxKind::IndexExpression,
    SyntaxKind::AwaitExpression,
    SyntaxKind::GenericFunction,
    SyntaxKind::ScopedIdentifier,
    SyntaxKind::Identifier,
    SyntaxKind::SelfKw,
    SyntaxKind::Metavariable,
    SyntaxKind::ParenthesizedExpression,
    SyntaxKind::TupleExpression,
    SyntaxKind::UnitExpression,
    SyntaxKind::ArrayExpression,
    SyntaxKind::StructExpression,
    SyntaxKind::IfExpression,
    SyntaxKind::MatchExpression,
    SyntaxKind::WhileExpression,
    SyntaxKind::LoopExpression,
    SyntaxKind::ForExpression,
    SyntaxKind::ClosureExpression,
    SyntaxKind::ReturnExpression,
    SyntaxKind::BreakExpression,
    SyntaxKind::ContinueExpression,
    SyntaxKind::YieldExpression,
    SyntaxKind::Block,
    SyntaxKind::UnsafeBlock,
    SyntaxKind::AsyncBlock,
    SyntaxKind::ConstBlock,
    SyntaxKind::MacroInvocation,
    SyntaxKind::StringLiteral,
    SyntaxKind::RawStringLiteral,
    SyntaxKind::CharLiteral,
    SyntaxKind::BooleanLiteral,
    SyntaxKind::IntegerLiteral,
    SyntaxKind::FloatLiteral,
];

const TYPE_VARIANTS: &[SyntaxKind] = &[
    SyntaxKind::TypeIdentifier,
    SyntaxKind::PrimitiveType,
    SyntaxKind::ScopedTypeIdentifier,
    SyntaxKind::GenericType,
    SyntaxKind::ReferenceType,
    SyntaxKind::PointerType,
    SyntaxKind::TupleType,
    SyntaxKind::UnitType,
    SyntaxKind::ArrayType,
    SyntaxKind::FunctionType,
    SyntaxKind::NeverType,
    SyntaxKind::AbstractType,
    SyntaxKind::DynamicType,
    SyntaxKind::BoundedType,
    SyntaxKind::QualifiedType,
    SyntaxKind::MacroInvocation,
    SyntaxKind::Metavariable,
    SyntaxKind::Underscore,
];

const PATTERN_VARIANTS: &[SyntaxKind] = &[
    SyntaxKind::Identifier,
    SyntaxKind::ScopedIdentifier,
    SyntaxKind::Underscore,
    SyntaxKind::TuplePattern,
    SyntaxKind::TupleStructPattern,
    SyntaxKind::StructPattern,
    SyntaxKind::RestPattern,
    SyntaxKind::SlicePattern,
    SyntaxKind::RefPattern,
    SyntaxKind::MutPattern,
    SyntaxKind::ReferencePattern,
    SyntaxKind::CapturedPattern,
    SyntaxKind::OrPattern,
    SyntaxKind::RangePattern,
    SyntaxKind::MacroInvocation,
    SyntaxKind::Metavariable,
    SyntaxKind::StringLiteral,
    SyntaxKind::RawStringLiteral,
    SyntaxKind::CharLiteral,
    SyntaxKind::BooleanLiteral,
    SyntaxKind::IntegerLiteral,
    SyntaxKind::FloatLiteral,
    SyntaxKind::NegativeLiteral,
];

const DECLARATION_STATEMENT_VARIANTS: &[SyntaxKind] = &[
    SyntaxKind::ConstItem,
    SyntaxKind::MacroInvocation,
    SyntaxKind::MacroDefinition,
    SyntaxKind::EmptyStatement,
    SyntaxKind::AttributeItem,
    SyntaxKind::InnerAttributeItem,
    SyntaxKind::ModItem,
    SyntaxKind::ForeignModItem,
    SyntaxKind::StructItem,
    SyntaxKind::UnionItem,
    SyntaxKind::EnumItem,
    SyntaxKind::TypeItem,
    SyntaxKind::FunctionItem,
    SyntaxKind::FunctionSignatureItem,
    SyntaxKind::ImplItem,
    SyntaxKind::TraitItem,
    SyntaxKind::AssociatedType,
    SyntaxKind::LetDeclaration,
    SyntaxKind::UseDeclaration,
    SyntaxKind::ExternCrateDeclaration,
    SyntaxKind::StaticItem,
];

impl Supertype {
    pub const ALL: &'static [Supertype] = &[
        Supertype::Expression,
        Supertype::Type,
        Supertype::Pattern,
        Supertype::Literal,
        Supertype::LiteralPattern,
        Supertype::DeclarationStatement,
    ];

    /// The grammar name of this category.
    pub fn name(self) -> &'static str {
        match self {
            Supertype::Expression => "_expression",
            Supertype::Type => "_type",
            Supertype::Pattern => "_pattern",
            Supertype::Literal => "_literal",
            Supertype::LiteralPattern => "_literal_pattern",
            Supertype::DeclarationStatement => "_declaration_statement",
        }
    }

    /// The concrete kinds substitutable for this category.
    pub fn variants(self) -> &'static [SyntaxKind] {
        match self {
            Supertype::Expression => EXPRESSION_VARIANTS,
            Supertype::Type => TYPE_VARIANTS,
            Supertype::Pattern => PATTERN_VARIANTS,
            Supertype::Literal => LITERAL_VARIANTS,
            Supertype::LiteralPattern => LITERAL_PATTERN_VARIANTS,
            Supertype::DeclarationStatement => DECLARATION_STATEMENT_VARIANTS,
        }
    }

    /// Whether `kind` is one of the variants of this category.
    pub fn contains(self, kind: SyntaxKind) -> bool {
        self.variants().contains(&kind)
    }

    /// Every category `kind` belongs to.
    pub fn of(kind: SyntaxKind) -> impl Iterator<Item = Supertype> {
        Self::ALL.iter().copied().filter(move |s| s.contains(kind))
    }
}
