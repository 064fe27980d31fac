//! SyntaxKind enum - every token and node kind in a Rust concrete syntax tree.
//!
//! Tokens come first, then node kinds. Ordering matters: the range helpers
//! below compare discriminants, so new variants must be added inside the
//! group they belong to.

/// The kind of a syntax token or node in the CST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown,
    EndOfFile,
    /// Emitted when a context-sensitive construct could not be recognized.
    ErrorSentinel,

    // Delimiters and punctuation
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
    Colon,
    ColonColon,
    Dot,
    DotDot,
    DotDotDot,
    DotDotEq,
    Pound,
    Dollar,
    Question,
    At,
    Arrow,
    FatArrow,
    Quote,
    Underscore,
    Tilde,

    // Operators
    Bang,
    Eq,
    EqEq,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    AmpAmp,
    PipePipe,
    Shl,
    Shr,

    // Compound assignment
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    CaretEq,
    AmpEq,
    PipeEq,
    ShlEq,
    ShrEq,

    // Comment pieces
    LineCommentStart,
    BlockCommentStart,
    BlockCommentEnd,
    OuterDocCommentMarker,
    InnerDocCommentMarker,
    DocComment,

    // Reserved keywords
    AsKw,
    AsyncKw,
    AwaitKw,
    BreakKw,
    ConstKw,
    ContinueKw,
    CrateKw,
    DynKw,
    ElseKw,
    EnumKw,
    ExternKw,
    FalseKw,
    FnKw,
    ForKw,
    IfKw,
    ImplKw,
    InKw,
    LetKw,
    LoopKw,
    MatchKw,
    ModKw,
    MoveKw,
    MutKw,
    PubKw,
    RefKw,
    ReturnKw,
    SelfKw,
    SelfTypeKw,
    StaticKw,
    StructKw,
    SuperKw,
    TraitKw,
    TrueKw,
    TypeKw,
    UnsafeKw,
    UseKw,
    WhereKw,
    WhileKw,
    YieldKw,

    // Contextual keywords. The scanner produces `Identifier` for these and
    // the parser retags them where they act as keywords.
    AutoKw,
    DefaultKw,
    MacroRulesKw,
    RawKw,
    UnionKw,

    // Content leaves
    Identifier,
    TypeIdentifier,
    FieldIdentifier,
    ShorthandFieldIdentifier,
    PrimitiveType,
    Metavariable,
    FragmentSpecifier,
    Shebang,
    IntegerToken,
    FloatToken,
    LiteralSuffix,

    // Composite literal tokens. These never appear in a tree; the parser
    // turns their pieces into the children of a literal node.
    StringToken,
    RawStringToken,
    CharToken,

    // Literal pieces
    StringStart,
    StringEnd,
    StringContent,
    EscapeSequence,
    RawStringStart,
    RawStringEnd,
    CharStart,
    CharEnd,
    CharContent,
    RadixPrefix,
    Digits,
    DecimalPoint,
    Exponent,

    // ========================================================================
    // Nodes
    // ========================================================================
    SourceFile,
    Error,
    LineComment,
    BlockComment,

    // Items and declarations
    AttributeItem,
    InnerAttributeItem,
    Attribute,
    VisibilityModifier,
    ModItem,
    ForeignModItem,
    ExternCrateDeclaration,
    UseDeclaration,
    ScopedUseList,
    UseList,
    UseAsClause,
    UseWildcard,
    FunctionItem,
    FunctionSignatureItem,
    FunctionModifiers,
    ExternModifier,
    Parameters,
    Parameter,
    SelfParameter,
    VariadicParameter,
    StructItem,
    UnionItem,
    EnumItem,
    EnumVariantList,
    EnumVariant,
    FieldDeclarationList,
    FieldDeclaration,
    OrderedFieldDeclarationList,
    TraitItem,
    ImplItem,
    DeclarationList,
    AssociatedType,
    TypeItem,
    ConstItem,
    StaticItem,

    // Generics
    TypeParameters,
    TypeParameter,
    LifetimeParameter,
    ConstParameter,
    WhereClause,
    WherePredicate,
    TraitBounds,
    HigherRankedTraitBound,
    RemovedTraitBound,
    ForLifetimes,

    // Macros
    MacroDefinition,
    MacroRule,
    MacroInvocation,
    TokenTree,
    TokenRepetition,
    TokenTreePattern,
    TokenRepetitionPattern,
    TokenBindingPattern,

    // Statements
    LetDeclaration,
    ExpressionStatement,
    EmptyStatement,
    Block,
    Label,
    Lifetime,

    // Types
    ScopedTypeIdentifier,
    GenericType,
    TypeArguments,
    TypeBinding,
    ReferenceType,
    PointerType,
    TupleType,
    UnitType,
    ArrayType,
    FunctionType,
    NeverType,
    AbstractType,
    DynamicType,
    BoundedType,
    QualifiedType,
    BracketedType,

    // Expressions
    UnaryExpression,
    ReferenceExpression,
    TryExpression,
    BinaryExpression,
    AssignmentExpression,
    CompoundAssignmentExpr,
    TypeCastExpression,
    RangeExpression,
    CallExpression,
    Arguments,
    FieldExpression,
    IndexExpression,
    AwaitExpression,
    GenericFunction,
    ScopedIdentifier,
    ParenthesizedExpression,
    TupleExpression,
    UnitExpression,
    ArrayExpression,
    StructExpression,
    FieldInitializerList,
    FieldInitializer,
    ShorthandFieldInitializer,
    BaseFieldInitializer,
    IfExpression,
    ElseClause,
    LetCondition,
    LetChain,
    MatchExpression,
    MatchBlock,
    MatchArm,
    MatchPattern,
    WhileExpression,
    LoopExpression,
    ForExpression,
    ClosureExpression,
    ClosureParameters,
    ReturnExpression,
    BreakExpression,
    ContinueExpression,
    YieldExpression,
    UnsafeBlock,
    AsyncBlock,
    ConstBlock,

    // Literals
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    RawStringLiteral,
    CharLiteral,
    BooleanLiteral,
    NegativeLiteral,

    // Patterns
    TuplePattern,
    TupleStructPattern,
    StructPattern,
    FieldPattern,
    RemainingFieldPattern,
    RestPattern,
    SlicePattern,
    RefPattern,
    MutPattern,
    ReferencePattern,
    CapturedPattern,
    OrPattern,
    RangePattern,
}

// Marker constants for SyntaxKind ranges.
impl SyntaxKind {
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenParen;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::ShrEq;
    pub const FIRST_COMPOUND_ASSIGNMENT: SyntaxKind = SyntaxKind::PlusEq;
    pub const LAST_COMPOUND_ASSIGNMENT: SyntaxKind = SyntaxKind::ShrEq;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::AsKw;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::UnionKw;
    pub const FIRST_RESERVED_WORD: SyntaxKind = SyntaxKind::AsKw;
    pub const LAST_RESERVED_WORD: SyntaxKind = SyntaxKind::YieldKw;
    pub const FIRST_NODE: SyntaxKind = SyntaxKind::SourceFile;
    pub const FIRST_TYPE_NODE: SyntaxKind = SyntaxKind::ScopedTypeIdentifier;
    pub const LAST_TYPE_NODE: SyntaxKind = SyntaxKind::BracketedType;
    pub const FIRST_LITERAL_NODE: SyntaxKind = SyntaxKind::IntegerLiteral;
    pub const LAST_LITERAL_NODE: SyntaxKind = SyntaxKind::NegativeLiteral;
    pub const FIRST_PATTERN_NODE: SyntaxKind = SyntaxKind::TuplePattern;
    pub const LAST_PATTERN_NODE: SyntaxKind = SyntaxKind::RangePattern;
}

impl SyntaxKind {
    #[inline]
    fn in_range(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        let v = self as u16;
        v >= first as u16 && v <= last as u16
    }

    /// Whether this kind is a token (terminal) rather than a node.
    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) < SyntaxKind::FIRST_NODE as u16
    }

    /// Whether this kind is a keyword, reserved or contextual.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self.in_range(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    /// Whether this kind is a reserved keyword the scanner produces directly.
    #[inline]
    pub fn is_reserved_word(self) -> bool {
        self.in_range(Self::FIRST_RESERVED_WORD, Self::LAST_RESERVED_WORD)
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.in_range(Self::FIRST_PUNCTUATION, Self::LAST_PUNCTUATION)
    }

    #[inline]
    pub fn is_compound_assignment(self) -> bool {
        self.in_range(Self::FIRST_COMPOUND_ASSIGNMENT, Self::LAST_COMPOUND_ASSIGNMENT)
    }

    /// Whether this kind is a composite literal token with pieces.
    #[inline]
    pub fn is_composite_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringToken | SyntaxKind::RawStringToken | SyntaxKind::CharToken
        )
    }

    /// Whether this kind is a comment node.
    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::LineComment | SyntaxKind::BlockComment)
    }

    /// Whether this kind opens a delimited group.
    #[inline]
    pub fn is_open_delimiter(self) -> bool {
        matches!(
            self,
            SyntaxKind::OpenParen | SyntaxKind::OpenBracket | SyntaxKind::OpenBrace
        )
    }

    /// Whether this kind closes a delimited group.
    #[inline]
    pub fn is_close_delimiter(self) -> bool {
        matches!(
            self,
            SyntaxKind::CloseParen | SyntaxKind::CloseBracket | SyntaxKind::CloseBrace
        )
    }

    /// The closing delimiter matching an opening one.
    pub fn matching_close(self) -> Option<SyntaxKind> {
        match self {
            SyntaxKind::OpenParen => Some(SyntaxKind::CloseParen),
            SyntaxKind::OpenBracket => Some(SyntaxKind::CloseBracket),
            SyntaxKind::OpenBrace => Some(SyntaxKind::CloseBrace),
            _ => None,
        }
    }

    /// Whether nodes or leaves of this kind are "named" in the tree.
    ///
    /// Punctuation, keywords and literal delimiters are anonymous: they are
    /// kept in the tree but skipped by `named_children` and printed only by
    /// the verbose S-expression form.
    pub fn is_named(self) -> bool {
        if !self.is_token() {
            return true;
        }
        matches!(
            self,
            SyntaxKind::Identifier
                | SyntaxKind::TypeIdentifier
                | SyntaxKind::FieldIdentifier
                | SyntaxKind::ShorthandFieldIdentifier
                | SyntaxKind::PrimitiveType
                | SyntaxKind::Metavariable
                | SyntaxKind::FragmentSpecifier
                | SyntaxKind::Shebang
                | SyntaxKind::LiteralSuffix
                | SyntaxKind::StringContent
                | SyntaxKind::EscapeSequence
                | SyntaxKind::DocComment
                | SyntaxKind::OuterDocCommentMarker
                | SyntaxKind::InnerDocCommentMarker
                | SyntaxKind::MutKw
                | SyntaxKind::SelfKw
                | SyntaxKind::CrateKw
                | SyntaxKind::SuperKw
                | SyntaxKind::ErrorSentinel
        )
    }

    /// The name this kind carries in a tree: the grammar name for named
    /// kinds, the source text for anonymous tokens.
    pub fn name(self) -> &'static str {
        if let Some(text) = self.keyword_text().or_else(|| self.punctuation_text()) {
            return match self {
                SyntaxKind::MutKw => "mutable_specifier",
                _ => text,
            };
        }
        match self {
            SyntaxKind::Unknown => "unknown",
            SyntaxKind::EndOfFile => "end",
            SyntaxKind::ErrorSentinel => "error_sentinel",
            SyntaxKind::LineCommentStart => "//",
            SyntaxKind::BlockCommentStart => "/*",
            SyntaxKind::BlockCommentEnd => "*/",
            SyntaxKind::OuterDocCommentMarker => "outer_doc_comment_marker",
            SyntaxKind::InnerDocCommentMarker => "inner_doc_comment_marker",
            SyntaxKind::DocComment => "doc_comment",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::TypeIdentifier => "type_identifier",
            SyntaxKind::FieldIdentifier => "field_identifier",
            SyntaxKind::ShorthandFieldIdentifier => "shorthand_field_identifier",
            SyntaxKind::PrimitiveType => "primitive_type",
            SyntaxKind::Metavariable => "metavariable",
            SyntaxKind::FragmentSpecifier => "fragment_specifier",
            SyntaxKind::Shebang => "shebang",
            SyntaxKind::IntegerToken => "integer",
            SyntaxKind::FloatToken => "float",
            SyntaxKind::LiteralSuffix => "literal_suffix",
            SyntaxKind::StringToken => "string",
            SyntaxKind::RawStringToken => "raw_string",
            SyntaxKind::CharToken => "char",
            SyntaxKind::StringStart | SyntaxKind::StringEnd => "\"",
            SyntaxKind::StringContent => "string_content",
            SyntaxKind::EscapeSequence => "escape_sequence",
            SyntaxKind::RawStringStart => "raw_string_start",
            SyntaxKind::RawStringEnd => "raw_string_end",
            SyntaxKind::CharStart | SyntaxKind::CharEnd => "'",
            SyntaxKind::CharContent => "char_content",
            SyntaxKind::RadixPrefix => "radix_prefix",
            SyntaxKind::Digits => "digits",
            SyntaxKind::DecimalPoint => "decimal_point",
            SyntaxKind::Exponent => "exponent",

            SyntaxKind::SourceFile => "source_file",
            SyntaxKind::Error => "ERROR",
            SyntaxKind::LineComment => "line_comment",
            SyntaxKind::BlockComment => "block_comment",
            SyntaxKind::AttributeItem => "attribute_item",
            SyntaxKind::InnerAttributeItem => "inner_attribute_item",
            SyntaxKind::Attribute => "attribute",
            SyntaxKind::VisibilityModifier => "visibility_modifier",
            SyntaxKind::ModItem => "mod_item",
            SyntaxKind::ForeignModItem => "foreign_mod_item",
            SyntaxKind::ExternCrateDeclaration => "extern_crate_declaration",
            SyntaxKind::UseDeclaration => "use_declaration",
            SyntaxKind::ScopedUseList => "scoped_use_list",
            SyntaxKind::UseList => "use_list",
            SyntaxKind::UseAsClause => "use_as_clause",
            SyntaxKind::UseWildcard => "use_wildcard",
            SyntaxKind::FunctionItem => "function_item",
            SyntaxKind::FunctionSignatureItem => "function_signature_item",
            SyntaxKind::FunctionModifiers => "function_modifiers",
            SyntaxKind::ExternModifier => "extern_modifier",
            SyntaxKind::Parameters => "parameters",
            SyntaxKind::Parameter => "parameter",
            SyntaxKind::SelfParameter => "self_parameter",
            SyntaxKind::VariadicParameter => "variadic_parameter",
            SyntaxKind::StructItem => "struct_item",
            SyntaxKind::UnionItem => "union_item",
            SyntaxKind::EnumItem => "enum_item",
            SyntaxKind::EnumVariantList => "enum_variant_list",
            SyntaxKind::EnumVariant => "enum_variant",
            SyntaxKind::FieldDeclarationList => "field_declaration_list",
            SyntaxKind::FieldDeclaration => "field_declaration",
            SyntaxKind::OrderedFieldDeclarationList => "ordered_field_declaration_list",
            SyntaxKind::TraitItem => "trait_item",
            SyntaxKind::ImplItem => "impl_item",
            SyntaxKind::DeclarationList => "declaration_list",
            SyntaxKind::AssociatedType => "associated_type",
            SyntaxKind::TypeItem => "type_item",
            SyntaxKind::ConstItem => "const_item",
            SyntaxKind::StaticItem => "static_item",
            SyntaxKind::TypeParameters => "type_parameters",
            SyntaxKind::TypeParameter => "type_parameter",
            SyntaxKind::LifetimeParameter => "lifetime_parameter",
            SyntaxKind::ConstParameter => "const_parameter",
            SyntaxKind::WhereClause => "where_clause",
            SyntaxKind::WherePredicate => "where_predicate",
            SyntaxKind::TraitBounds => "trait_bounds",
            SyntaxKind::HigherRankedTraitBound => "higher_ranked_trait_bound",
            SyntaxKind::RemovedTraitBound => "removed_trait_bound",
            SyntaxKind::ForLifetimes => "for_lifetimes",
            SyntaxKind::MacroDefinition => "macro_definition",
            SyntaxKind::MacroRule => "macro_rule",
            SyntaxKind::MacroInvocation => "macro_invocation",
            SyntaxKind::TokenTree => "token_tree",
            SyntaxKind::TokenRepetition => "token_repetition",
            SyntaxKind::TokenTreePattern => "token_tree_pattern",
            SyntaxKind::TokenRepetitionPattern => "token_repetition_pattern",
            SyntaxKind::TokenBindingPattern => "token_binding_pattern",
            SyntaxKind::LetDeclaration => "let_declaration",
            SyntaxKind::ExpressionStatement => "expression_statement",
            SyntaxKind::EmptyStatement => "empty_statement",
            SyntaxKind::Block => "block",
            SyntaxKind::Label => "label",
            SyntaxKind::Lifetime => "lifetime",
            SyntaxKind::ScopedTypeIdentifier => "scoped_type_identifier",
            SyntaxKind::GenericType => "generic_type",
            SyntaxKind::TypeArguments => "type_arguments",
            SyntaxKind::TypeBinding => "type_binding",
            SyntaxKind::ReferenceType => "reference_type",
            SyntaxKind::PointerType => "pointer_type",
            SyntaxKind::TupleType => "tuple_type",
            SyntaxKind::UnitType => "unit_type",
            SyntaxKind::ArrayType => "array_type",
            SyntaxKind::FunctionType => "function_type",
            SyntaxKind::NeverType => "never_type",
            SyntaxKind::AbstractType => "abstract_type",
            SyntaxKind::DynamicType => "dynamic_type",
            SyntaxKind::BoundedType => "bounded_type",
            SyntaxKind::QualifiedType => "qualified_type",
            SyntaxKind::BracketedType => "bracketed_type",
            SyntaxKind::UnaryExpression => "unary_expression",
            SyntaxKind::ReferenceExpression => "reference_expression",
            SyntaxKind::TryExpression => "try_expression",
            SyntaxKind::BinaryExpression => "binary_expression",
            SyntaxKind::AssignmentExpression => "assignment_expression",
            SyntaxKind::CompoundAssignmentExpr => "compound_assignment_expr",
            SyntaxKind::TypeCastExpression => "type_cast_expression",
            SyntaxKind::RangeExpression => "range_expression",
            SyntaxKind::CallExpression => "call_expression",
            SyntaxKind::Arguments => "arguments",
            SyntaxKind::FieldExpression => "field_expression",
            SyntaxKind::IndexExpression => "index_expression",
            SyntaxKind::AwaitExpression => "await_expression",
            SyntaxKind::GenericFunction => "generic_function",
            SyntaxKind::ScopedIdentifier => "scoped_identifier",
            SyntaxKind::ParenthesizedExpression => "parenthesized_expression",
            SyntaxKind::TupleExpression => "tuple_expression",
            SyntaxKind::UnitExpression => "unit_expression",
            SyntaxKind::ArrayExpression => "array_expression",
            SyntaxKind::StructExpression => "struct_expression",
            SyntaxKind::FieldInitializerList => "field_initializer_list",
            SyntaxKind::FieldInitializer => "field_initializer",
            SyntaxKind::ShorthandFieldInitializer => "shorthand_field_initializer",
            SyntaxKind::BaseFieldInitializer => "base_field_initializer",
            SyntaxKind::IfExpression => "if_expression",
            SyntaxKind::ElseClause => "else_clause",
            SyntaxKind::LetCondition => "let_condition",
            SyntaxKind::LetChain => "let_chain",
            SyntaxKind::MatchExpression => "match_expression",
            SyntaxKind::MatchBlock => "match_block",
            SyntaxKind::MatchArm => "match_arm",
            SyntaxKind::MatchPattern => "match_pattern",
            SyntaxKind::WhileExpression => "while_expression",
            SyntaxKind::LoopExpression => "loop_expression",
            SyntaxKind::ForExpression => "for_expression",
            SyntaxKind::ClosureExpression => "closure_expression",
            SyntaxKind::ClosureParameters => "closure_parameters",
            SyntaxKind::ReturnExpression => "return_expression",
            SyntaxKind::BreakExpression => "break_expression",
            SyntaxKind::ContinueExpression => "continue_expression",
            SyntaxKind::YieldExpression => "yield_expression",
            SyntaxKind::UnsafeBlock => "unsafe_block",
            SyntaxKind::AsyncBlock => "async_block",
            SyntaxKind::ConstBlock => "const_block",
            SyntaxKind::IntegerLiteral => "integer_literal",
            SyntaxKind::FloatLiteral => "float_literal",
            SyntaxKind::StringLiteral => "string_literal",
            SyntaxKind::RawStringLiteral => "raw_string_literal",
            SyntaxKind::CharLiteral => "char_literal",
            SyntaxKind::BooleanLiteral => "boolean_literal",
            SyntaxKind::NegativeLiteral => "negative_literal",
            SyntaxKind::TuplePattern => "tuple_pattern",
            SyntaxKind::TupleStructPattern => "tuple_struct_pattern",
            SyntaxKind::StructPattern => "struct_pattern",
            SyntaxKind::FieldPattern => "field_pattern",
            SyntaxKind::RemainingFieldPattern => "remaining_field_pattern",
            SyntaxKind::RestPattern => "rest_pattern",
            SyntaxKind::SlicePattern => "slice_pattern",
            SyntaxKind::RefPattern => "ref_pattern",
            SyntaxKind::MutPattern => "mut_pattern",
            SyntaxKind::ReferencePattern => "reference_pattern",
            SyntaxKind::CapturedPattern => "captured_pattern",
            SyntaxKind::OrPattern => "or_pattern",
            SyntaxKind::RangePattern => "range_pattern",
            _ => "unknown",
        }
    }

    /// Get the keyword text for a keyword kind, or None if not a keyword.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::AsKw => Some("as"),
            SyntaxKind::AsyncKw => Some("async"),
            SyntaxKind::AwaitKw => Some("await"),
            SyntaxKind::BreakKw => Some("break"),
            SyntaxKind::ConstKw => Some("const"),
            SyntaxKind::ContinueKw => Some("continue"),
            SyntaxKind::CrateKw => Some("crate"),
            SyntaxKind::DynKw => Some("dyn"),
            SyntaxKind::ElseKw => Some("else"),
            SyntaxKind::EnumKw => Some("enum"),
            SyntaxKind::ExternKw => Some("extern"),
            SyntaxKind::FalseKw => Some("false"),
            SyntaxKind::FnKw => Some("fn"),
            SyntaxKind::ForKw => Some("for"),
            SyntaxKind::IfKw => Some("if"),
            SyntaxKind::ImplKw => Some("impl"),
            SyntaxKind::InKw => Some("in"),
            SyntaxKind::LetKw => Some("let"),
            SyntaxKind::LoopKw => Some("loop"),
            SyntaxKind::MatchKw => Some("match"),
            SyntaxKind::ModKw => Some("mod"),
            SyntaxKind::MoveKw => Some("move"),
            SyntaxKind::MutKw => Some("mut"),
            SyntaxKind::PubKw => Some("pub"),
            SyntaxKind::RefKw => Some("ref"),
            SyntaxKind::ReturnKw => Some("return"),
            SyntaxKind::SelfKw => Some("self"),
            SyntaxKind::SelfTypeKw => Some("Self"),
            SyntaxKind::StaticKw => Some("static"),
            SyntaxKind::StructKw => Some("struct"),
            SyntaxKind::SuperKw => Some("super"),
            SyntaxKind::TraitKw => Some("trait"),
            SyntaxKind::TrueKw => Some("true"),
            SyntaxKind::TypeKw => Some("type"),
            SyntaxKind::UnsafeKw => Some("unsafe"),
            SyntaxKind::UseKw => Some("use"),
            SyntaxKind::WhereKw => Some("where"),
            SyntaxKind::WhileKw => Some("while"),
            SyntaxKind::YieldKw => Some("yield"),
            SyntaxKind::AutoKw => Some("auto"),
            SyntaxKind::DefaultKw => Some("default"),
            SyntaxKind::MacroRulesKw => Some("macro_rules"),
            SyntaxKind::RawKw => Some("raw"),
            SyntaxKind::UnionKw => Some("union"),
            _ => None,
        }
    }

    /// Look up a reserved keyword from text.
    ///
    /// Contextual keywords are not returned; they scan as identifiers.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "as" => Some(SyntaxKind::AsKw),
            "async" => Some(SyntaxKind::AsyncKw),
            "await" => Some(SyntaxKind::AwaitKw),
            "break" => Some(SyntaxKind::BreakKw),
            "const" => Some(SyntaxKind::ConstKw),
            "continue" => Some(SyntaxKind::ContinueKw),
            "crate" => Some(SyntaxKind::CrateKw),
            "dyn" => Some(SyntaxKind::DynKw),
            "else" => Some(SyntaxKind::ElseKw),
            "enum" => Some(SyntaxKind::EnumKw),
            "extern" => Some(SyntaxKind::ExternKw),
            "false" => Some(SyntaxKind::FalseKw),
            "fn" => Some(SyntaxKind::FnKw),
            "for" => Some(SyntaxKind::ForKw),
            "if" => Some(SyntaxKind::IfKw),
            "impl" => Some(SyntaxKind::ImplKw),
            "in" => Some(SyntaxKind::InKw),
            "let" => Some(SyntaxKind::LetKw),
            "loop" => Some(SyntaxKind::LoopKw),
            "match" => Some(SyntaxKind::MatchKw),
            "mod" => Some(SyntaxKind::ModKw),
            "move" => Some(SyntaxKind::MoveKw),
            "mut" => Some(SyntaxKind::MutKw),
            "pub" => Some(SyntaxKind::PubKw),
            "ref" => Some(SyntaxKind::RefKw),
            "return" => Some(SyntaxKind::ReturnKw),
            "self" => Some(SyntaxKind::SelfKw),
            "Self" => Some(SyntaxKind::SelfTypeKw),
            "static" => Some(SyntaxKind::StaticKw),
            "struct" => Some(SyntaxKind::StructKw),
            "super" => Some(SyntaxKind::SuperKw),
            "trait" => Some(SyntaxKind::TraitKw),
            "true" => Some(SyntaxKind::TrueKw),
            "type" => Some(SyntaxKind::TypeKw),
            "unsafe" => Some(SyntaxKind::UnsafeKw),
            "use" => Some(SyntaxKind::UseKw),
            "where" => Some(SyntaxKind::WhereKw),
            "while" => Some(SyntaxKind::WhileKw),
            "yield" => Some(SyntaxKind::YieldKw),
            _ => None,
        }
    }

    /// Look up a contextual keyword from identifier text.
    pub fn from_contextual_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "auto" => Some(SyntaxKind::AutoKw),
            "default" => Some(SyntaxKind::DefaultKw),
            "macro_rules" => Some(SyntaxKind::MacroRulesKw),
            "raw" => Some(SyntaxKind::RawKw),
            "union" => Some(SyntaxKind::UnionKw),
            _ => None,
        }
    }

    /// Get the punctuation text for a punctuation kind, or None.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::OpenParen => Some("("),
            SyntaxKind::CloseParen => Some(")"),
            SyntaxKind::OpenBracket => Some("["),
            SyntaxKind::CloseBracket => Some("]"),
            SyntaxKind::OpenBrace => Some("{"),
            SyntaxKind::CloseBrace => Some("}"),
            SyntaxKind::Comma => Some(","),
            SyntaxKind::Semicolon => Some(";"),
            SyntaxKind::Colon => Some(":"),
            SyntaxKind::ColonColon => Some("::"),
            SyntaxKind::Dot => Some("."),
            SyntaxKind::DotDot => Some(".."),
            SyntaxKind::DotDotDot => Some("..."),
            SyntaxKind::DotDotEq => Some("..="),
            SyntaxKind::Pound => Some("#"),
            SyntaxKind::Dollar => Some("$"),
            SyntaxKind::Question => Some("?"),
            SyntaxKind::At => Some("@"),
            SyntaxKind::Arrow => Some("->"),
            SyntaxKind::FatArrow => Some("=>"),
            SyntaxKind::Quote => Some("'"),
            SyntaxKind::Underscore => Some("_"),
            SyntaxKind::Tilde => Some("~"),
            SyntaxKind::Bang => Some("!"),
            SyntaxKind::Eq => Some("="),
            SyntaxKind::EqEq => Some("=="),
            SyntaxKind::BangEq => Some("!="),
            SyntaxKind::Lt => Some("<"),
            SyntaxKind::LtEq => Some("<="),
            SyntaxKind::Gt => Some(">"),
            SyntaxKind::GtEq => Some(">="),
            SyntaxKind::Plus => Some("+"),
            SyntaxKind::Minus => Some("-"),
            SyntaxKind::Star => Some("*"),
            SyntaxKind::Slash => Some("/"),
            SyntaxKind::Percent => Some("%"),
            SyntaxKind::Caret => Some("^"),
            SyntaxKind::Amp => Some("&"),
            SyntaxKind::Pipe => Some("|"),
            SyntaxKind::AmpAmp => Some("&&"),
            SyntaxKind::PipePipe => Some("||"),
            SyntaxKind::Shl => Some("<<"),
            SyntaxKind::Shr => Some(">>"),
            SyntaxKind::PlusEq => Some("+="),
            SyntaxKind::MinusEq => Some("-="),
            SyntaxKind::StarEq => Some("*="),
            SyntaxKind::SlashEq => Some("/="),
            SyntaxKind::PercentEq => Some("%="),
            SyntaxKind::CaretEq => Some("^="),
            SyntaxKind::AmpEq => Some("&="),
            SyntaxKind::PipeEq => Some("|="),
            SyntaxKind::ShlEq => Some("<<="),
            SyntaxKind::ShrEq => Some(">>="),
            _ => None,
        }
    }

    /// Whether `text` names one of the built-in primitive types.
    pub fn is_primitive_type_name(text: &str) -> bool {
        matches!(
            text,
            "u8" | "i8"
                | "u16"
                | "i16"
                | "u32"
                | "i32"
                | "u64"
                | "i64"
                | "u128"
                | "i128"
                | "isize"
                | "usize"
                | "f32"
                | "f64"
                | "bool"
                | "str"
                | "char"
        )
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for word in ["fn", "let", "match", "Self", "self", "where", "yield"] {
            let kind = SyntaxKind::from_keyword(word).unwrap();
            assert_eq!(kind.keyword_text(), Some(word));
            assert!(kind.is_reserved_word());
        }
        assert_eq!(SyntaxKind::from_keyword("union"), None);
        assert_eq!(SyntaxKind::from_contextual_keyword("union"), Some(SyntaxKind::UnionKw));
    }

    #[test]
    fn test_names() {
        assert_eq!(SyntaxKind::FunctionItem.name(), "function_item");
        assert_eq!(SyntaxKind::Error.name(), "ERROR");
        assert_eq!(SyntaxKind::MutKw.name(), "mutable_specifier");
        assert_eq!(SyntaxKind::ShlEq.name(), "<<=");
        assert_eq!(SyntaxKind::FnKw.name(), "fn");
    }

    #[test]
    fn test_named_and_token_ranges() {
        assert!(SyntaxKind::Identifier.is_named());
        assert!(!SyntaxKind::Comma.is_named());
        assert!(!SyntaxKind::FnKw.is_named());
        assert!(SyntaxKind::SelfKw.is_named());
        assert!(SyntaxKind::Block.is_named());
        assert!(SyntaxKind::Semicolon.is_token());
        assert!(!SyntaxKind::SourceFile.is_token());
        assert!(SyntaxKind::StarEq.is_compound_assignment());
        assert!(!SyntaxKind::Eq.is_compound_assignment());
    }

    #[test]
    fn test_matching_close() {
        assert_eq!(SyntaxKind::OpenBrace.matching_close(), Some(SyntaxKind::CloseBrace));
        assert_eq!(SyntaxKind::Lt.matching_close(), None);
    }
}
