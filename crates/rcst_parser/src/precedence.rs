//! Operator precedence for binary, prefix and postfix operators.
//!
//! The whole table lives in `PRECEDENCE_TABLE`; the expression parser only
//! asks it questions and never hardcodes a level.

use rcst_syntax::SyntaxKind;

/// Operator precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum OperatorPrecedence {
    /// A closure body extends as far as possible.
    Closure = 0,
    Assignment = 1,
    Range = 2,
    LogicalOr = 3,
    LogicalAnd = 4,
    Comparison = 5,
    BitwiseOr = 6,
    BitwiseXor = 7,
    BitwiseAnd = 8,
    Shift = 9,
    Additive = 10,
    Multiplicative = 11,
    Cast = 12,
    Unary = 13,
    Try = 14,
    Field = 15,
    Call = 16,
}

impl OperatorPrecedence {
    /// The level just above this one, used for the right operand of a
    /// left-associative operator.
    pub fn next(self) -> OperatorPrecedence {
        PRECEDENCE_TABLE
            .iter()
            .map(|e| e.precedence)
            .filter(|&p| p > self)
            .min()
            .unwrap_or(OperatorPrecedence::Call)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    /// `a..b..c` is not an expression.
    None,
}

/// Classes of operators that share a precedence entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperatorClass {
    Call,
    Index,
    MethodCall,
    Field,
    Try,
    Unary,
    Reference,
    Cast,
    Multiplicative,
    Additive,
    Shift,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    Comparison,
    LogicalAnd,
    LogicalOr,
    Range,
    Assignment,
    CompoundAssignment,
    Closure,
}

/// One row of the precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceEntry {
    pub class: OperatorClass,
    pub precedence: OperatorPrecedence,
    pub assoc: Associativity,
}

const fn entry(
    class: OperatorClass,
    precedence: OperatorPrecedence,
    assoc: Associativity,
) -> PrecedenceEntry {
    PrecedenceEntry {
        class,
        precedence,
        assoc,
    }
}

/// The precedence table, indexed by `OperatorClass`.
pub static PRECEDENCE_TABLE: [PrecedenceEntry; 21] = {
    use Associativity::*;
    use OperatorClass as C;
    use OperatorPrecedence as P;
    [
        entry(C::Call, P::Call, Left),
        entry(C::Index, P::Call, Left),
        entry(C::MethodCall, P::Call, Left),
        entry(C::Field, P::Field, Left),
        entry(C::Try, P::Try, Left),
        entry(C::Unary, P::Unary, Right),
        entry(C::Reference, P::Unary, Right),
        entry(C::Cast, P::Cast, Left),
        entry(C::Multiplicative, P::Multiplicative, Left),
        entry(C::Additive, P::Additive, Left),
        entry(C::Shift, P::Shift, Left),
        entry(C::BitwiseAnd, P::BitwiseAnd, Left),
        entry(C::BitwiseXor, P::BitwiseXor, Left),
        entry(C::BitwiseOr, P::BitwiseOr, Left),
        entry(C::Comparison, P::Comparison, Left),
        entry(C::LogicalAnd, P::LogicalAnd, Left),
        entry(C::LogicalOr, P::LogicalOr, Left),
        entry(C::Range, P::Range, None),
        entry(C::Assignment, P::Assignment, Right),
        entry(C::CompoundAssignment, P::Assignment, Right),
        entry(C::Closure, P::Closure, Right),
    ]
};

impl OperatorClass {
    #[inline]
    pub fn entry(self) -> &'static PrecedenceEntry {
        &PRECEDENCE_TABLE[self as usize]
    }

    #[inline]
    pub fn precedence(self) -> OperatorPrecedence {
        self.entry().precedence
    }

    #[inline]
    pub fn assoc(self) -> Associativity {
        self.entry().assoc
    }

    /// The node kind an infix operator of this class builds.
    pub fn node_kind(self) -> SyntaxKind {
        match self {
            OperatorClass::Cast => SyntaxKind::TypeCastExpression,
            OperatorClass::Range => SyntaxKind::RangeExpression,
            OperatorClass::Assignment => SyntaxKind::AssignmentExpression,
            OperatorClass::CompoundAssignment => SyntaxKind::CompoundAssignmentExpr,
            _ => SyntaxKind::BinaryExpression,
        }
    }
}

/// The infix operator class of a token, if it is one.
///
/// `>` arrives unmerged from the scanner; callers rescan it first so that
/// `>>`, `>=` and `>>=` are seen here.
pub fn infix_operator(kind: SyntaxKind) -> Option<OperatorClass> {
    use SyntaxKind::*;
    let class = match kind {
        Star | Slash | Percent => OperatorClass::Multiplicative,
        Plus | Minus => OperatorClass::Additive,
        Shl | Shr => OperatorClass::Shift,
        Amp => OperatorClass::BitwiseAnd,
        Caret => OperatorClass::BitwiseXor,
        Pipe => OperatorClass::BitwiseOr,
        EqEq | BangEq | Lt | LtEq | Gt | GtEq => OperatorClass::Comparison,
        AmpAmp => OperatorClass::LogicalAnd,
        PipePipe => OperatorClass::LogicalOr,
        DotDot | DotDotEq => OperatorClass::Range,
        Eq => OperatorClass::Assignment,
        AsKw => OperatorClass::Cast,
        _ if kind.is_compound_assignment() => OperatorClass::CompoundAssignment,
        _ => return Option::None,
    };
    Some(class)
}

/// The postfix operator class of a token, if it is one.
pub fn postfix_operator(kind: SyntaxKind) -> Option<OperatorClass> {
    match kind {
        SyntaxKind::OpenParen => Some(OperatorClass::Call),
        SyntaxKind::OpenBracket => Some(OperatorClass::Index),
        SyntaxKind::Dot => Some(OperatorClass::Field),
        SyntaxKind::Question => Some(OperatorClass::Try),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_class() {
        for (i, entry) in PRECEDENCE_TABLE.iter().enumerate() {
            assert_eq!(entry.class as usize, i);
        }
    }

    #[test]
    fn test_documented_order() {
        use OperatorClass::*;
        let order = [
            Call, Field, Try, Unary, Cast, Multiplicative, Additive, Shift, BitwiseAnd,
            BitwiseXor, BitwiseOr, Comparison, LogicalAnd, LogicalOr, Range, Assignment, Closure,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].precedence() > pair[1].precedence(), "{:?}", pair);
        }
        assert_eq!(Index.precedence(), Call.precedence());
        assert_eq!(CompoundAssignment.precedence(), Assignment.precedence());
    }

    #[test]
    fn test_associativity() {
        assert_eq!(OperatorClass::Assignment.assoc(), Associativity::Right);
        assert_eq!(OperatorClass::CompoundAssignment.assoc(), Associativity::Right);
        assert_eq!(OperatorClass::Additive.assoc(), Associativity::Left);
        assert_eq!(OperatorClass::Range.assoc(), Associativity::None);
    }

    #[test]
    fn test_infix_lookup() {
        assert_eq!(infix_operator(SyntaxKind::Star), Some(OperatorClass::Multiplicative));
        assert_eq!(infix_operator(SyntaxKind::ShrEq), Some(OperatorClass::CompoundAssignment));
        assert_eq!(infix_operator(SyntaxKind::AsKw), Some(OperatorClass::Cast));
        assert_eq!(infix_operator(SyntaxKind::Question), None);
        assert_eq!(postfix_operator(SyntaxKind::Question), Some(OperatorClass::Try));
    }

    #[test]
    fn test_next_level() {
        assert_eq!(OperatorPrecedence::Additive.next(), OperatorPrecedence::Multiplicative);
        assert_eq!(OperatorPrecedence::Call.next(), OperatorPrecedence::Call);
    }
}
