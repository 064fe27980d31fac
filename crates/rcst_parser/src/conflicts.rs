//! Locally ambiguous grammar positions and how each is resolved.
//!
//! The grammar engine never backtracks outside of this list. Each entry
//! names the node kinds that compete at the position and a fixed strategy;
//! speculative strategies are bounded by the production being tried.

use rcst_syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ConflictId {
    /// `fn f(u32)` versus `fn f(x: u32)`.
    TypeVsPattern,
    /// `()` in type position versus pattern position.
    UnitTypeVsUnitPattern,
    /// `a::b` as a value path or a type path.
    ScopedValueVsScopedType,
    /// Closure parameters versus a tuple pattern.
    ParameterListVsTuplePattern,
    /// `for<'a>` binder versus `for` followed by generic parameters.
    GenericParamsVsForLifetimes,
    /// `[x; n]` versus `[x, y]`.
    ArrayExpression,
    /// `pub(crate)` versus `pub` followed by a parenthesized type.
    VisibilityModifier,
    /// `if x {}`: a struct literal `x {}` or a condition and a block.
    StructLiteralVsBlock,
    /// `a < b` versus `a::<b>`.
    GenericArgsVsLessThan,
}

/// How a conflict is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Try the candidates speculatively in order; the first one that parses
    /// without errors wins.
    PreferInOrder,
    /// The enclosing production decides; the text is never inspected.
    ByPosition,
    /// Inspect at most this many tokens past the current one.
    Lookahead(u8),
    /// The position forbids one of the candidates outright.
    Restriction,
}

/// One entry of the conflict table.
#[derive(Debug, Clone, Copy)]
pub struct ConflictDecl {
    pub id: ConflictId,
    /// Competing node kinds in priority order.
    pub candidates: &'static [SyntaxKind],
    pub resolution: Resolution,
}

/// Every ambiguity the grammar engine knows about, indexed by `ConflictId`.
pub static CONFLICTS: [ConflictDecl; 9] = [
    ConflictDecl {
        id: ConflictId::TypeVsPattern,
        candidates: &[SyntaxKind::Parameter, SyntaxKind::Parameter],
        resolution: Resolution::PreferInOrder,
    },
    ConflictDecl {
        id: ConflictId::UnitTypeVsUnitPattern,
        candidates: &[SyntaxKind::UnitType, SyntaxKind::TuplePattern],
        resolution: Resolution::ByPosition,
    },
    ConflictDecl {
        id: ConflictId::ScopedValueVsScopedType,
        candidates: &[SyntaxKind::ScopedIdentifier, SyntaxKind::ScopedTypeIdentifier],
        resolution: Resolution::ByPosition,
    },
    ConflictDecl {
        id: ConflictId::ParameterListVsTuplePattern,
        candidates: &[SyntaxKind::Parameter, SyntaxKind::TuplePattern],
        resolution: Resolution::Lookahead(1),
    },
    ConflictDecl {
        id: ConflictId::GenericParamsVsForLifetimes,
        candidates: &[SyntaxKind::ForLifetimes, SyntaxKind::TypeParameters],
        resolution: Resolution::Lookahead(1),
    },
    ConflictDecl {
        id: ConflictId::ArrayExpression,
        candidates: &[SyntaxKind::ArrayExpression, SyntaxKind::ArrayExpression],
        resolution: Resolution::Lookahead(1),
    },
    ConflictDecl {
        id: ConflictId::VisibilityModifier,
        candidates: &[SyntaxKind::VisibilityModifier, SyntaxKind::TupleType],
        resolution: Resolution::Lookahead(2),
    },
    ConflictDecl {
        id: ConflictId::StructLiteralVsBlock,
        candidates: &[SyntaxKind::Block, SyntaxKind::StructExpression],
        resolution: Resolution::Restriction,
    },
    ConflictDecl {
        id: ConflictId::GenericArgsVsLessThan,
        candidates: &[SyntaxKind::BinaryExpression, SyntaxKind::GenericFunction],
        resolution: Resolution::ByPosition,
    },
];

impl ConflictId {
    #[inline]
    pub fn decl(self) -> &'static ConflictDecl {
        &CONFLICTS[self as usize]
    }

    pub fn resolution(self) -> Resolution {
        self.decl().resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for (i, decl) in CONFLICTS.iter().enumerate() {
            assert_eq!(decl.id as usize, i);
            assert!(decl.candidates.len() >= 2);
        }
    }

    #[test]
    fn test_speculative_entries_are_bounded() {
        let speculative: Vec<_> = CONFLICTS
            .iter()
            .filter(|d| d.resolution == Resolution::PreferInOrder)
            .map(|d| d.id)
            .collect();
        assert_eq!(speculative, vec![ConflictId::TypeVsPattern]);
        assert_eq!(ConflictId::ParameterListVsTuplePattern.resolution(), Resolution::Lookahead(1));
        assert_eq!(ConflictId::VisibilityModifier.resolution(), Resolution::Lookahead(2));
    }
}
