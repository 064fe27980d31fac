//! The macro sub-grammar.
//!
//! Macro bodies are token trees: any tokens, balanced over `()`, `[]` and
//! `{}`. Invocations and `macro_rules!` expansions use the plain tree;
//! rule patterns additionally recognize `$name:fragment` bindings. Both
//! recognize `$( ... ) sep? op` repetitions.

use rcst_diagnostics::messages;
use rcst_scanner::ScanSet;
use rcst_syntax::{FieldName, NodeBuilder, NodeFlags, SyntaxKind, SyntaxNode};

use crate::parser::Parser;

/// The node kinds one flavor of token tree builds.
#[derive(Debug)]
pub(crate) struct TreeGrammar {
    tree: SyntaxKind,
    repetition: SyntaxKind,
    /// Whether `$name:fragment` is a binding.
    bindings: bool,
}

/// Invocation arguments, attribute arguments and rule expansions.
pub(crate) static INVOCATION: TreeGrammar = TreeGrammar {
    tree: SyntaxKind::TokenTree,
    repetition: SyntaxKind::TokenRepetition,
    bindings: false,
};

/// The matcher side of a `macro_rules!` rule.
pub(crate) static PATTERN: TreeGrammar = TreeGrammar {
    tree: SyntaxKind::TokenTreePattern,
    repetition: SyntaxKind::TokenRepetitionPattern,
    bindings: true,
};

/// Fragment specifiers accepted after `$name:`.
pub const FRAGMENT_SPECIFIERS: &[&str] = &[
    "block",
    "expr",
    "expr_2021",
    "ident",
    "item",
    "lifetime",
    "literal",
    "meta",
    "pat",
    "pat_param",
    "path",
    "stmt",
    "tt",
    "ty",
    "vis",
];

impl<'a> Parser<'a> {
    /// Whether a path followed by `!` and a delimiter starts here.
    pub(crate) fn at_macro_invocation(&mut self) -> bool {
        use SyntaxKind::*;
        if !self.at_path_segment() && !self.at(ColonColon) {
            return false;
        }
        self.scanner.look_ahead(|s| loop {
            if s.kind() == ColonColon {
                s.scan(ScanSet::DEFAULT);
            }
            if !matches!(s.kind(), Identifier | SelfKw | SelfTypeKw | SuperKw | CrateKw | Metavariable) {
                return false;
            }
            s.scan(ScanSet::DEFAULT);
            match s.kind() {
                Bang => {
                    s.scan(ScanSet::DEFAULT);
                    return s.kind().is_open_delimiter();
                }
                ColonColon => continue,
                _ => return false,
            }
        })
    }

    /// `path!(...)`, with `path` already parsed and `!` current.
    pub(crate) fn parse_macro_invocation(&mut self, path: &'a SyntaxNode<'a>) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::MacroInvocation);
        b.push_field(FieldName::Macro, path);
        self.expect(&mut b, SyntaxKind::Bang);
        let tree = self.parse_token_tree(&mut b, &INVOCATION);
        b.push(tree);
        self.finish(b)
    }

    /// A delimited token tree. A closer that does not match is reported and
    /// left for the enclosing tree, which keeps the rest of the input
    /// balanced.
    pub(crate) fn parse_token_tree(
        &mut self,
        parent: &mut NodeBuilder<'a>,
        grammar: &'static TreeGrammar,
    ) -> &'a SyntaxNode<'a> {
        self.flush_trivia(parent);
        self.guarded(|p| p.parse_token_tree_inner(grammar))
    }

    fn parse_token_tree_inner(&mut self, grammar: &'static TreeGrammar) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(grammar.tree);
        let open = self.current();
        let Some(close) = open.matching_close() else {
            self.error_expected("'(', '[' or '{'");
            b.push(self.missing(SyntaxKind::OpenParen));
            b.push(self.missing(SyntaxKind::CloseParen));
            return self.finish(b);
        };
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        self.parse_tree_contents(&mut b, grammar);
        if self.at(close) {
            self.bump(&mut b);
        } else if self.at(SyntaxKind::EndOfFile) {
            self.error_at(open_range, &messages::UNCLOSED_DELIMITER_0, &[open.name()]);
            b.push(self.missing(close));
        } else {
            let found = self.current();
            self.error_here(
                &messages::MISMATCHED_CLOSING_DELIMITER_0_EXPECTED_1,
                &[found.name(), close.name()],
            );
            b.push(self.missing(close));
        }
        self.finish(b)
    }

    /// Tokens up to any closing delimiter or end of input.
    fn parse_tree_contents(&mut self, b: &mut NodeBuilder<'a>, grammar: &'static TreeGrammar) {
        use SyntaxKind::*;
        loop {
            self.flush_trivia(b);
            let kind = self.current();
            if kind == EndOfFile || kind.is_close_delimiter() {
                break;
            }
            match kind {
                OpenParen | OpenBracket | OpenBrace => {
                    let tree = self.parse_token_tree(b, grammar);
                    b.push(tree);
                }
                Dollar if self.nth(1) == OpenParen => {
                    let repetition = self.parse_repetition(grammar);
                    b.push(repetition);
                }
                Metavariable if grammar.bindings && self.nth(1) == Colon => {
                    let binding = self.parse_binding();
                    b.push(binding);
                }
                Quote if matches!(self.nth(1), Identifier) || self.nth(1).is_keyword() => {
                    let lifetime = self.parse_lifetime(b);
                    b.push(lifetime);
                }
                IntegerToken | FloatToken | StringToken | RawStringToken | CharToken | TrueKw | FalseKw => {
                    let literal = self.parse_literal(b);
                    b.push(literal);
                }
                _ => self.bump(b),
            }
        }
    }

    /// `$( ... ) sep? op`.
    fn parse_repetition(&mut self, grammar: &'static TreeGrammar) -> &'a SyntaxNode<'a> {
        use SyntaxKind::*;
        let mut b = NodeBuilder::new(grammar.repetition);
        self.bump(&mut b);
        let open_range = self.scanner.token().range;
        self.bump(&mut b);
        self.parse_tree_contents(&mut b, grammar);
        if self.at(CloseParen) {
            self.bump(&mut b);
        } else if self.at(EndOfFile) {
            self.error_at(open_range, &messages::UNCLOSED_DELIMITER_0, &["("]);
            b.push(self.missing(CloseParen));
            return self.finish(b);
        } else {
            let found = self.current();
            self.error_here(
                &messages::MISMATCHED_CLOSING_DELIMITER_0_EXPECTED_1,
                &[found.name(), CloseParen.name()],
            );
            b.push(self.missing(CloseParen));
            return self.finish(b);
        }
        // An optional separator, then the operator.
        if !is_repetition_operator(self.current()) && !self.at_separator_end() {
            self.bump(&mut b);
        }
        if is_repetition_operator(self.current()) {
            self.bump(&mut b);
        } else {
            self.error_here(&messages::REPETITION_OPERATOR_EXPECTED, &[]);
            b.push(self.missing(Star));
        }
        self.finish(b)
    }

    /// Whether the token after `)` of a repetition cannot be a separator.
    fn at_separator_end(&self) -> bool {
        let kind = self.current();
        kind == SyntaxKind::EndOfFile
            || kind == SyntaxKind::Dollar
            || kind.is_open_delimiter()
            || kind.is_close_delimiter()
    }

    /// `$name:fragment`.
    fn parse_binding(&mut self) -> &'a SyntaxNode<'a> {
        let mut b = NodeBuilder::new(SyntaxKind::TokenBindingPattern);
        self.bump_field(&mut b, FieldName::Name);
        self.bump(&mut b);
        let is_word = self.at(SyntaxKind::Identifier) || self.current().is_keyword();
        if !is_word {
            self.error_expected("fragment specifier");
            b.push_field(FieldName::Type, self.missing(SyntaxKind::FragmentSpecifier));
            return self.finish(b);
        }
        let text = self.token_text();
        if FRAGMENT_SPECIFIERS.contains(&text) {
            self.bump_as_field(&mut b, FieldName::Type, SyntaxKind::FragmentSpecifier);
        } else {
            self.error_here(&messages::UNKNOWN_FRAGMENT_SPECIFIER_0, &[text]);
            let leaf = self.leaf(&mut b, Some(SyntaxKind::FragmentSpecifier));
            let flagged = self.arena.alloc(leaf.with_flags(leaf.flags() | NodeFlags::ERROR));
            b.push_field(FieldName::Type, flagged);
        }
        self.finish(b)
    }
}

fn is_repetition_operator(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::Star | SyntaxKind::Plus | SyntaxKind::Question)
}
