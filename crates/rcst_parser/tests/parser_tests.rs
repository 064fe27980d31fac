//! Parser integration tests.
//!
//! Parse small Rust sources and check the shape of the resulting tree, the
//! diagnostics, and the invariants every tree must satisfy.

use rcst_core::SyntaxArena;
use rcst_parser::{parse, ParserOptions};
use rcst_syntax::{preorder, FieldName, SyntaxKind, SyntaxNode, SyntaxTree};

fn parse_with<'a>(arena: &'a SyntaxArena, source: &str, options: &ParserOptions) -> SyntaxTree<'a> {
    parse(arena, "test.rs", source, options)
}

fn parse_default<'a>(arena: &'a SyntaxArena, source: &str) -> SyntaxTree<'a> {
    parse_with(arena, source, &ParserOptions::default())
}

/// The first node of `kind` in preorder, i.e. the outermost one.
fn find<'a>(tree: &SyntaxTree<'a>, kind: SyntaxKind) -> &'a SyntaxNode<'a> {
    preorder(tree.root())
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {} in {}", kind.name(), tree.to_sexp()))
}

fn count(tree: &SyntaxTree<'_>, kind: SyntaxKind) -> usize {
    preorder(tree.root()).filter(|n| n.kind() == kind).count()
}

fn codes(tree: &SyntaxTree<'_>) -> Vec<u32> {
    tree.diagnostics().iter().map(|d| d.code).collect()
}

fn assert_clean(tree: &SyntaxTree<'_>) {
    assert!(
        !tree.had_errors(),
        "unexpected errors: {:?}\n{}",
        tree.render_diagnostics(),
        tree.to_sexp()
    );
}

/// Collect the ranges of atomic nodes: leaves, literals and comments.
fn atoms(node: &SyntaxNode<'_>, out: &mut Vec<(u32, u32)>) {
    let atomic = node.is_leaf()
        || matches!(
            node.kind(),
            SyntaxKind::StringLiteral
                | SyntaxKind::RawStringLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
        );
    if atomic {
        if !node.is_missing() {
            out.push((node.range().pos, node.range().end));
        }
        return;
    }
    for child in node.children() {
        atoms(child.node, out);
    }
}

/// Every non-whitespace byte belongs to exactly one atom, in order.
fn assert_covered(tree: &SyntaxTree<'_>) {
    let source = tree.source();
    let mut ranges = Vec::new();
    atoms(tree.root(), &mut ranges);
    let mut last = 0u32;
    for &(pos, end) in &ranges {
        assert!(pos >= last, "overlapping or unordered atom at {}..{}", pos, end);
        let gap = &source[last as usize..pos as usize];
        assert!(gap.trim().is_empty(), "uncovered text {:?} before {}", gap, pos);
        last = end;
    }
    assert!(source[last as usize..].trim().is_empty(), "uncovered tail after {}", last);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { a + b * c; }");
    assert_clean(&tree);
    let sum = find(&tree, SyntaxKind::BinaryExpression);
    let op = sum.child_by_field(FieldName::Operator).unwrap();
    assert_eq!(op.kind(), SyntaxKind::Plus);
    let right = sum.child_by_field(FieldName::Right).unwrap();
    assert_eq!(right.kind(), SyntaxKind::BinaryExpression);
    assert_eq!(tree.text_of(right), "b * c");
}

#[test]
fn test_assignment_is_right_associative() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { a = b = c; }");
    assert_clean(&tree);
    let outer = find(&tree, SyntaxKind::AssignmentExpression);
    assert_eq!(tree.text_of(outer.child_by_field(FieldName::Left).unwrap()), "a");
    let right = outer.child_by_field(FieldName::Right).unwrap();
    assert_eq!(right.kind(), SyntaxKind::AssignmentExpression);
    assert_eq!(tree.text_of(right), "b = c");
}

#[test]
fn test_subtraction_is_left_associative() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { a - b - c; }");
    assert_clean(&tree);
    let outer = find(&tree, SyntaxKind::BinaryExpression);
    let left = outer.child_by_field(FieldName::Left).unwrap();
    assert_eq!(tree.text_of(left), "a - b");
}

#[test]
fn test_less_than_is_a_comparison() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let x = a < b; }");
    assert_clean(&tree);
    let cmp = find(&tree, SyntaxKind::BinaryExpression);
    assert_eq!(cmp.child_by_field(FieldName::Operator).unwrap().kind(), SyntaxKind::Lt);
    assert_eq!(count(&tree, SyntaxKind::GenericFunction), 0);
}

#[test]
fn test_turbofish_path() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let v = Vec::<u8>::new(); }");
    assert_clean(&tree);
    let call = find(&tree, SyntaxKind::CallExpression);
    let function = call.child_by_field(FieldName::Function).unwrap();
    assert_eq!(function.kind(), SyntaxKind::ScopedIdentifier);
    assert_eq!(function.child_by_field(FieldName::Path).unwrap().kind(), SyntaxKind::GenericType);
    assert_eq!(tree.text_of(function.child_by_field(FieldName::Name).unwrap()), "new");
}

#[test]
fn test_nested_generics_and_shift() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let v: Vec<Vec<u8>> = x >> 2; }");
    assert_clean(&tree);
    let shift = find(&tree, SyntaxKind::BinaryExpression);
    assert_eq!(shift.child_by_field(FieldName::Operator).unwrap().kind(), SyntaxKind::Shr);
    assert_eq!(count(&tree, SyntaxKind::GenericType), 2);
}

#[test]
fn test_method_chain_and_try() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let n = s.trim().parse::<u32>()?; }");
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::TryExpression), 1);
    assert_eq!(count(&tree, SyntaxKind::GenericFunction), 1);
    assert_eq!(count(&tree, SyntaxKind::CallExpression), 2);
}

#[test]
fn test_tuple_index_is_not_a_float() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let x = t.0.1; }");
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::FieldExpression), 2);
    assert_eq!(count(&tree, SyntaxKind::FloatLiteral), 0);
}

#[test]
fn test_number_parts_are_separate_leaves() {
    use SyntaxKind::*;
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let x = 0x1Fu8 + 1.5e3 + 7; }");
    assert_clean(&tree);
    assert_covered(&tree);
    let kinds = |node: &SyntaxNode<'_>| node.children().iter().map(|c| c.node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds(find(&tree, IntegerLiteral)), vec![RadixPrefix, Digits, LiteralSuffix]);
    assert_eq!(kinds(find(&tree, FloatLiteral)), vec![Digits, DecimalPoint, Digits, Exponent]);
    let plain = preorder(tree.root())
        .filter(|n| n.kind() == IntegerLiteral)
        .last()
        .unwrap_or_else(|| panic!("no integer literal"));
    assert_eq!(kinds(plain), vec![IntegerToken]);
}

#[test]
fn test_struct_literal_is_not_allowed_in_condition() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { if x {} let s = S { a: 1, ..d }; }");
    assert_clean(&tree);
    let condition = find(&tree, SyntaxKind::IfExpression)
        .child_by_field(FieldName::Condition)
        .unwrap();
    assert_eq!(condition.kind(), SyntaxKind::Identifier);
    assert_eq!(count(&tree, SyntaxKind::StructExpression), 1);
    assert_eq!(count(&tree, SyntaxKind::BaseFieldInitializer), 1);
}

#[test]
fn test_let_chain() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { if let Some(x) = a && x > 1 { } }");
    assert_clean(&tree);
    let chain = find(&tree, SyntaxKind::LetChain);
    assert_eq!(chain.named_children().count(), 2);
    assert_eq!(count(&tree, SyntaxKind::LetCondition), 1);
}

#[test]
fn test_match_arms() {
    let arena = SyntaxArena::new();
    let source = "fn main() { match x { Some(1) | None => 0, Some(n) if n > 2 => { n } _ => 1 } }";
    let tree = parse_default(&arena, source);
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::MatchArm), 3);
    assert_eq!(count(&tree, SyntaxKind::OrPattern), 1);
}

#[test]
fn test_closures() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let f = move |a, b: u8| a + b; let g = || -> u8 { 1 }; }");
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::ClosureExpression), 2);
    assert_eq!(count(&tree, SyntaxKind::Parameter), 1);
}

#[test]
fn test_block_like_statement_needs_no_semicolon() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { if a { b() } loop { break } x }");
    assert_clean(&tree);
    let block = find(&tree, SyntaxKind::Block);
    assert_eq!(count(&tree, SyntaxKind::ExpressionStatement), 2);
    assert_eq!(block.named_children().last().unwrap().kind(), SyntaxKind::Identifier);
}

// ============================================================================
// Items
// ============================================================================

#[test]
fn test_items() {
    let arena = SyntaxArena::new();
    let source = r#"
        use std::collections::{HashMap, HashSet as Set};
        pub(crate) struct Point<T> { pub x: T, y: T }
        struct Unit;
        struct Pair(pub u8, u8);
        enum E { A, B(u8), C { x: i32 } = 3 }
        trait Shape: Clone { fn area(&self) -> f64; }
        impl<T: Copy> Shape for Point<T> where T: Default { fn area(&self) -> f64 { 0.0 } }
        mod inner;
        const X: u8 = 1;
        static mut Y: u8 = 2;
        type Alias<'a> = &'a str;
        extern crate alloc as a;
        extern "C" { fn abs(x: i32) -> i32; }
    "#;
    let tree = parse_default(&arena, source);
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::UseDeclaration), 1);
    assert_eq!(count(&tree, SyntaxKind::UseAsClause), 1);
    assert_eq!(count(&tree, SyntaxKind::StructItem), 3);
    assert_eq!(count(&tree, SyntaxKind::EnumVariant), 3);
    assert_eq!(count(&tree, SyntaxKind::TraitItem), 1);
    assert_eq!(count(&tree, SyntaxKind::ImplItem), 1);
    assert_eq!(count(&tree, SyntaxKind::FunctionSignatureItem), 2);
    assert_eq!(count(&tree, SyntaxKind::ForeignModItem), 1);
    let visibility = find(&tree, SyntaxKind::VisibilityModifier);
    assert_eq!(tree.text_of(visibility), "pub(crate)");
}

#[test]
fn test_tuple_struct_field_visibility_before_parenthesized_type() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "struct S(pub (u8, u8));");
    assert_clean(&tree);
    assert_eq!(tree.text_of(find(&tree, SyntaxKind::VisibilityModifier)), "pub");
    assert_eq!(count(&tree, SyntaxKind::TupleType), 1);
}

#[test]
fn test_attributes_and_inner_attributes() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "#![allow(dead_code)]\n#[derive(Debug, Clone)]\n#[doc = \"x\"]\nstruct S;");
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::InnerAttributeItem), 1);
    assert_eq!(count(&tree, SyntaxKind::AttributeItem), 2);
    assert_eq!(count(&tree, SyntaxKind::TokenTree), 2);
}

#[test]
fn test_function_types_and_bounds() {
    let arena = SyntaxArena::new();
    let source = "fn apply<F>(f: F) -> impl Fn(u8) -> u8 where F: for<'a> Fn(&'a str) + Send { f }";
    let tree = parse_default(&arena, source);
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::WhereClause), 1);
    assert_eq!(count(&tree, SyntaxKind::AbstractType), 1);
}

// ============================================================================
// Lexical context
// ============================================================================

#[test]
fn test_raw_string_with_hashes() {
    let arena = SyntaxArena::new();
    let source = r###"fn main() { let s = r#"a "quoted" b"#; }"###;
    let tree = parse_default(&arena, source);
    assert_clean(&tree);
    let raw = find(&tree, SyntaxKind::RawStringLiteral);
    assert_eq!(tree.text_of(raw), r###"r#"a "quoted" b"#"###);
}

#[test]
fn test_lifetime_versus_char_literal() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn f<'a>(x: &'a str) -> char { 'a' }");
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::Lifetime), 2);
    assert_eq!(count(&tree, SyntaxKind::CharLiteral), 1);
}

#[test]
fn test_nested_block_comment() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "/* outer /* inner */ still outer */ fn f() {}");
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::BlockComment), 1);
    assert_eq!(count(&tree, SyntaxKind::FunctionItem), 1);
}

// ============================================================================
// Macros
// ============================================================================

#[test]
fn test_macro_rules_with_repetition() {
    let arena = SyntaxArena::new();
    let source = "macro_rules! list { ($($x:expr),*) => { vec![$($x),*] }; }";
    let tree = parse_default(&arena, source);
    assert_clean(&tree);
    let repetition = find(&tree, SyntaxKind::TokenRepetitionPattern);
    let binding = preorder(repetition)
        .find(|n| n.kind() == SyntaxKind::TokenBindingPattern)
        .unwrap();
    let fragment = binding.child_by_field(FieldName::Type).unwrap();
    assert_eq!(fragment.kind(), SyntaxKind::FragmentSpecifier);
    assert_eq!(tree.text_of(fragment), "expr");
    assert_eq!(count(&tree, SyntaxKind::TokenRepetition), 1);
    assert_eq!(count(&tree, SyntaxKind::MacroRule), 1);
}

#[test]
fn test_unknown_fragment_specifier() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "macro_rules! m { ($x:banana) => {}; }");
    assert!(tree.had_errors());
    assert!(codes(&tree).contains(&2006));
}

#[test]
fn test_macro_invocation_in_items_and_statements() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "thread_local! { static X: u8 = 1; }\nfn main() { println!(\"{}\", 1); }");
    assert_clean(&tree);
    assert_eq!(count(&tree, SyntaxKind::MacroInvocation), 2);
}

#[test]
fn test_mismatched_delimiter_in_token_tree() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { m!(a]; }");
    assert!(tree.had_errors());
    assert!(codes(&tree).contains(&2005));
    assert_covered(&tree);
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_unclosed_parameter_list() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn f( { }\nfn g() {}");
    assert!(tree.had_errors());
    assert!(codes(&tree).contains(&2004));
    let functions: Vec<_> = preorder(tree.root())
        .filter(|n| n.kind() == SyntaxKind::FunctionItem)
        .collect();
    assert_eq!(functions.len(), 2);
    let params = functions[0].child_by_field(FieldName::Parameters).unwrap();
    assert!(params.is_error());
    assert_eq!(tree.text_of(params), "( {");
    assert!(!functions[1].has_error());
    assert_covered(&tree);
}

#[test]
fn test_missing_semicolon_is_inserted() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let x = 1 let y = 2; }");
    assert!(tree.had_errors());
    assert!(codes(&tree).contains(&2001));
    assert_eq!(count(&tree, SyntaxKind::LetDeclaration), 2);
    assert!(preorder(tree.root()).any(|n| n.is_missing() && n.kind() == SyntaxKind::Semicolon));
}

#[test]
fn test_stray_tokens_become_error_nodes() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn f() {} ) ; fn g() {}");
    assert!(tree.had_errors());
    assert!(count(&tree, SyntaxKind::Error) >= 1);
    assert_eq!(count(&tree, SyntaxKind::FunctionItem), 2);
    assert_covered(&tree);
}

#[test]
fn test_unterminated_string_is_reported_once() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "fn main() { let s = \"abc; }");
    assert!(tree.had_errors());
    assert_eq!(codes(&tree).iter().filter(|&&c| c == 1002).count(), 1);
    assert_covered(&tree);
}

#[test]
fn test_nesting_limit() {
    let arena = SyntaxArena::new();
    let depth = 100;
    let source = format!("fn main() {{ let x = {}1{}; }}", "(".repeat(depth), ")".repeat(depth));
    let options = ParserOptions {
        max_depth: 16,
        ..ParserOptions::default()
    };
    let tree = parse_with(&arena, &source, &options);
    assert!(tree.had_errors());
    assert!(codes(&tree).contains(&2007));
    assert_eq!(tree.root().range().end as usize, source.len());
    assert_covered(&tree);
}

#[test]
fn test_path_prefix_without_segment_terminates() {
    for input in ["x as<..= ::", "fn main() { x as<..= :: ; }", "type T = <..= ::;"] {
        let arena = SyntaxArena::new();
        let tree = parse_default(&arena, input);
        assert!(tree.had_errors(), "{:?} should not parse cleanly", input);
        assert_eq!(tree.root().range().end as usize, input.len());
        assert_covered(&tree);
    }
}

// ============================================================================
// Invariants
// ============================================================================

/// Children start in source order, zero-width missing nodes included.
fn assert_ordered(tree: &SyntaxTree<'_>) {
    for node in preorder(tree.root()) {
        let mut last = node.range().pos;
        for child in node.children() {
            let range = child.node.range();
            assert!(
                range.pos >= last,
                "{} at {:?} starts before its previous sibling in {}\n{}",
                child.node.kind().name(),
                range,
                node.kind().name(),
                tree.to_sexp()
            );
            last = range.pos;
        }
    }
}

#[test]
fn test_missing_nodes_follow_flushed_comments() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, "break |0x //");
    assert!(tree.had_errors());
    assert_ordered(&tree);
    let semicolon = preorder(tree.root())
        .find(|n| n.is_missing() && n.kind() == SyntaxKind::Semicolon)
        .unwrap_or_else(|| panic!("no missing ';' in {}", tree.to_sexp()));
    assert_eq!(semicolon.range().pos, 12);

    let tree = parse_default(&arena, "fn main() { let x = /* one */ // two\n }");
    assert!(tree.had_errors());
    assert_ordered(&tree);
}

const SAMPLE: &str = r#"#!/usr/bin/env rust
//! Crate docs.
use std::fmt::{self, Display};

/// A point.
#[derive(Debug)]
pub struct Point { x: i32, y: i32 }

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn main() {
    let p = Point { x: 1, y: -2 };
    let v: Vec<_> = (0..10).map(|i| i * 2).filter(|&i| i % 3 == 0).collect();
    'outer: for i in &v {
        while *i > 0 { break 'outer; }
    }
    let c = b'x' as char;
    let s = r"raw";
    println!("{p} {c} {s} {:?}", v);
}
"#;

#[test]
fn test_sample_is_clean_and_covered() {
    let arena = SyntaxArena::new();
    let tree = parse_default(&arena, SAMPLE);
    assert_clean(&tree);
    assert_covered(&tree);
    assert_ordered(&tree);
    assert_eq!(tree.root().kind(), SyntaxKind::SourceFile);
    assert_eq!(tree.root().range().end as usize, SAMPLE.len());
}

#[test]
fn test_parsing_is_deterministic() {
    let inputs = [SAMPLE, "fn f( { }", "fn main() { match x { 1 => , } }"];
    for input in inputs {
        let first_arena = SyntaxArena::new();
        let second_arena = SyntaxArena::new();
        let first = parse_default(&first_arena, input);
        let second = parse_default(&second_arena, input);
        assert_eq!(first.to_sexp(), second.to_sexp());
        assert_eq!(first.diagnostics(), second.diagnostics());
    }
}

#[test]
fn test_garbage_input_is_covered() {
    let inputs = ["}}}{{{", "fn", "let = = ;", "impl <", "struct S { a: }", "'"];
    for input in inputs {
        let arena = SyntaxArena::new();
        let tree = parse_default(&arena, input);
        assert!(tree.had_errors(), "{:?} should not parse cleanly", input);
        assert_covered(&tree);
        assert_ordered(&tree);
    }
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_anonymous_parameters() {
    let source = "trait T { fn f(u8); }";

    let arena = SyntaxArena::new();
    let lenient = parse_default(&arena, source);
    assert!(!lenient.had_errors());
    assert_eq!(codes(&lenient), vec![2009]);

    let strict = parse_with(&arena, source, &ParserOptions::strict());
    assert!(strict.had_errors());
    assert_eq!(codes(&strict), vec![2010]);
}

#[test]
fn test_static_ref() {
    let source = "static ref X: u8 = 1;";

    let arena = SyntaxArena::new();
    let lenient = parse_default(&arena, source);
    assert_clean(&lenient);

    let strict = parse_with(&arena, source, &ParserOptions::strict());
    assert_eq!(codes(&strict), vec![2011]);
}

#[test]
fn test_comments_can_be_dropped() {
    let source = "// leading\nfn f() { /* inside */ }";
    let arena = SyntaxArena::new();

    let kept = parse_default(&arena, source);
    assert_eq!(count(&kept, SyntaxKind::LineComment), 1);
    assert_eq!(count(&kept, SyntaxKind::BlockComment), 1);

    let options = ParserOptions {
        keep_comments: false,
        ..ParserOptions::default()
    };
    let dropped = parse_with(&arena, source, &options);
    assert_eq!(count(&dropped, SyntaxKind::LineComment), 0);
    assert_eq!(count(&dropped, SyntaxKind::BlockComment), 0);
    assert!(!dropped.had_errors());
}
