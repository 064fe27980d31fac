//! Scanner integration tests.
//!
//! Verifies that the scanner tokenizes Rust constructs, including the
//! context-sensitive ones that depend on the valid set.

use rcst_scanner::{LexicalErrorKind, ScanSet, Scanner, TokenFlags};
use rcst_syntax::SyntaxKind;

/// Helper: scan all tokens from source and return as (kind, text) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan(ScanSet::DEFAULT);
        if kind == SyntaxKind::EndOfFile {
            break;
        }
        tokens.push((kind, scanner.token_text().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
    assert!(scan_all("   \n\t  ").is_empty());
}

#[test]
fn test_keywords_and_identifiers() {
    use SyntaxKind::*;
    assert_eq!(
        scan_kinds("fn Self self _ _x union"),
        vec![FnKw, SelfTypeKw, SelfKw, Underscore, Identifier, Identifier]
    );
}

#[test]
fn test_raw_identifier() {
    let mut scanner = Scanner::new("r#type");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Identifier);
    assert_eq!(scanner.token_text(), "r#type");
    assert!(scanner.token().flags.contains(TokenFlags::RAW_IDENTIFIER));
}

#[test]
fn test_greater_than_never_merges() {
    use SyntaxKind::*;
    assert_eq!(
        scan_kinds("Vec<Vec<u8>>"),
        vec![Identifier, Lt, Identifier, Lt, Identifier, Gt, Gt]
    );
    assert_eq!(scan_kinds("a <<= b"), vec![Identifier, ShlEq, Identifier]);
}

#[test]
fn test_punctuation() {
    use SyntaxKind::*;
    assert_eq!(
        scan_kinds(":: -> => ..= ... .. ? @ # $"),
        vec![ColonColon, Arrow, FatArrow, DotDotEq, DotDotDot, DotDot, Question, At, Pound, Dollar]
    );
}

#[test]
fn test_metavariable() {
    let tokens = scan_all("$x:expr");
    assert_eq!(tokens[0], (SyntaxKind::Metavariable, "$x".to_string()));
    assert_eq!(tokens[1].0, SyntaxKind::Colon);
    assert_eq!(tokens[2].0, SyntaxKind::Identifier);
}

#[test]
fn test_raw_string_with_hashes() {
    let mut scanner = Scanner::new(r###"r##"a"ha"##"###);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::RawStringToken);
    let token = scanner.token().clone();
    assert_eq!(token.range.end, 11);
    let kinds: Vec<_> = token.pieces.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::RawStringStart, SyntaxKind::StringContent, SyntaxKind::RawStringEnd]
    );
    assert_eq!(token.pieces[1].range.slice(scanner.text()), "a\"ha");
}

#[test]
fn test_unterminated_raw_string() {
    let mut scanner = Scanner::new("r#\"abc");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::ErrorSentinel);
    assert_eq!(
        scanner.token().errors[0].kind,
        LexicalErrorKind::UnterminatedRawString { hashes: 1 }
    );
}

#[test]
fn test_lifetime_versus_char() {
    use SyntaxKind::*;
    assert_eq!(scan_kinds("'a>"), vec![Quote, Identifier, Gt]);
    assert_eq!(scan_kinds("'a'"), vec![CharToken]);
    assert_eq!(scan_kinds("&'static str"), vec![Amp, Quote, StaticKw, Identifier]);
    assert_eq!(scan_kinds("'\\n'"), vec![CharToken]);
}

#[test]
fn test_char_pieces() {
    let mut scanner = Scanner::new("'\\n'");
    scanner.scan(ScanSet::DEFAULT);
    let kinds: Vec<_> = scanner.token().pieces.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::CharStart, SyntaxKind::EscapeSequence, SyntaxKind::CharEnd]
    );
}

#[test]
fn test_string_with_invalid_escape() {
    let mut scanner = Scanner::new(r#""a\qb""#);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::StringToken);
    assert_eq!(scanner.token().errors.len(), 1);
    assert_eq!(scanner.token().errors[0].kind, LexicalErrorKind::InvalidEscape);
}

#[test]
fn test_unterminated_string() {
    let mut scanner = Scanner::new("\"abc");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::ErrorSentinel);
    assert!(scanner.token().flags.contains(TokenFlags::UNTERMINATED));
    assert_eq!(scanner.token_end(), 4);
}

#[test]
fn test_byte_strings() {
    let mut scanner = Scanner::new("b\"ab\" br#\"x\"#");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::StringToken);
    assert!(scanner.token().flags.contains(TokenFlags::BYTE_PREFIX));
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::RawStringToken);
    assert_eq!(scanner.token_text(), "br#\"x\"#");
}

#[test]
fn test_nested_block_comment() {
    let mut scanner = Scanner::new("/* /* */ */ x");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Identifier);
    let trivia = scanner.leading_trivia();
    assert_eq!(trivia.len(), 1);
    assert_eq!(trivia[0].kind, SyntaxKind::BlockComment);
    assert_eq!(trivia[0].range.end, 11);
}

#[test]
fn test_unterminated_block_comment() {
    let mut scanner = Scanner::new("x /* /* */");
    scanner.scan(ScanSet::DEFAULT);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::ErrorSentinel);
    assert_eq!(
        scanner.token().errors[0].kind,
        LexicalErrorKind::UnterminatedBlockComment
    );
}

#[test]
fn test_doc_comment_markers() {
    let mut scanner = Scanner::new("//! inner\n/// outer\n//// plain\nx");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Identifier);
    let trivia = scanner.leading_trivia();
    assert_eq!(trivia.len(), 3);
    assert!(trivia[0].flags.contains(TokenFlags::INNER_DOC));
    assert_eq!(trivia[0].pieces[1].kind, SyntaxKind::InnerDocCommentMarker);
    assert!(trivia[1].flags.contains(TokenFlags::OUTER_DOC));
    assert_eq!(trivia[1].pieces[2].range.slice(scanner.text()), " outer");
    assert!(trivia[2].pieces.is_empty());
    assert!(scanner.token().has_preceding_line_break());
}

#[test]
fn test_number_and_suffix() {
    let mut scanner = Scanner::new("42u8 1.0f32");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::IntegerToken);
    assert_eq!(scanner.token_text(), "42");
    assert_eq!(scanner.scan(ScanSet::AFTER_LITERAL), SyntaxKind::LiteralSuffix);
    assert_eq!(scanner.token_text(), "u8");
    assert_eq!(scanner.scan(ScanSet::AFTER_LITERAL), SyntaxKind::FloatToken);
    assert_eq!(scanner.token_text(), "1.0");
    assert_eq!(scanner.scan(ScanSet::AFTER_LITERAL), SyntaxKind::LiteralSuffix);
    assert_eq!(scanner.token_text(), "f32");
}

#[test]
fn test_suffix_requires_adjacency() {
    let mut scanner = Scanner::new("1 u8");
    scanner.scan(ScanSet::DEFAULT);
    assert_eq!(scanner.scan(ScanSet::AFTER_LITERAL), SyntaxKind::Identifier);
}

#[test]
fn test_tuple_index() {
    use SyntaxKind::*;
    let mut scanner = Scanner::new("x.0.1");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), Identifier);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), Dot);
    assert_eq!(scanner.scan(ScanSet::TUPLE_INDEX), IntegerToken);
    assert_eq!(scanner.token_text(), "0");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), Dot);
    assert_eq!(scanner.scan(ScanSet::TUPLE_INDEX), IntegerToken);
    assert_eq!(scanner.token_text(), "1");

    assert_eq!(scan_kinds("x.0.1"), vec![Identifier, Dot, FloatToken]);
}

#[test]
fn test_rescan_as_tuple_index() {
    let mut scanner = Scanner::new("0.1");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::FloatToken);
    assert_eq!(scanner.rescan(ScanSet::TUPLE_INDEX), SyntaxKind::IntegerToken);
    assert_eq!(scanner.scan(ScanSet::TUPLE_INDEX), SyntaxKind::Dot);
    assert_eq!(scanner.scan(ScanSet::TUPLE_INDEX), SyntaxKind::IntegerToken);
}

#[test]
fn test_split_shift_in_generics() {
    let mut scanner = Scanner::new("<<T");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Shl);
    scanner.split_token(SyntaxKind::Lt);
    assert_eq!(scanner.token_text(), "<");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Lt);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Identifier);
}

#[test]
fn test_rescan_greater_than() {
    let mut scanner = Scanner::new("a >= b");
    scanner.scan(ScanSet::DEFAULT);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Gt);
    assert_eq!(scanner.rescan_greater_than(), SyntaxKind::GtEq);
    assert_eq!(scanner.token_text(), ">=");

    let mut scanner = Scanner::new("> >");
    scanner.scan(ScanSet::DEFAULT);
    assert_eq!(scanner.rescan_greater_than(), SyntaxKind::Gt);
}

#[test]
fn test_shebang() {
    let mut scanner = Scanner::new("#!/usr/bin/env run\nfn main() {}");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Shebang);
    assert_eq!(scanner.token_text(), "#!/usr/bin/env run");
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::FnKw);

    assert_eq!(
        scan_kinds("#![allow(x)]")[..3],
        [SyntaxKind::Pound, SyntaxKind::Bang, SyntaxKind::OpenBracket]
    );
}

#[test]
fn test_invalid_character() {
    let mut scanner = Scanner::new("a ¤ b");
    scanner.scan(ScanSet::DEFAULT);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Unknown);
    assert_eq!(scanner.token().errors[0].kind, LexicalErrorKind::InvalidCharacter);
    assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Identifier);
}

#[test]
fn test_save_and_restore() {
    let mut scanner = Scanner::new("a b c");
    scanner.scan(ScanSet::DEFAULT);
    let state = scanner.save_state();
    scanner.scan(ScanSet::DEFAULT);
    scanner.scan(ScanSet::DEFAULT);
    assert_eq!(scanner.token_text(), "c");
    scanner.restore_state(state);
    assert_eq!(scanner.token_text(), "a");
    scanner.scan(ScanSet::DEFAULT);
    assert_eq!(scanner.token_text(), "b");
}

#[test]
fn test_line_break_flag() {
    let mut scanner = Scanner::new("a\nb c");
    scanner.scan(ScanSet::DEFAULT);
    assert!(!scanner.token().has_preceding_line_break());
    scanner.scan(ScanSet::DEFAULT);
    assert!(scanner.token().has_preceding_line_break());
    scanner.scan(ScanSet::DEFAULT);
    assert!(!scanner.token().has_preceding_line_break());
}
