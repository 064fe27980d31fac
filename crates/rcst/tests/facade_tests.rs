//! End-to-end tests for the public entry points: single sources, files on
//! disk and parallel batches.

use std::path::PathBuf;

use rcst::{
    parse_file, parse_files, parse_many, parse_source, LoadError, ParseSummary, ParserOptions, SourceText,
    SyntaxArena, SyntaxKind,
};

/// A scratch path unique to this test process.
fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rcst-{}-{}", std::process::id(), name))
}

// ============================================================================
// Single sources
// ============================================================================

#[test]
fn test_parse_source_empty() {
    let arena = SyntaxArena::new();
    let tree = parse_source(&arena, "empty.rs", "", &ParserOptions::default());
    assert_eq!(tree.root().kind(), SyntaxKind::SourceFile);
    assert!(!tree.had_errors());
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_parse_source_keeps_file_name() {
    let arena = SyntaxArena::new();
    let tree = parse_source(&arena, "lib.rs", "fn f() {}", &ParserOptions::default());
    assert_eq!(tree.file_name(), "lib.rs");
    assert_eq!(tree.root().range().end as usize, "fn f() {}".len());
}

#[test]
fn test_rendered_diagnostics_carry_location() {
    let arena = SyntaxArena::new();
    let tree = parse_source(&arena, "broken.rs", "fn f() {\n    let x = 1\n}", &ParserOptions::default());
    assert!(tree.had_errors());
    let rendered = tree.render_diagnostics();
    assert!(!rendered.is_empty());
    assert!(rendered[0].starts_with("broken.rs:"), "{}", rendered[0]);
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_parse_file() {
    let path = scratch_path("ok.rs");
    std::fs::write(&path, "pub mod a { pub fn f() -> u8 { 1 } }").unwrap();
    let arena = SyntaxArena::new();
    let tree = parse_file(&arena, &path, &ParserOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(!tree.had_errors());
    assert_eq!(tree.file_name(), path.to_string_lossy());
}

#[test]
fn test_parse_file_missing() {
    let arena = SyntaxArena::new();
    let err = parse_file(&arena, scratch_path("missing.rs"), &ParserOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
}

#[test]
fn test_parse_file_not_utf8() {
    let path = scratch_path("latin1.rs");
    std::fs::write(&path, [b'/', b'/', b' ', 0xE9, b'\n']).unwrap();
    let arena = SyntaxArena::new();
    let result = parse_file(&arena, &path, &ParserOptions::default());
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(LoadError::NotUtf8 { .. })));
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_parse_many_preserves_order() {
    let sources: Vec<SourceText> = (0..64)
        .map(|i| SourceText::new(format!("unit{i}.rs"), format!("fn f{i}() -> u32 {{ {i} }}")))
        .collect();
    let names = parse_many(&sources, &ParserOptions::default(), |tree| tree.file_name().to_string());
    let expected: Vec<String> = (0..64).map(|i| format!("unit{i}.rs")).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_parse_many_matches_sequential() {
    let sources = vec![
        SourceText::new("a.rs", "struct A { x: u8 }"),
        SourceText::new("b.rs", "fn main() { let = ; }"),
        SourceText::new("c.rs", "macro_rules! m { () => {} }"),
    ];
    let options = ParserOptions::default();
    let parallel = parse_many(&sources, &options, |tree| tree.to_sexp());
    for (source, sexp) in sources.iter().zip(&parallel) {
        let arena = SyntaxArena::new();
        let tree = parse_source(&arena, &source.file_name, &source.text, &options);
        assert_eq!(&tree.to_sexp(), sexp);
    }
}

#[test]
fn test_parse_many_summaries() {
    let sources = vec![SourceText::new("ok.rs", "fn f() {}"), SourceText::new("bad.rs", "fn f(")];
    let summaries = parse_many(&sources, &ParserOptions::default(), ParseSummary::of);
    assert!(!summaries[0].had_errors);
    assert!(summaries[0].diagnostics.is_empty());
    assert!(summaries[1].had_errors);
    assert!(!summaries[1].diagnostics.is_empty());

    let json = serde_json::to_value(&summaries[0]).unwrap();
    assert_eq!(json["fileName"], "ok.rs");
    assert_eq!(json["hadErrors"], false);
}

#[test]
fn test_parse_files_reports_load_errors_in_place() {
    let good = scratch_path("batch-good.rs");
    std::fs::write(&good, "const X: u8 = 1;").unwrap();
    let paths = vec![good.clone(), scratch_path("batch-missing.rs")];
    let results = parse_files(&paths, &ParserOptions::default(), |tree| tree.had_errors());
    std::fs::remove_file(&good).unwrap();
    assert!(matches!(results[0], Ok(false)));
    assert!(matches!(results[1], Err(LoadError::Read { .. })));
}

#[test]
fn test_options_change_batch_outcome() {
    let sources = vec![SourceText::new("t.rs", "trait T { fn f(u8); }")];
    let lenient = parse_many(&sources, &ParserOptions::default(), |tree| tree.had_errors());
    let strict = parse_many(&sources, &ParserOptions::strict(), |tree| tree.had_errors());
    assert_eq!(lenient, vec![false]);
    assert_eq!(strict, vec![true]);
}
