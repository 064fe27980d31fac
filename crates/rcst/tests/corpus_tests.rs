//! Whole-file runs over real Rust code.
//!
//! The workspace's own sources are always parsed. An external corpus is
//! parsed too when `RCST_CORPUS_PATH` points at a directory of `.rs` files
//! (for example a checkout of rust-lang/rust's `tests/ui`); without it that
//! part is skipped. `RCST_CORPUS_MAX_FILES` caps the file count.

use std::path::{Path, PathBuf};

use rcst::{parse_files, ParserOptions, SyntaxTree};

fn collect_rs_files(dir: &Path, files: &mut Vec<PathBuf>, max_files: usize) {
    if files.len() >= max_files {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        if files.len() >= max_files {
            break;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, files, max_files);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
}

/// Facts every tree must satisfy, whatever the input.
#[derive(Debug)]
struct Outcome {
    covers_input: bool,
    had_errors: bool,
}

fn outcome(tree: &SyntaxTree<'_>) -> Outcome {
    let root = tree.root();
    Outcome {
        covers_input: root.range().pos == 0 && root.range().end as usize == tree.source().len(),
        had_errors: tree.had_errors(),
    }
}

fn run(files: &[PathBuf]) -> (usize, usize) {
    let results = parse_files(files, &ParserOptions::default(), outcome);
    let mut loaded = 0;
    let mut with_errors = 0;
    for (path, result) in files.iter().zip(results) {
        let Ok(outcome) = result else {
            continue;
        };
        loaded += 1;
        assert!(outcome.covers_input, "root does not span {}", path.display());
        if outcome.had_errors {
            with_errors += 1;
        }
    }
    (loaded, with_errors)
}

#[test]
fn test_workspace_sources() {
    let crates_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let mut files = Vec::new();
    collect_rs_files(&crates_dir, &mut files, 500);
    assert!(!files.is_empty());
    let (loaded, with_errors) = run(&files);
    assert_eq!(loaded, files.len());
    println!("{loaded} workspace files, {with_errors} with errors");
}

#[test]
fn test_external_corpus() {
    let Some(root) = std::env::var("RCST_CORPUS_PATH").ok().map(PathBuf::from) else {
        eprintln!("Skipping corpus run: RCST_CORPUS_PATH not set.");
        return;
    };
    if !root.exists() {
        eprintln!("Skipping corpus run: {:?} does not exist.", root);
        return;
    }
    let max_files = std::env::var("RCST_CORPUS_MAX_FILES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(2000);
    let mut files = Vec::new();
    collect_rs_files(&root, &mut files, max_files);
    let (loaded, with_errors) = run(&files);
    println!("{loaded} corpus files, {with_errors} with errors");
}
