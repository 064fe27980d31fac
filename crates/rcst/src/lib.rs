//! rcst: concrete syntax trees for Rust source.
//!
//! Parses single sources, files on disk, and batches of independent
//! sources on the rayon pool. Every parse yields a tree; problems in the
//! input are diagnostics on the tree, never `Err`. Only loading a file can
//! fail.

use std::path::{Path, PathBuf};

use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

pub use rcst_core::{LineMap, SyntaxArena, TextPos, TextRange};
pub use rcst_diagnostics::{Diagnostic, DiagnosticCategory};
pub use rcst_parser::{OptionsError, ParserOptions};
pub use rcst_syntax::{preorder, FieldName, Supertype, SyntaxKind, SyntaxNode, SyntaxTree, Visitor, WalkEvent};

/// Failure to turn a path into source text.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: std::io::Error },
    #[error("'{path}' is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

/// One unit of a batch parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub file_name: String,
    pub text: String,
}

impl SourceText {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }

    /// Read a file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|error| LoadError::Read {
            path: path.to_path_buf(),
            error,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| LoadError::NotUtf8 {
            path: path.to_path_buf(),
        })?;
        Ok(Self::new(path.to_string_lossy(), text))
    }
}

/// An owned digest of a parse, for results that outlive the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    pub file_name: String,
    pub node_count: usize,
    pub had_errors: bool,
    pub diagnostics: Vec<String>,
}

impl ParseSummary {
    pub fn of(tree: &SyntaxTree<'_>) -> Self {
        Self {
            file_name: tree.file_name().to_string(),
            node_count: tree.root().node_count(),
            had_errors: tree.had_errors(),
            diagnostics: tree.render_diagnostics(),
        }
    }
}

/// Parse one source. The tree borrows from `arena`.
pub fn parse_source<'a>(
    arena: &'a SyntaxArena,
    file_name: &str,
    text: &str,
    options: &ParserOptions,
) -> SyntaxTree<'a> {
    rcst_parser::parse(arena, file_name, text, options)
}

/// Read and parse a file.
pub fn parse_file<'a>(
    arena: &'a SyntaxArena,
    path: impl AsRef<Path>,
    options: &ParserOptions,
) -> Result<SyntaxTree<'a>, LoadError> {
    let source = SourceText::load(path)?;
    Ok(parse_source(arena, &source.file_name, &source.text, options))
}

/// Parse independent sources in parallel, each in its own arena, and map
/// every tree to an owned value with `f`. Results are in input order.
pub fn parse_many<T, F>(sources: &[SourceText], options: &ParserOptions, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&SyntaxTree<'_>) -> T + Sync,
{
    debug!("parsing {} sources", sources.len());
    sources
        .par_iter()
        .map(|source| {
            let arena = SyntaxArena::for_source(source.text.len());
            let tree = parse_source(&arena, &source.file_name, &source.text, options);
            f(&tree)
        })
        .collect()
}

/// Load and parse files in parallel. A file that cannot be loaded yields
/// its `LoadError` in place; the others are still parsed.
pub fn parse_files<P, T, F>(paths: &[P], options: &ParserOptions, f: F) -> Vec<Result<T, LoadError>>
where
    P: AsRef<Path> + Sync,
    T: Send,
    F: Fn(&SyntaxTree<'_>) -> T + Sync,
{
    debug!("parsing {} files", paths.len());
    paths
        .par_iter()
        .map(|path| {
            let arena = SyntaxArena::new();
            let tree = parse_file(&arena, path, options)?;
            Ok(f(&tree))
        })
        .collect()
}
