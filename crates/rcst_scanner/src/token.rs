//! Tokens produced by the scanner.

use rcst_core::text::TextRange;
use rcst_diagnostics::{messages, Diagnostic};
use rcst_syntax::SyntaxKind;

bitflags::bitflags! {
    /// Token flags describing the shape of a scanned token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                 = 0;
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED         = 1 << 1;
        const HEX_SPECIFIER        = 1 << 2;
        const BINARY_SPECIFIER     = 1 << 3;
        const OCTAL_SPECIFIER      = 1 << 4;
        const FRACTION             = 1 << 5;
        const SCIENTIFIC           = 1 << 6;
        const BYTE_PREFIX          = 1 << 7;
        const C_PREFIX             = 1 << 8;
        const RAW_IDENTIFIER       = 1 << 9;
        const INNER_DOC            = 1 << 10;
        const OUTER_DOC            = 1 << 11;
    }
}

bitflags::bitflags! {
    /// The context-sensitive token kinds the grammar currently accepts.
    ///
    /// Punctuation, keywords and identifiers are always recognized; the
    /// members of this set are only attempted when present.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScanSet: u16 {
        const STRING         = 1 << 0;
        const RAW_STRING     = 1 << 1;
        const CHAR           = 1 << 2;
        const LIFETIME       = 1 << 3;
        const INTEGER        = 1 << 4;
        const FLOAT          = 1 << 5;
        const LITERAL_SUFFIX = 1 << 6;
        const BLOCK_COMMENT  = 1 << 7;
        const LINE_COMMENT   = 1 << 8;
        const ERROR_SENTINEL = 1 << 9;

        /// Everything except literal suffixes, which only follow a literal.
        const DEFAULT = Self::STRING.bits()
            | Self::RAW_STRING.bits()
            | Self::CHAR.bits()
            | Self::LIFETIME.bits()
            | Self::INTEGER.bits()
            | Self::FLOAT.bits()
            | Self::BLOCK_COMMENT.bits()
            | Self::LINE_COMMENT.bits()
            | Self::ERROR_SENTINEL.bits();

        /// Tuple-index position: `t.0.1` must not scan `0.1` as a float.
        const TUPLE_INDEX = Self::DEFAULT.bits() & !Self::FLOAT.bits();

        /// After a literal: the default set plus an abutting suffix.
        const AFTER_LITERAL = Self::DEFAULT.bits() | Self::LITERAL_SUFFIX.bits();
    }
}

impl Default for ScanSet {
    fn default() -> Self {
        ScanSet::DEFAULT
    }
}

/// A sub-range of a composite token (string delimiters, escape sequences,
/// doc comment markers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPiece {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl TokenPiece {
    pub fn new(kind: SyntaxKind, pos: usize, end: usize) -> Self {
        Self {
            kind,
            range: TextRange::from_usize(pos, end),
        }
    }
}

/// What went wrong while scanning a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    InvalidCharacter,
    UnterminatedString,
    UnterminatedRawString { hashes: u32 },
    UnterminatedChar,
    UnterminatedBlockComment,
    InvalidEscape,
    DigitsExpected,
}

/// A lexical problem found inside a token, reported by the parser when the
/// token is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    pub range: TextRange,
}

impl LexicalError {
    pub fn new(kind: LexicalErrorKind, pos: usize, end: usize) -> Self {
        Self {
            kind,
            range: TextRange::from_usize(pos, end),
        }
    }

    /// Turn this error into a located diagnostic.
    pub fn to_diagnostic(&self, file: &str, source: &str) -> Diagnostic {
        let text = self.range.slice(source);
        let closer;
        let (message, args): (_, Vec<&str>) = match self.kind {
            LexicalErrorKind::InvalidCharacter => (&messages::INVALID_CHARACTER, vec![text]),
            LexicalErrorKind::UnterminatedString => (&messages::UNTERMINATED_STRING_LITERAL, vec![]),
            LexicalErrorKind::UnterminatedRawString { hashes } => {
                closer = format!("\"{}", "#".repeat(hashes as usize));
                (&messages::UNTERMINATED_RAW_STRING_LITERAL, vec![closer.as_str()])
            }
            LexicalErrorKind::UnterminatedChar => (&messages::UNTERMINATED_CHARACTER_LITERAL, vec![]),
            LexicalErrorKind::UnterminatedBlockComment => {
                (&messages::UNTERMINATED_BLOCK_COMMENT, vec![])
            }
            LexicalErrorKind::InvalidEscape => (&messages::INVALID_ESCAPE_SEQUENCE, vec![text]),
            LexicalErrorKind::DigitsExpected => (&messages::DIGITS_EXPECTED_AFTER_0, vec![text]),
        };
        Diagnostic::located(file, self.range, message, &args)
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// Byte range in the source text.
    pub range: TextRange,
    /// Shape flags (numeric base, doc comment style, prefixes).
    pub flags: TokenFlags,
    /// Sub-ranges for composite tokens; empty for simple ones.
    pub pieces: Vec<TokenPiece>,
    /// Lexical problems found inside the token.
    pub errors: Vec<LexicalError>,
}

impl Token {
    pub fn new(kind: SyntaxKind, pos: usize, end: usize) -> Self {
        Self {
            kind,
            range: TextRange::from_usize(pos, end),
            flags: TokenFlags::NONE,
            pieces: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_pieces(mut self, pieces: Vec<TokenPiece>) -> Self {
        self.pieces = pieces;
        self
    }

    pub fn with_error(mut self, kind: LexicalErrorKind, pos: usize, end: usize) -> Self {
        self.errors.push(LexicalError::new(kind, pos, end));
        self
    }

    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The source text of this token.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.range.slice(source)
    }

    /// Whether this token is a comment carried as trivia.
    pub fn is_trivia(&self) -> bool {
        self.kind.is_comment()
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_sets() {
        assert!(ScanSet::DEFAULT.contains(ScanSet::FLOAT));
        assert!(!ScanSet::DEFAULT.contains(ScanSet::LITERAL_SUFFIX));
        assert!(!ScanSet::TUPLE_INDEX.contains(ScanSet::FLOAT));
        assert!(ScanSet::TUPLE_INDEX.contains(ScanSet::INTEGER));
        assert!(ScanSet::AFTER_LITERAL.contains(ScanSet::LITERAL_SUFFIX));
    }

    #[test]
    fn test_raw_string_error_message() {
        let source = "r##\"abc";
        let err = LexicalError::new(LexicalErrorKind::UnterminatedRawString { hashes: 2 }, 0, 7);
        let diag = err.to_diagnostic("a.rs", source);
        assert_eq!(diag.code, 1003);
        assert_eq!(diag.message, "Unterminated raw string literal; expected '\"##'.");
    }
}
