//! The Rust scanner/lexer.
//!
//! The scanner converts source text into tokens on demand. Punctuation,
//! keywords and identifiers are recognized directly; context-sensitive
//! tokens are delegated to an `ExternalScanner` together with the set of
//! kinds the parser currently accepts. Comments are collected as leading
//! trivia of the token that follows them.

use crate::char_codes::*;
use crate::external::{ExternalScanner, RustExternalScanner};
use crate::token::{LexicalErrorKind, ScanSet, Token, TokenFlags};
use rcst_syntax::SyntaxKind;

/// Saved scanner state for lookahead and speculative parsing.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    token: Token,
    leading: Vec<Token>,
}

impl ScannerState {
    /// The start of the token that was current when the state was saved.
    pub fn token_start(&self) -> u32 {
        self.token.range.pos
    }
}

/// The scanner converts Rust source text into tokens.
pub struct Scanner<'s, X: ExternalScanner = RustExternalScanner> {
    /// The source text being scanned.
    text: &'s str,
    /// End of the current token.
    pos: usize,
    /// The current token.
    token: Token,
    /// Comments between the previous token and the current one.
    leading: Vec<Token>,
    external: X,
}

impl<'s> Scanner<'s> {
    /// Create a new scanner for the given source text. Call `scan` to load
    /// the first token.
    pub fn new(text: &'s str) -> Self {
        Self::with_external(text, RustExternalScanner)
    }
}

impl<'s, X: ExternalScanner> Scanner<'s, X> {
    pub fn with_external(text: &'s str, external: X) -> Self {
        Self {
            text,
            pos: 0,
            token: Token::new(SyntaxKind::Unknown, 0, 0),
            leading: Vec::new(),
            external,
        }
    }

    /// Get the full source text.
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Get the current token.
    #[inline]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Get the current token kind.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.token.kind
    }

    /// Get the start position of the current token (after trivia).
    #[inline]
    pub fn token_start(&self) -> usize {
        self.token.range.pos as usize
    }

    /// Get the end position of the current token.
    #[inline]
    pub fn token_end(&self) -> usize {
        self.token.range.end as usize
    }

    /// Get the current token's text.
    #[inline]
    pub fn token_text(&self) -> &'s str {
        self.token.range.slice(self.text)
    }

    /// Comments seen before the current token.
    pub fn leading_trivia(&self) -> &[Token] {
        &self.leading
    }

    /// Take the comments before the current token, leaving none behind.
    pub fn take_leading_trivia(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.leading)
    }

    /// Take the current token, leaving an empty placeholder. The caller is
    /// expected to `scan` next.
    pub fn take_token(&mut self) -> Token {
        let end = self.token_end();
        std::mem::replace(&mut self.token, Token::new(SyntaxKind::Unknown, end, end))
    }

    /// Save the full scanner state for lookahead.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token: self.token.clone(),
            leading: self.leading.clone(),
        }
    }

    /// Restore the full scanner state from a saved state.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token = state.token;
        self.leading = state.leading;
    }

    /// Look ahead: save state, call f, restore state and return the result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token, trying only the context-sensitive kinds in
    /// `valid`, and return its kind.
    pub fn scan(&mut self, valid: ScanSet) -> SyntaxKind {
        self.leading.clear();

        // A suffix must touch the literal it belongs to.
        if valid.contains(ScanSet::LITERAL_SUFFIX) {
            if let Some(token) = self.external.scan(self.text, self.pos, ScanSet::LITERAL_SUFFIX) {
                return self.set_token(token);
            }
        }

        if self.pos == 0 {
            if let Some(token) = self.scan_shebang() {
                return self.set_token(token);
            }
        }

        let line_break = match self.skip_trivia(valid) {
            Ok(line_break) => line_break,
            Err(sentinel) => return self.set_token(sentinel),
        };
        let kind = self.scan_token(valid & !ScanSet::LITERAL_SUFFIX);
        if line_break {
            self.token.flags |= TokenFlags::PRECEDING_LINE_BREAK;
        }
        kind
    }

    /// Scan the current token again from its start with a different valid
    /// set. Leading trivia is kept.
    pub fn rescan(&mut self, valid: ScanSet) -> SyntaxKind {
        let flags = self.token.flags & TokenFlags::PRECEDING_LINE_BREAK;
        self.pos = self.token_start();
        let kind = self.scan_token(valid & !ScanSet::LITERAL_SUFFIX);
        self.token.flags |= flags;
        kind
    }

    /// In binary-operator position, merge a `>` with directly following
    /// `>` and `=` characters into `>>`, `>=` or `>>=`.
    ///
    /// `>` is always scanned alone so that `Vec<Vec<u8>>` closes two
    /// generic lists.
    pub fn rescan_greater_than(&mut self) -> SyntaxKind {
        if self.token.kind != SyntaxKind::Gt {
            return self.token.kind;
        }
        let bytes = self.text.as_bytes();
        let start = self.token_start();
        let (kind, len) = match (bytes.get(start + 1), bytes.get(start + 2)) {
            (Some(b'>'), Some(b'=')) => (SyntaxKind::ShrEq, 3),
            (Some(b'>'), _) => (SyntaxKind::Shr, 2),
            (Some(b'='), _) => (SyntaxKind::GtEq, 2),
            _ => return SyntaxKind::Gt,
        };
        self.resize_token(kind, len);
        kind
    }

    /// Shrink the current compound token to its first part, e.g. `&&` to
    /// `&` or `<<` to `<`. The rest is scanned by the next `scan`.
    pub fn split_token(&mut self, first: SyntaxKind) {
        let len = first.punctuation_text().map_or(1, str::len);
        if len < self.token.len() as usize {
            self.resize_token(first, len);
        }
    }

    fn resize_token(&mut self, kind: SyntaxKind, len: usize) {
        let start = self.token_start();
        let flags = self.token.flags;
        self.token = Token::new(kind, start, start + len).with_flags(flags);
        self.pos = start + len;
    }

    fn set_token(&mut self, token: Token) -> SyntaxKind {
        self.pos = token.range.end as usize;
        self.token = token;
        self.token.kind
    }

    /// `#!` at the very start of the file, unless it opens an inner
    /// attribute.
    fn scan_shebang(&self) -> Option<Token> {
        let bytes = self.text.as_bytes();
        if !bytes.starts_with(b"#!") || bytes.get(2) == Some(&b'[') {
            return None;
        }
        let end = memchr::memchr(b'\n', bytes).unwrap_or(bytes.len());
        Some(Token::new(SyntaxKind::Shebang, 0, end))
    }

    /// Skip whitespace and collect comments. Returns whether a line break
    /// was crossed, or the error sentinel of an unterminated comment.
    fn skip_trivia(&mut self, valid: ScanSet) -> Result<bool, Token> {
        let bytes = self.text.as_bytes();
        let comments = valid & (ScanSet::LINE_COMMENT | ScanSet::BLOCK_COMMENT);
        let mut line_break = false;
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\n' => {
                    line_break = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | 0x0B | 0x0C => self.pos += 1,
                b'/' if !comments.is_empty() => {
                    match self.external.scan(self.text, self.pos, comments) {
                        Some(token) if token.is_trivia() => {
                            self.pos = token.range.end as usize;
                            self.leading.push(token);
                        }
                        Some(sentinel) => return Err(sentinel),
                        None => break,
                    }
                }
                b if b >= 0x80 => match char_at(self.text, self.pos) {
                    Some(ch) if is_white_space(ch) => {
                        line_break |= matches!(ch, '\u{2028}' | '\u{2029}' | '\u{0085}');
                        self.pos += ch.len_utf8();
                    }
                    _ => break,
                },
                _ => break,
            }
        }
        Ok(line_break)
    }

    /// Scan one token at the current position.
    fn scan_token(&mut self, valid: ScanSet) -> SyntaxKind {
        use SyntaxKind::*;

        let start = self.pos;
        let bytes = self.text.as_bytes();
        let Some(&b) = bytes.get(start) else {
            return self.set_token(Token::new(EndOfFile, start, start));
        };
        let peek = |n: usize| bytes.get(start + n).copied();
        let punct = |kind: SyntaxKind, len: usize| Token::new(kind, start, start + len);

        let token = match b {
            b'(' => punct(OpenParen, 1),
            b')' => punct(CloseParen, 1),
            b'[' => punct(OpenBracket, 1),
            b']' => punct(CloseBracket, 1),
            b'{' => punct(OpenBrace, 1),
            b'}' => punct(CloseBrace, 1),
            b',' => punct(Comma, 1),
            b';' => punct(Semicolon, 1),
            b'#' => punct(Pound, 1),
            b'?' => punct(Question, 1),
            b'@' => punct(At, 1),
            b'~' => punct(Tilde, 1),
            b'.' => match (peek(1), peek(2)) {
                (Some(b'.'), Some(b'.')) => punct(DotDotDot, 3),
                (Some(b'.'), Some(b'=')) => punct(DotDotEq, 3),
                (Some(b'.'), _) => punct(DotDot, 2),
                _ => punct(Dot, 1),
            },
            b':' => match peek(1) {
                Some(b':') => punct(ColonColon, 2),
                _ => punct(Colon, 1),
            },
            b'-' => match peek(1) {
                Some(b'>') => punct(Arrow, 2),
                Some(b'=') => punct(MinusEq, 2),
                _ => punct(Minus, 1),
            },
            b'=' => match peek(1) {
                Some(b'>') => punct(FatArrow, 2),
                Some(b'=') => punct(EqEq, 2),
                _ => punct(Eq, 1),
            },
            b'!' => match peek(1) {
                Some(b'=') => punct(BangEq, 2),
                _ => punct(Bang, 1),
            },
            b'<' => match (peek(1), peek(2)) {
                (Some(b'<'), Some(b'=')) => punct(ShlEq, 3),
                (Some(b'<'), _) => punct(Shl, 2),
                (Some(b'='), _) => punct(LtEq, 2),
                _ => punct(Lt, 1),
            },
            b'>' => punct(Gt, 1),
            b'+' => match peek(1) {
                Some(b'=') => punct(PlusEq, 2),
                _ => punct(Plus, 1),
            },
            b'*' => match peek(1) {
                Some(b'=') => punct(StarEq, 2),
                _ => punct(Star, 1),
            },
            b'/' => match peek(1) {
                Some(b'=') => punct(SlashEq, 2),
                _ => punct(Slash, 1),
            },
            b'%' => match peek(1) {
                Some(b'=') => punct(PercentEq, 2),
                _ => punct(Percent, 1),
            },
            b'^' => match peek(1) {
                Some(b'=') => punct(CaretEq, 2),
                _ => punct(Caret, 1),
            },
            b'&' => match peek(1) {
                Some(b'&') => punct(AmpAmp, 2),
                Some(b'=') => punct(AmpEq, 2),
                _ => punct(Amp, 1),
            },
            b'|' => match peek(1) {
                Some(b'|') => punct(PipePipe, 2),
                Some(b'=') => punct(PipeEq, 2),
                _ => punct(Pipe, 1),
            },
            b'$' => {
                let end = identifier_end(self.text, start + 1);
                if end > start + 1 {
                    punct(Metavariable, end - start)
                } else {
                    punct(Dollar, 1)
                }
            }
            b'\'' => self
                .external
                .scan(self.text, start, valid)
                .unwrap_or_else(|| punct(Quote, 1)),
            b'"' | b'0'..=b'9' => self
                .external
                .scan(self.text, start, valid)
                .unwrap_or_else(|| punct(ErrorSentinel, 1)),
            _ => self.scan_identifier_or_prefixed_literal(start, valid),
        };
        self.set_token(token)
    }

    fn scan_identifier_or_prefixed_literal(&self, start: usize, valid: ScanSet) -> Token {
        let bytes = self.text.as_bytes();
        if matches!(bytes[start], b'r' | b'b' | b'c') {
            if let Some(token) = self.external.scan(self.text, start, valid) {
                return token;
            }
            // Raw identifier: `r#type`.
            if bytes[start] == b'r' && bytes.get(start + 1) == Some(&b'#') {
                let end = identifier_end(self.text, start + 2);
                if end > start + 2 {
                    return Token::new(SyntaxKind::Identifier, start, end)
                        .with_flags(TokenFlags::RAW_IDENTIFIER);
                }
            }
        }

        let end = identifier_end(self.text, start);
        if end == start {
            let len = char_at(self.text, start).map_or(1, char::len_utf8);
            return Token::new(SyntaxKind::Unknown, start, start + len).with_error(
                LexicalErrorKind::InvalidCharacter,
                start,
                start + len,
            );
        }
        let text = &self.text[start..end];
        let kind = if text == "_" {
            SyntaxKind::Underscore
        } else {
            SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier)
        };
        Token::new(kind, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greater_than_is_scanned_alone() {
        let mut scanner = Scanner::new(">>= b");
        assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Gt);
        assert_eq!(scanner.rescan_greater_than(), SyntaxKind::ShrEq);
        assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Identifier);
    }

    #[test]
    fn test_split_token() {
        let mut scanner = Scanner::new("&&x");
        assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::AmpAmp);
        scanner.split_token(SyntaxKind::Amp);
        assert_eq!(scanner.kind(), SyntaxKind::Amp);
        assert_eq!(scanner.token_end(), 1);
        assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Amp);
        assert_eq!(scanner.scan(ScanSet::DEFAULT), SyntaxKind::Identifier);
    }

    #[test]
    fn test_look_ahead_restores() {
        let mut scanner = Scanner::new("a /* c */ b");
        scanner.scan(ScanSet::DEFAULT);
        let next = scanner.look_ahead(|s| s.scan(ScanSet::DEFAULT));
        assert_eq!(next, SyntaxKind::Identifier);
        assert_eq!(scanner.token_text(), "a");
        scanner.scan(ScanSet::DEFAULT);
        assert_eq!(scanner.token_text(), "b");
        assert_eq!(scanner.leading_trivia().len(), 1);
    }
}
