//! The context-sensitive half of the scanner.
//!
//! Raw strings, lifetimes and char literals, nested and doc comments, numeric
//! literal shapes and literal suffixes cannot be told apart by a plain DFA.
//! They are recognized here, and only when the grammar says the kind is
//! currently acceptable.

use crate::char_codes::*;
use crate::token::{LexicalErrorKind, ScanSet, Token, TokenFlags, TokenPiece};
use memchr::{memchr, memchr2};
use rcst_syntax::SyntaxKind;

/// A pluggable scanner for context-sensitive tokens.
///
/// Implementations must be deterministic: the same text, offset and valid
/// set always produce the same answer. `None` means no permitted kind starts
/// at `offset`.
pub trait ExternalScanner {
    fn scan(&self, text: &str, offset: usize, valid: ScanSet) -> Option<Token>;
}

/// The external scanner for Rust source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustExternalScanner;

impl ExternalScanner for RustExternalScanner {
    fn scan(&self, text: &str, offset: usize, valid: ScanSet) -> Option<Token> {
        let bytes = text.as_bytes();
        let b = *bytes.get(offset)?;

        if valid.contains(ScanSet::LITERAL_SUFFIX) {
            let end = identifier_end(text, offset);
            if end > offset {
                return Some(Token::new(SyntaxKind::LiteralSuffix, offset, end));
            }
        }

        match b {
            b'/' => match bytes.get(offset + 1) {
                Some(b'/') if valid.contains(ScanSet::LINE_COMMENT) => {
                    Some(scan_line_comment(text, offset))
                }
                Some(b'*') if valid.contains(ScanSet::BLOCK_COMMENT) => {
                    Some(scan_block_comment(text, offset))
                }
                _ => None,
            },
            b'\'' => scan_quote(text, offset, valid),
            b'"' if valid.contains(ScanSet::STRING) => {
                Some(scan_string(text, offset, offset, TokenFlags::NONE))
            }
            b'r' if valid.contains(ScanSet::RAW_STRING) => {
                scan_raw_string(text, offset, offset, TokenFlags::NONE)
            }
            b'b' | b'c' => {
                let prefix = if b == b'b' {
                    TokenFlags::BYTE_PREFIX
                } else {
                    TokenFlags::C_PREFIX
                };
                match bytes.get(offset + 1) {
                    Some(b'\'') if b == b'b' && valid.contains(ScanSet::CHAR) => {
                        let token = scan_char(text, offset, offset + 1).unwrap_or_else(|sentinel| sentinel);
                        Some(token.with_flags(prefix))
                    }
                    Some(b'"') if valid.contains(ScanSet::STRING) => {
                        Some(scan_string(text, offset, offset + 1, prefix))
                    }
                    Some(b'r') if valid.contains(ScanSet::RAW_STRING) => {
                        scan_raw_string(text, offset, offset + 1, prefix)
                    }
                    _ => None,
                }
            }
            b'0'..=b'9' if valid.contains(ScanSet::INTEGER) => {
                Some(scan_number(text, offset, valid.contains(ScanSet::FLOAT)))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

fn scan_line_comment(text: &str, start: usize) -> Token {
    let bytes = text.as_bytes();
    let mut end = memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |i| start + i);
    if end > start && bytes[end - 1] == b'\r' {
        end -= 1;
    }
    let token = Token::new(SyntaxKind::LineComment, start, end);
    let (marker, flag) = match (bytes.get(start + 2), bytes.get(start + 3)) {
        (Some(b'/'), Some(b'/')) => return token,
        (Some(b'/'), _) => (SyntaxKind::OuterDocCommentMarker, TokenFlags::OUTER_DOC),
        (Some(b'!'), _) => (SyntaxKind::InnerDocCommentMarker, TokenFlags::INNER_DOC),
        _ => return token,
    };
    let mut pieces = vec![
        TokenPiece::new(SyntaxKind::LineCommentStart, start, start + 2),
        TokenPiece::new(marker, start + 2, start + 3),
    ];
    if end > start + 3 {
        pieces.push(TokenPiece::new(SyntaxKind::DocComment, start + 3, end));
    }
    token.with_flags(flag).with_pieces(pieces)
}

fn scan_block_comment(text: &str, start: usize) -> Token {
    let bytes = text.as_bytes();
    let mut pos = start + 2;
    let mut depth = 1u32;
    loop {
        let Some(i) = memchr2(b'*', b'/', &bytes[pos..]) else {
            return Token::new(SyntaxKind::ErrorSentinel, start, bytes.len())
                .with_flags(TokenFlags::UNTERMINATED)
                .with_error(LexicalErrorKind::UnterminatedBlockComment, start, bytes.len());
        };
        pos += i;
        match (bytes[pos], bytes.get(pos + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                pos += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                pos += 2;
                if depth == 0 {
                    break;
                }
            }
            _ => pos += 1,
        }
    }
    let end = pos;
    let token = Token::new(SyntaxKind::BlockComment, start, end);

    // `/**/` and `/***` are plain comments.
    let (marker, flag) = match (bytes.get(start + 2), bytes.get(start + 3)) {
        (Some(b'*'), Some(b'*' | b'/')) => return token,
        (Some(b'*'), _) => (SyntaxKind::OuterDocCommentMarker, TokenFlags::OUTER_DOC),
        (Some(b'!'), _) => (SyntaxKind::InnerDocCommentMarker, TokenFlags::INNER_DOC),
        _ => return token,
    };
    let mut pieces = vec![
        TokenPiece::new(SyntaxKind::BlockCommentStart, start, start + 2),
        TokenPiece::new(marker, start + 2, start + 3),
    ];
    if end - 2 > start + 3 {
        pieces.push(TokenPiece::new(SyntaxKind::DocComment, start + 3, end - 2));
    }
    pieces.push(TokenPiece::new(SyntaxKind::BlockCommentEnd, end - 2, end));
    token.with_flags(flag).with_pieces(pieces)
}

// ============================================================================
// Lifetimes and character literals
// ============================================================================

fn scan_quote(text: &str, offset: usize, valid: ScanSet) -> Option<Token> {
    let lifetime_ok = valid.contains(ScanSet::LIFETIME);
    let char_ok = valid.contains(ScanSet::CHAR);
    let quote = || Token::new(SyntaxKind::Quote, offset, offset + 1);

    let next = char_at(text, offset + 1);
    let starts_identifier = next.is_some_and(is_identifier_start);
    if starts_identifier && lifetime_ok {
        let ident_end = identifier_end(text, offset + 1);
        let closes = text.as_bytes().get(ident_end) == Some(&b'\'');
        if !closes || &text[offset + 1..ident_end] == "static" {
            return Some(quote());
        }
    }
    if !char_ok {
        return lifetime_ok.then(quote);
    }
    match scan_char(text, offset, offset) {
        Ok(token) => Some(token),
        // `'ab'` is not a char literal; read it as a lifetime.
        Err(_) if starts_identifier && lifetime_ok => Some(quote()),
        Err(sentinel) => Some(sentinel),
    }
}

/// Scan a char literal whose opening quote is at `quote`. `start` includes
/// any `b` prefix. On failure the error-sentinel token is returned as `Err`.
fn scan_char(text: &str, start: usize, quote: usize) -> Result<Token, Token> {
    let bytes = text.as_bytes();
    let mut pieces = vec![TokenPiece::new(SyntaxKind::CharStart, start, quote + 1)];
    let mut errors = Vec::new();
    let mut pos = quote + 1;
    match char_at(text, pos) {
        Some('\\') => {
            let (end, ok) = scan_escape(text, pos, false);
            if ok {
                pieces.push(TokenPiece::new(SyntaxKind::EscapeSequence, pos, end));
            } else {
                pieces.push(TokenPiece::new(SyntaxKind::ErrorSentinel, pos, end));
                errors.push((pos, end));
            }
            pos = end;
        }
        Some(ch) if ch != '\'' && !is_line_break(ch) => {
            pieces.push(TokenPiece::new(SyntaxKind::CharContent, pos, pos + ch.len_utf8()));
            pos += ch.len_utf8();
        }
        _ => {}
    }
    if pieces.len() == 2 && bytes.get(pos) == Some(&b'\'') {
        pieces.push(TokenPiece::new(SyntaxKind::CharEnd, pos, pos + 1));
        let mut token = Token::new(SyntaxKind::CharToken, start, pos + 1).with_pieces(pieces);
        for (p, e) in errors {
            token = token.with_error(LexicalErrorKind::InvalidEscape, p, e);
        }
        return Ok(token);
    }
    Err(Token::new(SyntaxKind::ErrorSentinel, start, pos)
        .with_flags(TokenFlags::UNTERMINATED)
        .with_error(LexicalErrorKind::UnterminatedChar, start, pos))
}

// ============================================================================
// Strings
// ============================================================================

/// Scan an escape sequence starting at the backslash at `pos`. Returns the
/// end offset and whether the escape is valid.
fn scan_escape(text: &str, pos: usize, in_string: bool) -> (usize, bool) {
    let bytes = text.as_bytes();
    match bytes.get(pos + 1) {
        Some(b'n' | b'r' | b't' | b'\\' | b'0' | b'\'' | b'"') => (pos + 2, true),
        Some(b'x') => {
            let digits = bytes[pos + 2..]
                .iter()
                .take(2)
                .take_while(|b| b.is_ascii_hexdigit())
                .count();
            (pos + 2 + digits, digits == 2)
        }
        Some(b'u') => {
            if bytes.get(pos + 2) != Some(&b'{') {
                return (pos + 2, false);
            }
            let mut end = pos + 3;
            while end < bytes.len() && (bytes[end].is_ascii_hexdigit() || bytes[end] == b'_') {
                end += 1;
            }
            let digits = end - (pos + 3);
            if bytes.get(end) == Some(&b'}') {
                (end + 1, (1..=6).contains(&digits))
            } else {
                (end, false)
            }
        }
        // Line continuation: the newline and leading whitespace of the next
        // line are skipped.
        Some(b'\n' | b'\r') if in_string => {
            let mut end = pos + 1;
            while let Some(ch) = char_at(text, end) {
                if !is_white_space(ch) {
                    break;
                }
                end += ch.len_utf8();
            }
            (end, true)
        }
        Some(_) => {
            let len = char_at(text, pos + 1).map_or(1, char::len_utf8);
            (pos + 1 + len, false)
        }
        None => (pos + 1, false),
    }
}

/// Scan a quoted string whose opening `"` is at `quote`. `start` includes
/// any `b`/`c` prefix.
fn scan_string(text: &str, start: usize, quote: usize, flags: TokenFlags) -> Token {
    let bytes = text.as_bytes();
    let mut pieces = vec![TokenPiece::new(SyntaxKind::StringStart, start, quote + 1)];
    let mut invalid = Vec::new();
    let mut pos = quote + 1;
    let mut content_start = pos;
    loop {
        let Some(i) = memchr2(b'"', b'\\', &bytes[pos..]) else {
            return Token::new(SyntaxKind::ErrorSentinel, start, bytes.len())
                .with_flags(flags | TokenFlags::UNTERMINATED)
                .with_error(LexicalErrorKind::UnterminatedString, start, bytes.len());
        };
        pos += i;
        if pos > content_start {
            pieces.push(TokenPiece::new(SyntaxKind::StringContent, content_start, pos));
        }
        if bytes[pos] == b'"' {
            pieces.push(TokenPiece::new(SyntaxKind::StringEnd, pos, pos + 1));
            let mut token = Token::new(SyntaxKind::StringToken, start, pos + 1)
                .with_flags(flags)
                .with_pieces(pieces);
            for (p, e) in invalid {
                token = token.with_error(LexicalErrorKind::InvalidEscape, p, e);
            }
            return token;
        }
        let (end, ok) = scan_escape(text, pos, true);
        let end = end.min(bytes.len());
        if ok {
            pieces.push(TokenPiece::new(SyntaxKind::EscapeSequence, pos, end));
        } else {
            pieces.push(TokenPiece::new(SyntaxKind::ErrorSentinel, pos, end));
            invalid.push((pos, end));
        }
        pos = end;
        content_start = pos;
    }
}

/// Scan a raw string. `r` is the offset of the `r`; `start` includes any
/// `b`/`c` prefix. Returns `None` when no `"` follows the `#` run.
fn scan_raw_string(text: &str, start: usize, r: usize, flags: TokenFlags) -> Option<Token> {
    let bytes = text.as_bytes();
    let mut pos = r + 1;
    while bytes.get(pos) == Some(&b'#') {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b'"') {
        return None;
    }
    let hashes = pos - (r + 1);
    let open_end = pos + 1;

    let mut search = open_end;
    while let Some(i) = memchr(b'"', &bytes[search..]) {
        let quote = search + i;
        let close_end = quote + 1 + hashes;
        if close_end <= bytes.len() && bytes[quote + 1..close_end].iter().all(|&b| b == b'#') {
            let mut pieces = vec![TokenPiece::new(SyntaxKind::RawStringStart, start, open_end)];
            if quote > open_end {
                pieces.push(TokenPiece::new(SyntaxKind::StringContent, open_end, quote));
            }
            pieces.push(TokenPiece::new(SyntaxKind::RawStringEnd, quote, close_end));
            return Some(
                Token::new(SyntaxKind::RawStringToken, start, close_end)
                    .with_flags(flags)
                    .with_pieces(pieces),
            );
        }
        search = quote + 1;
    }
    Some(
        Token::new(SyntaxKind::ErrorSentinel, start, bytes.len())
            .with_flags(flags | TokenFlags::UNTERMINATED)
            .with_error(
                LexicalErrorKind::UnterminatedRawString {
                    hashes: hashes as u32,
                },
                start,
                bytes.len(),
            ),
    )
}

// ============================================================================
// Numbers
// ============================================================================

fn skip_digits(bytes: &[u8], mut pos: usize, radix: u32) -> usize {
    while pos < bytes.len() && is_radix_digit_or_separator(bytes[pos] as char, radix) {
        pos += 1;
    }
    pos
}

/// Scan an integer or float literal, without its suffix.
///
/// A `.` is part of the number only when neither another `.` nor an
/// identifier follows it, so `1..2`, `1.max(2)` and `t.0.1` keep their dots.
/// When `float_ok` is false only the integer part is scanned.
///
/// Numbers with a radix prefix, a decimal point or an exponent carry those
/// parts as pieces. Plain decimal integers have none.
fn scan_number(text: &str, start: usize, float_ok: bool) -> Token {
    let bytes = text.as_bytes();
    let radix = match (bytes[start], bytes.get(start + 1)) {
        (b'0', Some(b'x')) => Some((16, TokenFlags::HEX_SPECIFIER)),
        (b'0', Some(b'o')) => Some((8, TokenFlags::OCTAL_SPECIFIER)),
        (b'0', Some(b'b')) => Some((2, TokenFlags::BINARY_SPECIFIER)),
        _ => None,
    };
    if let Some((radix, flag)) = radix {
        let end = skip_digits(bytes, start + 2, radix);
        let mut pieces = vec![TokenPiece::new(SyntaxKind::RadixPrefix, start, start + 2)];
        if end > start + 2 {
            pieces.push(TokenPiece::new(SyntaxKind::Digits, start + 2, end));
        }
        let token = Token::new(SyntaxKind::IntegerToken, start, end)
            .with_flags(flag)
            .with_pieces(pieces);
        let has_digit = bytes[start + 2..end].iter().any(|&b| b != b'_');
        return if has_digit {
            token
        } else {
            token.with_error(LexicalErrorKind::DigitsExpected, start, end)
        };
    }

    let mut pos = skip_digits(bytes, start, 10);
    let mut pieces = vec![TokenPiece::new(SyntaxKind::Digits, start, pos)];
    let mut flags = TokenFlags::NONE;
    if float_ok {
        if bytes.get(pos) == Some(&b'.') {
            let after = char_at(text, pos + 1);
            let absorbs = match after {
                Some('.') => false,
                Some(ch) => !is_identifier_start(ch),
                None => true,
            };
            if absorbs {
                flags |= TokenFlags::FRACTION;
                pieces.push(TokenPiece::new(SyntaxKind::DecimalPoint, pos, pos + 1));
                pos += 1;
                if after.is_some_and(is_digit) {
                    let end = skip_digits(bytes, pos, 10);
                    pieces.push(TokenPiece::new(SyntaxKind::Digits, pos, end));
                    pos = end;
                }
            }
        }
        // An exponent needs at least one digit, otherwise the `e` starts a
        // suffix.
        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            let mut exp = pos + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let digits_end = skip_digits(bytes, exp, 10);
            if bytes[exp..digits_end].iter().any(u8::is_ascii_digit) {
                flags |= TokenFlags::SCIENTIFIC;
                pieces.push(TokenPiece::new(SyntaxKind::Exponent, pos, digits_end));
                pos = digits_end;
            }
        }
    }
    if flags.is_empty() {
        return Token::new(SyntaxKind::IntegerToken, start, pos);
    }
    Token::new(SyntaxKind::FloatToken, start, pos)
        .with_flags(flags)
        .with_pieces(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str, valid: ScanSet) -> Option<Token> {
        RustExternalScanner.scan(text, 0, valid)
    }

    #[test]
    fn test_number_shapes() {
        let t = scan("1.5e10", ScanSet::DEFAULT).unwrap();
        assert_eq!(t.kind, SyntaxKind::FloatToken);
        assert_eq!(t.len(), 6);
        assert!(t.flags.contains(TokenFlags::FRACTION | TokenFlags::SCIENTIFIC));

        let t = scan("1.max(2)", ScanSet::DEFAULT).unwrap();
        assert_eq!((t.kind, t.len()), (SyntaxKind::IntegerToken, 1));

        let t = scan("1..2", ScanSet::DEFAULT).unwrap();
        assert_eq!((t.kind, t.len()), (SyntaxKind::IntegerToken, 1));

        let t = scan("0.1", ScanSet::TUPLE_INDEX).unwrap();
        assert_eq!((t.kind, t.len()), (SyntaxKind::IntegerToken, 1));

        let t = scan("0xffu8", ScanSet::DEFAULT).unwrap();
        assert_eq!(t.len(), 4);
        assert!(t.flags.contains(TokenFlags::HEX_SPECIFIER));

        let t = scan("1f32", ScanSet::DEFAULT).unwrap();
        assert_eq!((t.kind, t.len()), (SyntaxKind::IntegerToken, 1));

        let t = scan("0x", ScanSet::DEFAULT).unwrap();
        assert_eq!(t.errors[0].kind, LexicalErrorKind::DigitsExpected);
        assert_eq!(t.pieces, vec![TokenPiece::new(SyntaxKind::RadixPrefix, 0, 2)]);
    }

    #[test]
    fn test_number_pieces() {
        let kinds = |text: &str| -> Vec<(SyntaxKind, usize, usize)> {
            let t = scan(text, ScanSet::DEFAULT).unwrap();
            t.pieces.iter().map(|p| (p.kind, p.range.pos as usize, p.range.end as usize)).collect()
        };
        use SyntaxKind::*;
        assert_eq!(kinds("0x1F_u8"), vec![(RadixPrefix, 0, 2), (Digits, 2, 5)]);
        assert_eq!(kinds("1_000.25e-3"), vec![(Digits, 0, 5), (DecimalPoint, 5, 6), (Digits, 6, 8), (Exponent, 8, 11)]);
        assert_eq!(kinds("2. "), vec![(Digits, 0, 1), (DecimalPoint, 1, 2)]);
        assert_eq!(kinds("6E4"), vec![(Digits, 0, 1), (Exponent, 1, 3)]);
        assert!(kinds("42").is_empty());
        assert!(kinds("1e").is_empty());
    }

    #[test]
    fn test_suffix_only_when_valid() {
        assert_eq!(scan("u32", ScanSet::DEFAULT), None);
        let t = scan("u32 ", ScanSet::AFTER_LITERAL).unwrap();
        assert_eq!((t.kind, t.len()), (SyntaxKind::LiteralSuffix, 3));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(scan_escape(r"\u{1F600}", 0, true), (9, true));
        assert_eq!(scan_escape(r"\x7f", 0, true), (4, true));
        assert_eq!(scan_escape(r"\q", 0, true), (2, false));
        assert_eq!(scan_escape("\\\n   x", 0, true), (5, true));
    }
}
