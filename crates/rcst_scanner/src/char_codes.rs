//! Character classification used by the scanner.

use unicode_xid::UnicodeXID;

/// Check if a character is a line terminator.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Whitespace as defined by the Rust reference (`Pattern_White_Space`).
#[inline]
pub fn is_white_space(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\n'
            | '\r'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{0085}' // next line
            | '\u{200E}' // left-to-right mark
            | '\u{200F}' // right-to-left mark
            | '\u{2028}' // line separator
            | '\u{2029}' // paragraph separator
    )
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic() || (!ch.is_ascii() && ch.is_xid_start())
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric() || (!ch.is_ascii() && ch.is_xid_continue())
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Whether `ch` is a digit of the given radix, or the `_` separator.
#[inline]
pub fn is_radix_digit_or_separator(ch: char, radix: u32) -> bool {
    ch == '_' || ch.is_digit(radix)
}

/// Decode the character starting at byte `offset`.
#[inline]
pub fn char_at(text: &str, offset: usize) -> Option<char> {
    text.get(offset..).and_then(|rest| rest.chars().next())
}

/// The byte offset just past the identifier starting at `offset`, or
/// `offset` itself if no identifier starts there.
pub fn identifier_end(text: &str, offset: usize) -> usize {
    let rest = match text.get(offset..) {
        Some(rest) => rest,
        None => return offset,
    };
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, ch)) if is_identifier_start(ch) => {}
        _ => return offset,
    }
    for (i, ch) in chars {
        if !is_identifier_part(ch) {
            return offset + i;
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_end() {
        assert_eq!(identifier_end("abc def", 0), 3);
        assert_eq!(identifier_end("abc def", 4), 7);
        assert_eq!(identifier_end("1abc", 0), 0);
        assert_eq!(identifier_end("_x1+", 0), 3);
        assert_eq!(identifier_end("été", 0), "été".len());
    }

    #[test]
    fn test_char_at() {
        assert_eq!(char_at("aé", 1), Some('é'));
        assert_eq!(char_at("aé", 2), None);
        assert_eq!(char_at("a", 5), None);
    }
}
