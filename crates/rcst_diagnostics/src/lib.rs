//! rcst_diagnostics: what the scanner and parser report.
//!
//! A parse never fails. Malformed input still yields a complete tree, and
//! each problem becomes a `Diagnostic` with a stable code:
//!
//! - 1xxx: lexical (unterminated literals and comments, bad escapes,
//!   stray characters)
//! - 2xxx: syntactic (expected and unexpected tokens, unbalanced
//!   delimiters, macro fragments, nesting limit, rejected lenient forms)

use std::fmt;

use rcst_core::text::{LineMap, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
        })
    }
}

/// A message template. `{0}`, `{1}`, ... are filled from arguments.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub template: &'static str,
}

impl DiagnosticMessage {
    pub fn is_lexical(&self) -> bool {
        (1000..2000).contains(&self.code)
    }

    /// The template with its placeholders filled.
    pub fn format(&self, args: &[&str]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let arg = after
                .find('}')
                .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));
            match arg {
                Some((index, close)) => {
                    out.push_str(args.get(index).copied().unwrap_or_default());
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub range: Option<TextRange>,
    pub message: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// A diagnostic that points nowhere in particular.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            range: None,
            message: message.format(args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn located(file: &str, range: TextRange, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: Some(file.to_string()),
            range: Some(range),
            ..Self::new(message, args)
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// `file:line:col: error[E2001]: message`.
    pub fn render(&self, line_map: &LineMap) -> String {
        let Some(range) = self.range else {
            return self.to_string();
        };
        format!(
            "{}:{}: {}[E{:04}]: {}",
            self.file.as_deref().unwrap_or("<input>"),
            line_map.line_col(range.pos),
            self.category,
            self.code,
            self.message
        )
    }
}

/// Byte offsets instead of line and column; no source text needed.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.range) {
            (Some(file), Some(range)) => write!(f, "{file}@{}: ", range.pos)?,
            (Some(file), None) => write!(f, "{file}: ")?,
            (None, _) => {}
        }
        write!(f, "{}[E{:04}]: {}", self.category, self.code, self.message)
    }
}

/// The diagnostics of one parse, in report order until sorted.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    items: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Forget everything reported after the first `len`, as after a
    /// discarded speculative parse.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Order by start offset. Reports at the same offset keep their order.
    pub fn sort_by_position(&mut self) {
        self.items
            .sort_by_key(|d| d.range.map_or(0, |range| range.pos));
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

pub mod messages {
    use super::{DiagnosticCategory, DiagnosticMessage};

    macro_rules! message {
        ($code:literal, $category:ident, $template:literal) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::$category,
                template: $template,
            }
        };
    }

    // Lexical
    pub const INVALID_CHARACTER: DiagnosticMessage = message!(1001, Error, "Invalid character '{0}'.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = message!(1002, Error, "Unterminated string literal.");
    pub const UNTERMINATED_RAW_STRING_LITERAL: DiagnosticMessage =
        message!(1003, Error, "Unterminated raw string literal; expected '{0}'.");
    pub const UNTERMINATED_CHARACTER_LITERAL: DiagnosticMessage =
        message!(1004, Error, "Unterminated character literal.");
    pub const UNTERMINATED_BLOCK_COMMENT: DiagnosticMessage =
        message!(1005, Error, "Unterminated block comment; '*/' expected.");
    pub const INVALID_ESCAPE_SEQUENCE: DiagnosticMessage = message!(1006, Error, "Invalid escape sequence '{0}'.");
    pub const DIGITS_EXPECTED_AFTER_0: DiagnosticMessage = message!(1007, Error, "Digits expected after '{0}'.");

    // Syntactic
    pub const _0_EXPECTED: DiagnosticMessage = message!(2001, Error, "'{0}' expected.");
    pub const EXPECTED_0_FOUND_1: DiagnosticMessage = message!(2002, Error, "Expected {0}, found '{1}'.");
    pub const UNEXPECTED_TOKEN_0: DiagnosticMessage = message!(2003, Error, "Unexpected token '{0}'.");
    pub const UNCLOSED_DELIMITER_0: DiagnosticMessage = message!(2004, Error, "Unclosed delimiter '{0}'.");
    pub const MISMATCHED_CLOSING_DELIMITER_0_EXPECTED_1: DiagnosticMessage =
        message!(2005, Error, "Mismatched closing delimiter '{0}'; expected '{1}'.");
    pub const UNKNOWN_FRAGMENT_SPECIFIER_0: DiagnosticMessage =
        message!(2006, Error, "Unknown macro fragment specifier '{0}'.");
    pub const NESTING_LIMIT_OF_0_EXCEEDED: DiagnosticMessage = message!(2007, Error, "Nesting limit of {0} exceeded.");
    pub const REPETITION_OPERATOR_EXPECTED: DiagnosticMessage =
        message!(2008, Error, "Expected one of '*', '+' or '?' after a repetition.");
    pub const ANONYMOUS_PARAMETERS_ARE_DEPRECATED: DiagnosticMessage =
        message!(2009, Warning, "Anonymous parameters are deprecated; add a pattern.");
    pub const ANONYMOUS_PARAMETERS_ARE_NOT_ALLOWED: DiagnosticMessage =
        message!(2010, Error, "Anonymous parameters are not allowed.");
    pub const STATIC_REF_IS_NOT_ALLOWED: DiagnosticMessage = message!(2011, Error, "'static ref' is not allowed.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fills_placeholders() {
        assert_eq!(
            messages::EXPECTED_0_FOUND_1.format(&["a type", "+"]),
            "Expected a type, found '+'."
        );
        assert_eq!(messages::_0_EXPECTED.format(&["{"]), "'{' expected.");
    }

    #[test]
    fn test_display_and_render() {
        let diag = Diagnostic::located("lib.rs", TextRange::new(13, 14), &messages::_0_EXPECTED, &[";"]);
        assert_eq!(diag.to_string(), "lib.rs@13: error[E2001]: ';' expected.");
        let rendered = diag.render(&LineMap::new("fn f() {\n    x\n}"));
        assert_eq!(rendered, "lib.rs:2:5: error[E2001]: ';' expected.");
    }

    #[test]
    fn test_unlocated() {
        let diag = Diagnostic::new(&messages::UNEXPECTED_TOKEN_0, &["}"]);
        assert_eq!(diag.range, None);
        assert_eq!(diag.to_string(), "error[E2003]: Unexpected token '}'.");
        assert!(diag.is_error());
    }

    #[test]
    fn test_lexical_codes() {
        assert!(messages::UNTERMINATED_BLOCK_COMMENT.is_lexical());
        assert!(!messages::_0_EXPECTED.is_lexical());
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(&messages::ANONYMOUS_PARAMETERS_ARE_DEPRECATED, &[]));
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::UNEXPECTED_TOKEN_0, &[")"]));
        assert!(collection.has_errors());
        collection.truncate(1);
        assert!(!collection.has_errors());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_sort_by_position_is_stable() {
        let mut collection = DiagnosticCollection::new();
        for (pos, message) in [(9, &messages::_0_EXPECTED), (2, &messages::UNCLOSED_DELIMITER_0), (9, &messages::UNEXPECTED_TOKEN_0)] {
            collection.add(Diagnostic::located("a.rs", TextRange::empty(pos), message, &["x"]));
        }
        collection.sort_by_position();
        let codes: Vec<u32> = collection.iter().map(|d| d.code).collect();
        assert_eq!(codes, [2004, 2001, 2003]);
    }
}
