//! rcst_scanner: context-sensitive lexer for Rust source code.
//!
//! The scanner produces tokens on demand. Each call to `Scanner::scan`
//! receives the set of context-sensitive kinds the grammar accepts at that
//! point, which lets the same characters scan differently depending on
//! context:
//! - lifetimes versus character literals
//! - raw strings with any number of `#`
//! - nested block comments and doc comments
//! - tuple indices versus float literals
//! - literal suffixes

mod char_codes;
mod external;
mod scanner;
mod token;

pub use external::{ExternalScanner, RustExternalScanner};
pub use scanner::{Scanner, ScannerState};
pub use token::{LexicalError, LexicalErrorKind, ScanSet, Token, TokenFlags, TokenPiece};
