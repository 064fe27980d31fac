//! rcst_parser: concrete syntax tree parser for Rust source code.
//!
//! Recursive descent over the context-sensitive scanner, with a
//! table-driven precedence climber for binary operators and a declared
//! list of the few positions where the grammar is locally ambiguous.
//! Every input produces a tree; malformed regions become error and
//! missing nodes and are reported as diagnostics.

mod conflicts;
mod expressions;
mod items;
mod macros;
mod options;
mod parser;
mod patterns;
mod precedence;
mod types;

pub use conflicts::{ConflictDecl, ConflictId, Resolution, CONFLICTS};
pub use macros::FRAGMENT_SPECIFIERS;
pub use options::{OptionsError, ParserOptions};
pub use parser::{parse, Parser};
pub use precedence::{
    infix_operator, postfix_operator, Associativity, OperatorClass, OperatorPrecedence, PrecedenceEntry,
    PRECEDENCE_TABLE,
};
