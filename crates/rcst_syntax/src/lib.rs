//! rcst_syntax: Concrete syntax tree definitions for Rust source.
//!
//! This crate defines the `SyntaxKind` enum, field names, supertypes, the
//! arena-allocated `SyntaxNode` and the `NodeBuilder` the parser uses to
//! assemble trees.

pub mod builder;
pub mod fields;
pub mod supertype;
pub mod syntax_kind;
pub mod tree;
pub mod visitor;

// Re-export key types
pub use builder::NodeBuilder;
pub use fields::FieldName;
pub use supertype::Supertype;
pub use syntax_kind::SyntaxKind;
pub use tree::{Child, NodeFlags, SyntaxNode, SyntaxTree};
pub use visitor::{preorder, walk, Visitor, WalkEvent};
