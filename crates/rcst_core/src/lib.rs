//! rcst_core: Core utilities for the rcst Rust syntax parser.
//!
//! Provides byte-offset text ranges, line maps, and the arena that owns
//! every node of a parsed tree.

pub mod arena;
pub mod text;

// Re-export commonly used types
pub use arena::SyntaxArena;
pub use text::{LineCol, LineMap, TextPos, TextRange};
