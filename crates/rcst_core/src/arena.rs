//! The arena that owns a parsed tree.
//!
//! A tree borrows its arena: nodes, child slices and the copy of the source
//! text all live in one bump allocation and are freed together.

use bumpalo::Bump;

/// Bump storage for the nodes of one or more trees.
///
/// Destructors of arena values never run. Only plain data (kinds, ranges,
/// references into the same arena) belongs here.
#[derive(Default)]
pub struct SyntaxArena {
    bump: Bump,
}

impl SyntaxArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// An arena pre-sized for a source of `text_len` bytes. Trees take
    /// roughly eight times the source size.
    pub fn for_source(text_len: usize) -> Self {
        Self {
            bump: Bump::with_capacity(text_len.saturating_mul(8)),
        }
    }

    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    #[inline]
    pub fn alloc_str(&self, text: &str) -> &str {
        self.bump.alloc_str(text)
    }

    /// Move `vec` into the arena as a slice.
    pub fn alloc_vec<T>(&self, vec: Vec<T>) -> &[T] {
        if vec.is_empty() {
            return &[];
        }
        self.bump.alloc_slice_fill_iter(vec)
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_vec_keeps_order() {
        let arena = SyntaxArena::new();
        assert_eq!(arena.alloc_vec(vec![3, 1, 2]), &[3, 1, 2]);
        let empty: &[u32] = arena.alloc_vec(Vec::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_source_copy_outlives_input() {
        let arena = SyntaxArena::for_source(16);
        let copy = {
            let input = String::from("fn main() {}");
            arena.alloc_str(&input)
        };
        assert_eq!(copy, "fn main() {}");
        assert!(arena.allocated_bytes() > 0);
    }
}
