//! Dense, append-only storage for design-graph entities.
//!
//! Every entity in the graph lives in an [`Arena`] and is referred to by an
//! opaque ID. Because signals hold references back to the processes that
//! observe them while processes reference the signals they read and write,
//! owning references would form cycles; stable arena indices break them.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque ID types used to key an [`Arena`].
///
/// An ID is a thin wrapper around a `u32` slot index.
pub trait ArenaId: Copy {
    /// Wraps a raw slot index.
    fn from_raw(index: u32) -> Self;

    /// Unwraps the raw slot index.
    fn as_raw(self) -> u32;
}

/// An append-only container indexed by an opaque ID type.
///
/// Entries are never removed or reordered, so an ID stays valid for the
/// lifetime of the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    entries: Vec<T>,
    #[serde(skip)]
    _key: PhantomData<I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            _key: PhantomData,
        }
    }

    /// Appends an entry and returns its freshly minted ID.
    pub fn alloc(&mut self, entry: T) -> I {
        let id = I::from_raw(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    /// Returns the entry behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was minted by a different arena and is out of bounds.
    pub fn get(&self, id: I) -> &T {
        &self.entries[id.as_raw() as usize]
    }

    /// Returns the entry behind `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` was minted by a different arena and is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.entries[id.as_raw() as usize]
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(id, &entry)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (I::from_raw(i as u32), entry))
    }
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SymbolId;

    #[test]
    fn alloc_returns_sequential_ids() {
        let mut arena: Arena<SymbolId, u32> = Arena::new();
        let a = arena.alloc(5);
        let b = arena.alloc(6);
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn index_and_get_agree() {
        let mut arena: Arena<SymbolId, &str> = Arena::new();
        let id = arena.alloc("clk");
        assert_eq!(arena[id], "clk");
        assert_eq!(*arena.get(id), "clk");
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena: Arena<SymbolId, String> = Arena::new();
        let id = arena.alloc("before".to_string());
        arena[id].push_str("/after");
        assert_eq!(arena[id], "before/after");
    }

    #[test]
    fn iter_preserves_allocation_order() {
        let mut arena: Arena<SymbolId, u32> = Arena::new();
        arena.alloc(10);
        arena.alloc(20);
        arena.alloc(30);
        let seen: Vec<(u32, u32)> = arena.iter().map(|(id, v)| (id.as_raw(), *v)).collect();
        assert_eq!(seen, vec![(0, 10), (1, 20), (2, 30)]);
    }

    #[test]
    fn default_is_empty() {
        let arena: Arena<SymbolId, u32> = Arena::default();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn serde_roundtrip_keeps_entries() {
        let mut arena: Arena<SymbolId, String> = Arena::new();
        arena.alloc("a".to_string());
        arena.alloc("b".to_string());
        let json = serde_json::to_string(&arena).unwrap();
        let back: Arena<SymbolId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[SymbolId::from_raw(1)], "b");
    }
}
