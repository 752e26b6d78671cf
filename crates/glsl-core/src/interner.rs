//! Atom interning: deduplicated, arena-owned identifier strings.
//!
//! Converts repeated identifier spellings into a cheap integer handle
//! (`Atom`). Comparing two atoms is O(1) integer comparison, and the backing
//! string lives in the translation unit's arena, so resolving an atom never
//! needs a separate owned `String`.

use indexmap::IndexMap;

use crate::arena::Arena;

/// A lightweight handle to an interned identifier string.
///
/// Atoms are ordered by insertion order, not lexicographically; use
/// [`AtomTable::resolve`] if you need the string itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Atom(u32);

impl Atom {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Arena-backed atom table. Deduplicates identifier spellings for one
/// translation unit (or a shared preamble) and hands out [`Atom`] handles.
///
/// Borrows the arena it interns into; strings are never copied again after
/// the first intern of a given spelling.
pub struct AtomTable<'a> {
    arena: &'a Arena,
    map: IndexMap<&'a str, Atom>,
}

impl<'a> AtomTable<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            arena,
            map: IndexMap::new(),
        }
    }

    /// Intern a string, returning its Atom. If the spelling was already
    /// interned, returns the existing Atom without allocating.
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }

        let owned = self.arena.alloc_str(s);
        let atom = Atom(self.map.len() as u32);
        self.map.insert(owned, atom);
        atom
    }

    /// Resolve an Atom back to its string slice.
    ///
    /// # Panics
    /// Panics if the atom was not created by this table.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &'a str {
        self.map
            .get_index(atom.0 as usize)
            .map(|(s, _)| *s)
            .expect("atom not produced by this AtomTable")
    }

    /// Try to resolve an Atom, returning `None` if it's out of range.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<&'a str> {
        self.map.get_index(atom.0 as usize).map(|(s, _)| *s)
    }

    /// Number of interned atoms.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate atoms in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Atom, &'a str)> + '_ {
        self.map.iter().map(|(s, &atom)| (atom, *s))
    }
}

impl std::fmt::Debug for AtomTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomTable").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedupes() {
        let arena = Arena::new();
        let mut table = AtomTable::new(&arena);
        let a = table.intern("foo");
        let b = table.intern("foo");
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn intern_distinguishes() {
        let arena = Arena::new();
        let mut table = AtomTable::new(&arena);
        let a = table.intern("foo");
        let b = table.intern("bar");
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn resolve_roundtrip() {
        let arena = Arena::new();
        let mut table = AtomTable::new(&arena);
        let a = table.intern("hello");
        assert_eq!(table.resolve(a), "hello");
    }

    #[test]
    fn try_resolve_out_of_range() {
        let arena = Arena::new();
        let table = AtomTable::new(&arena);
        assert_eq!(table.try_resolve(Atom(7)), None);
    }

    #[test]
    fn iter_preserves_insertion_order() {
        let arena = Arena::new();
        let mut table = AtomTable::new(&arena);
        table.intern("z");
        table.intern("a");
        table.intern("m");
        let names: Vec<&str> = table.iter().map(|(_, s)| s).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }
}
