//! Stacked symbol table (§3 "Symbol table level", §4.8).

pub mod overload;

use indexmap::IndexMap;

use glsl_core::Atom;

use crate::ast::{DeclId, DeclaratorRef};

pub use overload::{resolve_overload, OverloadResult};

/// What kind of scope a level represents, so the resolver can walk the level
/// stack for `break`/`continue`/`case`/`default` placement instead of
/// threading a boolean through every recursive call (§4.8 supplement).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelKind {
    Global,
    Function,
    Block,
    Loop,
    Switch,
}

#[derive(Default)]
struct Level {
    kind: Option<LevelKind>,
    names: IndexMap<Atom, DeclaratorRef>,
    functions: IndexMap<Atom, Vec<DeclId>>,
}

/// Stack of scope levels, with an optional read-only preamble level shared
/// across every TU compiled against the same standard-library symbol table.
pub struct SymbolTable<'p> {
    levels: Vec<Level>,
    preamble: Option<&'p SymbolTable<'p>>,
}

impl<'p> SymbolTable<'p> {
    pub fn new() -> Self {
        Self {
            levels: vec![Level { kind: Some(LevelKind::Global), ..Level::default() }],
            preamble: None,
        }
    }

    pub fn with_preamble(preamble: &'p SymbolTable<'p>) -> Self {
        Self {
            levels: vec![Level { kind: Some(LevelKind::Global), ..Level::default() }],
            preamble: Some(preamble),
        }
    }

    pub fn push_level(&mut self, kind: LevelKind) {
        self.levels.push(Level { kind: Some(kind), ..Level::default() });
    }

    pub fn pop_level(&mut self) {
        debug_assert!(self.levels.len() > 1, "cannot pop the global level");
        self.levels.pop();
    }

    pub fn current_kind(&self) -> LevelKind {
        self.levels.last().and_then(|l| l.kind).unwrap_or(LevelKind::Global)
    }

    /// True if a level with `kind` is reachable without crossing a function
    /// boundary — used by the resolver so `break` inside a nested function
    /// literal (not legal GLSL, but defensive) never escapes its own scope.
    pub fn enclosing_kind_is(&self, kind: LevelKind) -> bool {
        for level in self.levels.iter().rev() {
            match level.kind {
                Some(k) if k == kind => return true,
                Some(LevelKind::Function) => return false,
                _ => {}
            }
        }
        false
    }

    /// Declares `name` in the current level. Returns the previous binding in
    /// *this* level, if any — the caller reports redefinition, since the
    /// symbol table doesn't own the diagnostic sink.
    pub fn declare(&mut self, name: Atom, decl: DeclaratorRef) -> Option<DeclaratorRef> {
        self.levels.last_mut().unwrap().names.insert(name, decl)
    }

    pub fn declare_function(&mut self, name: Atom, decl: DeclId) {
        self.levels.last_mut().unwrap().functions.entry(name).or_default().push(decl);
    }

    pub fn find_symbol(&self, name: Atom) -> Option<DeclaratorRef> {
        for level in self.levels.iter().rev() {
            if let Some(&r) = level.names.get(&name) {
                return Some(r);
            }
        }
        self.preamble.and_then(|p| p.find_symbol(name))
    }

    /// All visible function overloads for `name`, nearest scope first,
    /// falling back to the preamble — source order is preserved within each
    /// level for diagnostic stability (§3).
    pub fn find_functions(&self, name: Atom) -> Vec<DeclId> {
        let mut out = Vec::new();
        for level in self.levels.iter().rev() {
            if let Some(candidates) = level.functions.get(&name) {
                out.extend(candidates.iter().copied());
            }
        }
        if let Some(preamble) = self.preamble {
            out.extend(preamble.find_functions(name));
        }
        out
    }
}

impl Default for SymbolTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glsl_core::{Arena, AtomTable};

    #[test]
    fn lookup_walks_outward_through_levels() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let name = atoms.intern("x");

        let mut table = SymbolTable::new();
        table.declare(name, DeclaratorRef { decl: DeclId::from_raw(0), index: 0 });
        table.push_level(LevelKind::Block);
        assert!(table.find_symbol(name).is_some());
    }

    #[test]
    fn inner_declaration_shadows_outer() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let name = atoms.intern("x");

        let mut table = SymbolTable::new();
        table.declare(name, DeclaratorRef { decl: DeclId::from_raw(0), index: 0 });
        table.push_level(LevelKind::Block);
        table.declare(name, DeclaratorRef { decl: DeclId::from_raw(1), index: 0 });
        assert_eq!(table.find_symbol(name).unwrap().decl, DeclId::from_raw(1));
    }

    #[test]
    fn redeclaration_in_same_level_returns_previous() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let name = atoms.intern("x");

        let mut table = SymbolTable::new();
        table.declare(name, DeclaratorRef { decl: DeclId::from_raw(0), index: 0 });
        let prev = table.declare(name, DeclaratorRef { decl: DeclId::from_raw(1), index: 0 });
        assert_eq!(prev.unwrap().decl, DeclId::from_raw(0));
    }

    #[test]
    fn break_is_visible_only_within_enclosing_loop_not_across_function() {
        let mut table = SymbolTable::new();
        table.push_level(LevelKind::Loop);
        assert!(table.enclosing_kind_is(LevelKind::Loop));
        table.push_level(LevelKind::Function);
        assert!(!table.enclosing_kind_is(LevelKind::Loop));
    }

    #[test]
    fn preamble_symbols_are_visible_but_overridable() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let name = atoms.intern("PI");

        let mut preamble = SymbolTable::new();
        preamble.declare(name, DeclaratorRef { decl: DeclId::from_raw(9), index: 0 });

        let mut tu = SymbolTable::with_preamble(&preamble);
        assert_eq!(tu.find_symbol(name).unwrap().decl, DeclId::from_raw(9));

        tu.declare(name, DeclaratorRef { decl: DeclId::from_raw(1), index: 0 });
        assert_eq!(tu.find_symbol(name).unwrap().decl, DeclId::from_raw(1));
    }
}
