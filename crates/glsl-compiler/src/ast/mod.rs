//! The AST node graph (§3, §4.7): three flat, append-only arenas (Decl,
//! Stmt, Expr) addressed by dense typed indices rather than pointers, built
//! exclusively through [`builder::AstBuilder`].

pub mod aux;
pub mod builder;
pub mod const_value;
pub mod decl;
pub mod expr;
pub mod stmt;

pub use const_value::{ConstValue, Scalar};
pub use decl::{Decl, DeclKind, Declarator};
pub use expr::{AssignOp, BinaryOp, DeclaratorRef, Expr, ExprKind, MemberAccessKind, UnaryOp};
pub use stmt::{Stmt, StmtKind};

macro_rules! node_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn from_raw(v: u32) -> Self {
                Self(v)
            }

            #[inline]
            pub fn as_u32(self) -> u32 {
                self.0
            }
        }
    };
}

node_id!(DeclId);
node_id!(StmtId);
node_id!(ExprId);
/// Opaque identity used only for back-references that must name "some AST
/// node" without caring which arena it lives in (e.g. a struct `Type`'s
/// link to the decl that created it).
node_id!(NodeId);

impl From<DeclId> for NodeId {
    fn from(id: DeclId) -> Self {
        NodeId(id.as_u32())
    }
}

/// Half-open `[start, end)` over the token stream (§3 "SyntaxRange").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SyntaxRange {
    pub start: u32,
    pub end: u32,
}

impl SyntaxRange {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "SyntaxRange must be non-decreasing");
        Self { start, end }
    }

    pub fn join(self, other: SyntaxRange) -> SyntaxRange {
        SyntaxRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn contains(self, index: u32) -> bool {
        self.start <= index && index < self.end
    }
}

/// The finished node graph for one translation unit: three parallel arenas
/// plus the id of the root (a synthetic top-level `Compound` stmt listing
/// every top-level decl in source order).
#[derive(Default)]
pub struct Module {
    decls: Vec<Decl>,
    stmts: Vec<Stmt>,
    exprs: Vec<Expr>,
    pub top_level: Vec<DeclId>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.as_u32() as usize]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.as_u32() as usize]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.as_u32() as usize]
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub(crate) fn push_decl(&mut self, kind: DeclKind, range: SyntaxRange) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(Decl { id, kind, range });
        id
    }

    pub(crate) fn push_stmt(&mut self, kind: StmtKind, range: SyntaxRange) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(Stmt { id, kind, range });
        id
    }

    pub(crate) fn push_expr(&mut self, kind: ExprKind, range: SyntaxRange, ty: crate::types::TypeId, is_const: bool) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(Expr { id, kind, range, ty, is_const });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_range_join_widens() {
        let a = SyntaxRange::new(2, 5);
        let b = SyntaxRange::new(4, 9);
        assert_eq!(a.join(b), SyntaxRange::new(2, 9));
    }

    #[test]
    fn syntax_range_contains_is_half_open() {
        let r = SyntaxRange::new(2, 5);
        assert!(r.contains(2));
        assert!(r.contains(4));
        assert!(!r.contains(5));
    }

    #[test]
    fn decl_ids_are_dense() {
        let mut module = Module::new();
        let a = module.push_decl(DeclKind::Empty, SyntaxRange::new(0, 1));
        let b = module.push_decl(DeclKind::Empty, SyntaxRange::new(1, 2));
        assert_eq!(a.as_u32(), 0);
        assert_eq!(b.as_u32(), 1);
        assert_eq!(module.decl_count(), 2);
    }
}
