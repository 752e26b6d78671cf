//! AST-nodes-overlapping-range (§4.11). A plain recursive walk rather than a
//! general-purpose visitor trait: the tree is shallow enough (decl → stmt →
//! expr, each level a fixed handful of shapes) that a trait indirection
//! would cost more than it buys.

use crate::ast::{DeclId, DeclKind, ExprId, ExprKind, Module, StmtId, StmtKind, SyntaxRange};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OverlappingNode {
    Decl(DeclId),
    Stmt(StmtId),
    Expr(ExprId),
}

fn overlaps(a: SyntaxRange, b: SyntaxRange) -> bool {
    a.start < b.end && b.start < a.end
}

/// Every decl/stmt/expr node whose syntax range overlaps `range`, in
/// pre-order. A node whose own range misses `range` is pruned without
/// descending into it, since every child's range is a subset of its
/// parent's.
pub fn nodes_overlapping(module: &Module, range: SyntaxRange) -> Vec<OverlappingNode> {
    let mut out = Vec::new();
    for &decl in &module.top_level {
        visit_decl(module, decl, range, &mut out);
    }
    out
}

fn visit_decl(module: &Module, id: DeclId, range: SyntaxRange, out: &mut Vec<OverlappingNode>) {
    let decl = module.decl(id);
    if !overlaps(decl.range, range) {
        return;
    }
    out.push(OverlappingNode::Decl(id));
    match &decl.kind {
        DeclKind::Function { params, body, .. } => {
            for &param in params {
                visit_decl(module, param, range, out);
            }
            if let Some(body) = *body {
                visit_stmt(module, body, range, out);
            }
        }
        DeclKind::Struct { fields, .. } => {
            for &field in fields {
                visit_decl(module, field, range, out);
            }
        }
        DeclKind::InterfaceBlock { members, .. } => {
            for &member in members {
                visit_decl(module, member, range, out);
            }
        }
        DeclKind::Variable { declarators, .. } | DeclKind::StructField { declarators, .. } | DeclKind::BlockField { declarators, .. } => {
            for d in declarators {
                if let Some(init) = &d.initializer {
                    visit_initializer(module, init, range, out);
                }
            }
        }
        DeclKind::Param { .. } | DeclKind::Precision { .. } | DeclKind::Empty | DeclKind::Error => {}
    }
}

fn visit_initializer(module: &Module, init: &crate::ast::aux::Initializer, range: SyntaxRange, out: &mut Vec<OverlappingNode>) {
    match init {
        crate::ast::aux::Initializer::Expr(e) => visit_expr(module, *e, range, out),
        crate::ast::aux::Initializer::List(list) => {
            for elem in &list.elems {
                visit_initializer(module, elem, range, out);
            }
        }
    }
}

fn visit_stmt(module: &Module, id: StmtId, range: SyntaxRange, out: &mut Vec<OverlappingNode>) {
    let stmt = module.stmt(id);
    if !overlaps(stmt.range, range) {
        return;
    }
    out.push(OverlappingNode::Stmt(id));
    match &stmt.kind {
        StmtKind::Compound(stmts) => {
            for &s in stmts {
                visit_stmt(module, s, range, out);
            }
        }
        StmtKind::DeclStmt(decl) => visit_decl(module, *decl, range, out),
        StmtKind::ExprStmt(Some(expr)) => visit_expr(module, *expr, range, out),
        StmtKind::If { cond, then_branch, else_branch } => {
            visit_expr(module, *cond, range, out);
            visit_stmt(module, *then_branch, range, out);
            if let Some(e) = *else_branch {
                visit_stmt(module, e, range, out);
            }
        }
        StmtKind::For { init, cond, iter, body } => {
            if let Some(init) = *init {
                visit_stmt(module, init, range, out);
            }
            if let Some(cond) = *cond {
                visit_expr(module, cond, range, out);
            }
            if let Some(iter) = *iter {
                visit_expr(module, iter, range, out);
            }
            visit_stmt(module, *body, range, out);
        }
        StmtKind::While { cond, body } => {
            visit_expr(module, *cond, range, out);
            visit_stmt(module, *body, range, out);
        }
        StmtKind::DoWhile { body, cond } => {
            visit_stmt(module, *body, range, out);
            visit_expr(module, *cond, range, out);
        }
        StmtKind::Switch { value, body } => {
            visit_expr(module, *value, range, out);
            visit_stmt(module, *body, range, out);
        }
        StmtKind::Case(value) => visit_expr(module, *value, range, out),
        StmtKind::Return(Some(value)) => visit_expr(module, *value, range, out),
        StmtKind::ExprStmt(None)
        | StmtKind::Return(None)
        | StmtKind::Default
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Discard
        | StmtKind::Empty
        | StmtKind::Error => {}
    }
}

fn visit_expr(module: &Module, id: ExprId, range: SyntaxRange, out: &mut Vec<OverlappingNode>) {
    let expr = module.expr(id);
    if !overlaps(expr.range, range) {
        return;
    }
    out.push(OverlappingNode::Expr(id));
    match &expr.kind {
        ExprKind::MemberAccess { base, .. } => visit_expr(module, *base, range, out),
        ExprKind::IndexAccess { base, index } => {
            visit_expr(module, *base, range, out);
            visit_expr(module, *index, range, out);
        }
        ExprKind::Unary { operand, .. } => visit_expr(module, *operand, range, out),
        ExprKind::Length(inner) => visit_expr(module, *inner, range, out),
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Comma { lhs, rhs } | ExprKind::Assignment { lhs, rhs, .. } => {
            visit_expr(module, *lhs, range, out);
            visit_expr(module, *rhs, range, out);
        }
        ExprKind::Ternary { cond, then_branch, else_branch } => {
            visit_expr(module, *cond, range, out);
            visit_expr(module, *then_branch, range, out);
            visit_expr(module, *else_branch, range, out);
        }
        ExprKind::FunctionCall { args, .. } | ExprKind::ConstructorCall { args } => {
            for &arg in args {
                visit_expr(module, arg, range, out);
            }
        }
        ExprKind::InitializerList(items) => {
            for &item in items {
                visit_expr(module, item, range, out);
            }
        }
        ExprKind::Literal(_) | ExprKind::NameAccess { .. } | ExprKind::Error => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::aux::{QualType, TypeQualifierSeq};
    use crate::ast::{ConstValue, DeclKind, Scalar};
    use crate::types::{ScalarKind, TypeContext};
    use glsl_core::{Arena, AtomTable};

    fn function_decl(module: &mut Module, types: &TypeContext, atoms: &mut AtomTable, body: StmtId, range: SyntaxRange) -> DeclId {
        let name = atoms.intern("f");
        let return_type = QualType { qualifiers: TypeQualifierSeq::default(), base_name: name, resolved: types.void_type() };
        module.push_decl(DeclKind::Function { return_type, name, params: vec![], body: Some(body), first_decl: None }, range)
    }

    #[test]
    fn finds_leaf_expr_inside_a_function_body() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let types = TypeContext::new();
        let mut module = Module::new();

        let lit_range = SyntaxRange::new(5, 6);
        let int_ty = types.scalar(ScalarKind::Int);
        let lit = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Int, Scalar::Int(1))), lit_range, int_ty, true);
        let ret = module.push_stmt(StmtKind::Return(Some(lit)), lit_range);
        let body = module.push_stmt(StmtKind::Compound(vec![ret]), SyntaxRange::new(3, 7));
        let decl = function_decl(&mut module, &types, &mut atoms, body, SyntaxRange::new(0, 8));
        module.top_level.push(decl);

        let found = nodes_overlapping(&module, SyntaxRange::new(5, 6));
        assert!(found.contains(&OverlappingNode::Expr(lit)));
        assert!(found.contains(&OverlappingNode::Stmt(ret)));
        assert!(found.contains(&OverlappingNode::Decl(decl)));
    }

    #[test]
    fn prunes_siblings_outside_the_range() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let types = TypeContext::new();
        let mut module = Module::new();

        let a_range = SyntaxRange::new(0, 1);
        let b_range = SyntaxRange::new(10, 11);
        let a = module.push_stmt(StmtKind::Empty, a_range);
        let b = module.push_stmt(StmtKind::Empty, b_range);
        let body = module.push_stmt(StmtKind::Compound(vec![a, b]), SyntaxRange::new(0, 11));
        let decl = function_decl(&mut module, &types, &mut atoms, body, SyntaxRange::new(0, 11));
        module.top_level.push(decl);

        let found = nodes_overlapping(&module, a_range);
        assert!(found.contains(&OverlappingNode::Stmt(a)));
        assert!(!found.contains(&OverlappingNode::Stmt(b)));
    }
}
