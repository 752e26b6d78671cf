//! Statement-validation pass (§4.10). `AstBuilder` resolves names, overloads,
//! and expression types eagerly during parsing, so this pass is deliberately
//! thin: it only validates the handful of checks that need a completed tree
//! rather than a single expression in isolation — a `return`'s type against
//! its enclosing function's declared return type, and a condition's type
//! against `bool`. `break`/`continue`/`case`/`default` placement is already
//! checked by the parser against the live `symbols::LevelKind` stack (see
//! `parser/grammar/stmts.rs`), so there is nothing left to re-derive here.

use crate::ast::{DeclId, DeclKind, Module, StmtId, StmtKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lex_context::LexContext;
use crate::types::{ScalarKind, TypeContext, TypeId};

pub struct Resolver<'m> {
    module: &'m Module,
    types: &'m TypeContext,
    lex: &'m LexContext,
    diagnostics: &'m mut Diagnostics,
}

impl<'m> Resolver<'m> {
    pub fn new(module: &'m Module, types: &'m TypeContext, lex: &'m LexContext, diagnostics: &'m mut Diagnostics) -> Self {
        Self { module, types, lex, diagnostics }
    }

    /// Walks every top-level declaration, recursing into struct fields,
    /// interface blocks, and function bodies.
    pub fn run(&mut self) {
        let top_level = self.module.top_level.clone();
        for decl in top_level {
            self.check_decl(decl);
        }
    }

    fn check_decl(&mut self, id: DeclId) {
        match &self.module.decl(id).kind {
            DeclKind::Function { return_type, body, .. } => {
                if let Some(body) = *body {
                    self.check_stmt(body, Some(return_type.resolved));
                }
            }
            DeclKind::Variable { qual_type, declarators } | DeclKind::StructField { qual_type, declarators } | DeclKind::BlockField { qual_type, declarators } => {
                let is_const = qual_type.qualifiers.is_const();
                for d in declarators {
                    if is_const {
                        self.check_const_initializer(d, self.module.decl(id).range);
                    }
                }
            }
            DeclKind::Struct { fields, .. } => {
                let fields = fields.clone();
                for field in fields {
                    self.check_decl(field);
                }
            }
            DeclKind::InterfaceBlock { members, .. } => {
                let members = members.clone();
                for member in members {
                    self.check_decl(member);
                }
            }
            _ => {}
        }
    }

    fn check_const_initializer(&mut self, d: &crate::ast::Declarator, range: crate::ast::SyntaxRange) {
        let is_const_expr = match &d.initializer {
            Some(crate::ast::aux::Initializer::Expr(e)) => self.module.expr(*e).is_const,
            Some(crate::ast::aux::Initializer::List(_)) => true,
            None => false,
        };
        if !is_const_expr {
            self.diagnostics.error(
                DiagnosticKind::IncompatibleOperands,
                self.lex.expanded_range_of(range),
                "a `const`-qualified declarator needs a constant initializer".to_string(),
            );
        }
    }

    /// `return_type` is `None` only while walking a statement that isn't
    /// (yet) inside a function body — never the case in practice since only
    /// `check_decl`'s `Function` arm calls this, always with `Some`.
    fn check_stmt(&mut self, id: StmtId, return_type: Option<TypeId>) {
        match &self.module.stmt(id).kind {
            StmtKind::Compound(stmts) => {
                let stmts = stmts.clone();
                for s in stmts {
                    self.check_stmt(s, return_type);
                }
            }
            StmtKind::DeclStmt(decl) => self.check_decl(*decl),
            StmtKind::If { cond, then_branch, else_branch } => {
                self.check_condition(*cond);
                self.check_stmt(*then_branch, return_type);
                if let Some(e) = *else_branch {
                    self.check_stmt(e, return_type);
                }
            }
            StmtKind::For { init, cond, body, .. } => {
                if let Some(init) = *init {
                    self.check_stmt(init, return_type);
                }
                if let Some(cond) = *cond {
                    self.check_condition(cond);
                }
                self.check_stmt(*body, return_type);
            }
            StmtKind::While { cond, body } => {
                self.check_condition(*cond);
                self.check_stmt(*body, return_type);
            }
            StmtKind::DoWhile { body, cond } => {
                self.check_stmt(*body, return_type);
                self.check_condition(*cond);
            }
            StmtKind::Switch { body, .. } => self.check_stmt(*body, return_type),
            StmtKind::Return(value) => self.check_return(*value, return_type, self.module.stmt(id).range),
            _ => {}
        }
    }

    fn check_condition(&mut self, expr: crate::ast::ExprId) {
        let ty = self.module.expr(expr).ty;
        let bool_ty = self.types.scalar(ScalarKind::Bool);
        if !self.types.is_convertible_to(ty, bool_ty) {
            self.diagnostics.error(
                DiagnosticKind::NonBoolCondition,
                self.lex.expanded_range_of(self.module.expr(expr).range),
                "condition is not convertible to `bool`".to_string(),
            );
        }
    }

    fn check_return(&mut self, value: Option<crate::ast::ExprId>, return_type: Option<TypeId>, range: crate::ast::SyntaxRange) {
        let Some(return_type) = return_type else { return };
        let void = self.types.void_type();
        match value {
            Some(expr) => {
                let ty = self.module.expr(expr).ty;
                if return_type == void || !self.types.is_convertible_to(ty, return_type) {
                    self.diagnostics.error(
                        DiagnosticKind::NonConvertibleReturn,
                        self.lex.expanded_range_of(range),
                        "returned value is not convertible to the function's return type".to_string(),
                    );
                }
            }
            None => {
                if return_type != void {
                    self.diagnostics.error(
                        DiagnosticKind::NonConvertibleReturn,
                        self.lex.expanded_range_of(range),
                        "non-void function must return a value".to_string(),
                    );
                }
            }
        }
    }
}

/// Convenience entry point mirroring `AstBuilder::new`'s flat argument list.
pub fn resolve(module: &Module, types: &TypeContext, lex: &LexContext, diagnostics: &mut Diagnostics) {
    Resolver::new(module, types, lex, diagnostics).run();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::aux::{Initializer, QualType, StorageQualifier, TypeQualifierSeq};
    use crate::ast::{ConstValue, DeclKind, Declarator, ExprKind, Scalar, StmtKind, SyntaxRange};
    use crate::lexer::{PpToken, SpelledRange, TokenKind};
    use glsl_core::{Arena, AtomTable, FileId};

    fn no_lex() -> LexContext {
        let eof = PpToken {
            kind: TokenKind::Eof,
            name: None,
            file: FileId::default(),
            span: SpelledRange::new(0, 0),
            first_on_line: false,
            has_leading_whitespace: false,
            resolved_value: None,
            invocation: None,
        };
        LexContext::from_pp_tokens(&[eof])
    }

    #[test]
    fn non_constant_initializer_on_const_declarator_is_reported() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let name = atoms.intern("x");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let float_ty = types.scalar(ScalarKind::Float);
        let range = SyntaxRange::new(0, 1);
        let non_const_expr = module.push_expr(ExprKind::Error, range, float_ty, false);

        let mut qualifiers = TypeQualifierSeq::default();
        qualifiers.storage.push(StorageQualifier::Const);
        let qual_type = QualType { qualifiers, base_name: name, resolved: float_ty };
        let declarator = Declarator { name, array_spec: None, initializer: Some(Initializer::Expr(non_const_expr)), resolved_type: float_ty };
        let decl = module.push_decl(DeclKind::Variable { qual_type, declarators: vec![declarator] }, range);
        module.top_level.push(decl);

        resolve(&module, &types, &lex, &mut diagnostics);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn constant_initializer_on_const_declarator_is_accepted() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let name = atoms.intern("x");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let float_ty = types.scalar(ScalarKind::Float);
        let range = SyntaxRange::new(0, 1);
        let literal = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Float, Scalar::Float(1.0))), range, float_ty, true);

        let mut qualifiers = TypeQualifierSeq::default();
        qualifiers.storage.push(StorageQualifier::Const);
        let qual_type = QualType { qualifiers, base_name: name, resolved: float_ty };
        let declarator = Declarator { name, array_spec: None, initializer: Some(Initializer::Expr(literal)), resolved_type: float_ty };
        let decl = module.push_decl(DeclKind::Variable { qual_type, declarators: vec![declarator] }, range);
        module.top_level.push(decl);

        resolve(&module, &types, &lex, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn return_value_must_convert_to_function_return_type() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let fn_name = atoms.intern("f");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let bool_ty = types.scalar(ScalarKind::Bool);
        let int_ty = types.scalar(ScalarKind::Int);
        let range = SyntaxRange::new(0, 1);
        let bad_value = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Bool, Scalar::Bool(true))), range, bool_ty, true);
        let ret_stmt = module.push_stmt(StmtKind::Return(Some(bad_value)), range);
        let body = module.push_stmt(StmtKind::Compound(vec![ret_stmt]), range);

        let return_type = QualType { qualifiers: TypeQualifierSeq::default(), base_name: fn_name, resolved: int_ty };
        let decl = module.push_decl(DeclKind::Function { return_type, name: fn_name, params: vec![], body: Some(body), first_decl: None }, range);
        module.top_level.push(decl);

        resolve(&module, &types, &lex, &mut diagnostics);
        assert!(diagnostics.has_errors());
    }
}
