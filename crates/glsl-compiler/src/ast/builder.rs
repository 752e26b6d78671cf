//! `AstBuilder`: the sole constructor path for `Expr`/`Stmt`/`Decl` nodes.
//! Types and const-ness are computed *here*, during construction, rather
//! than by a later checking pass (§4.7).

use glsl_core::{Atom, AtomTable};

use super::{
    AssignOp, BinaryOp, ConstValue, DeclId, DeclKind, DeclaratorRef, ExprId, ExprKind,
    MemberAccessKind, Module, StmtId, SyntaxRange, UnaryOp,
};
use crate::diagnostics::{Diagnostics, ExpandedRange};
use crate::lex_context::LexContext;
use crate::symbols::{resolve_overload, OverloadResult, SymbolTable};
use crate::types::{ScalarKind, TypeContext, TypeId};

const SWIZZLE_SETS: [&str; 3] = ["xyzw", "rgba", "stpq"];

pub struct AstBuilder<'m, 'p, 'a> {
    pub module: &'m mut Module,
    pub types: &'m mut TypeContext,
    pub symbols: &'m mut SymbolTable<'p>,
    pub diagnostics: &'m mut Diagnostics,
    pub atoms: &'a AtomTable<'a>,
    lex: &'m LexContext,
}

impl<'m, 'p, 'a> AstBuilder<'m, 'p, 'a> {
    pub fn new(
        module: &'m mut Module,
        types: &'m mut TypeContext,
        symbols: &'m mut SymbolTable<'p>,
        diagnostics: &'m mut Diagnostics,
        atoms: &'a AtomTable<'a>,
        lex: &'m LexContext,
    ) -> Self {
        Self { module, types, symbols, diagnostics, atoms, lex }
    }

    fn error_expr(&mut self, range: SyntaxRange) -> ExprId {
        let error_ty = self.types.error_type();
        self.module.push_expr(ExprKind::Error, range, error_ty, false)
    }

    fn expanded(&self, range: SyntaxRange) -> ExpandedRange {
        self.lex.expanded_range_of(range)
    }

    pub fn build_literal(&mut self, value: ConstValue, ty: TypeId, range: SyntaxRange) -> ExprId {
        self.module.push_expr(ExprKind::Literal(value), range, ty, true)
    }

    /// Unqualified-name lookup; struct/interface-block member access goes
    /// through `build_member_access` instead.
    pub fn build_name_access(&mut self, name: Atom, range: SyntaxRange) -> ExprId {
        let Some(resolved) = self.symbols.find_symbol(name) else {
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::UndeclaredName,
                self.expanded(range),
                format!("undeclared identifier `{}`", self.atoms.resolve(name)),
            );
            let error_ty = self.types.error_type();
            return self.module.push_expr(
                ExprKind::NameAccess { name, resolved: None },
                range,
                error_ty,
                false,
            );
        };

        let (ty, is_const) = declarator_info(self.module, resolved).unwrap_or((self.types.error_type(), false));
        self.module.push_expr(ExprKind::NameAccess { name, resolved: Some(resolved) }, range, ty, is_const)
    }

    /// Handles both struct-field access and swizzle (`v.xyz`), per the
    /// base expression's type.
    pub fn build_member_access(&mut self, base: ExprId, member: Atom, range: SyntaxRange) -> ExprId {
        let base_expr = self.module.expr(base);
        let base_ty = base_expr.ty;
        let base_const = base_expr.is_const;
        let base_type = self.types.get(base_ty).clone();

        if let Some((scalar, arity)) = base_type.scalar_kind().zip(base_type.vector_arity()) {
            return self.build_swizzle(base, member, scalar, arity, base_const, range);
        }

        if let crate::types::TypeShape::Struct { members, .. } = &base_type.shape {
            if let Some((_, field_ty)) = members.iter().find(|(name, _)| *name == member) {
                let field_ty = *field_ty;
                return self.module.push_expr(
                    ExprKind::MemberAccess { base, member, kind: MemberAccessKind::Field },
                    range,
                    field_ty,
                    base_const,
                );
            }
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::MemberNotFound,
                self.expanded(range),
                format!("no member named `{}`", self.atoms.resolve(member)),
            );
            return self.error_expr(range);
        }

        self.diagnostics.error(
            crate::diagnostics::DiagnosticKind::MemberNotFound,
            self.expanded(range),
            "member access on a non-aggregate type",
        );
        self.error_expr(range)
    }

    fn build_swizzle(
        &mut self,
        base: ExprId,
        member: Atom,
        scalar: ScalarKind,
        arity: u8,
        base_const: bool,
        range: SyntaxRange,
    ) -> ExprId {
        let text = self.atoms.resolve(member);
        if text.is_empty() || text.len() > 4 {
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::InvalidSwizzle,
                self.expanded(range),
                "swizzle must name 1 to 4 components",
            );
            return self.error_expr(range);
        }

        let Some(set) = SWIZZLE_SETS.iter().find(|set| text.chars().all(|c| set.contains(c))) else {
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::InvalidSwizzle,
                self.expanded(range),
                "swizzle mixes components from different naming sets",
            );
            return self.error_expr(range);
        };

        for c in text.chars() {
            let idx = set.find(c).unwrap();
            if idx as u8 >= arity {
                self.diagnostics.error(
                    crate::diagnostics::DiagnosticKind::InvalidSwizzle,
                    self.expanded(range),
                    format!("component `{c}` is out of bounds for a {arity}-component vector"),
                );
                return self.error_expr(range);
            }
        }

        let result_ty = if text.len() == 1 {
            self.types.scalar(scalar)
        } else {
            self.types
                .get_builtin(&vector_name(scalar, text.len() as u8))
                .unwrap_or_else(|| self.types.error_type())
        };

        self.module.push_expr(
            ExprKind::MemberAccess { base, member, kind: MemberAccessKind::Swizzle },
            range,
            result_ty,
            base_const,
        )
    }

    pub fn build_index_access(&mut self, base: ExprId, index: ExprId, range: SyntaxRange) -> ExprId {
        let base_ty = self.module.expr(base).ty;
        let base_const = self.module.expr(base).is_const && self.module.expr(index).is_const;
        let result_ty = match &self.types.get(base_ty).shape {
            crate::types::TypeShape::Array(elem, _) => *elem,
            crate::types::TypeShape::Vector(scalar, _) => self.types.scalar(*scalar),
            _ => {
                self.diagnostics.error(
                    crate::diagnostics::DiagnosticKind::NotIndexable,
                    self.expanded(range),
                    "type is not indexable",
                );
                self.types.error_type()
            }
        };
        self.module.push_expr(ExprKind::IndexAccess { base, index }, range, result_ty, base_const)
    }

    pub fn build_unary(&mut self, op: UnaryOp, operand: ExprId, range: SyntaxRange) -> ExprId {
        let operand_expr = self.module.expr(operand);
        let ty = operand_expr.ty;
        let is_const = matches!(op, UnaryOp::Neg | UnaryOp::Not | UnaryOp::BitNot) && operand_expr.is_const;
        self.module.push_expr(ExprKind::Unary { op, operand }, range, ty, is_const)
    }

    /// `.length()` always types as `int` (§4.7 supplement); it's const when
    /// the array's size is fixed at compile time (a vector, matrix, or
    /// sized array), not when applied to a genuinely unsized array.
    pub fn build_length(&mut self, operand: ExprId, range: SyntaxRange) -> ExprId {
        let int_ty = self.types.scalar(ScalarKind::Int);
        let operand_ty = self.module.expr(operand).ty;
        let is_const = match &self.types.get(operand_ty).shape {
            crate::types::TypeShape::Vector(..) | crate::types::TypeShape::Matrix(..) => true,
            crate::types::TypeShape::Array(_, dims) => dims.first() != Some(&0),
            _ => false,
        };
        self.module.push_expr(ExprKind::Length(operand), range, int_ty, is_const)
    }

    /// Binary operator dispatch with implicit-cast insertion: the operand
    /// that needs widening is conceptually wrapped, but since both operands
    /// already carry their own (possibly narrower) `Type`, the *result*
    /// type is simply the common type picked by `hasBetterConversion`.
    pub fn build_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, range: SyntaxRange) -> ExprId {
        let lhs_expr = self.module.expr(lhs);
        let rhs_expr = self.module.expr(rhs);
        let (lhs_ty, lhs_const) = (lhs_expr.ty, lhs_expr.is_const);
        let (rhs_ty, rhs_const) = (rhs_expr.ty, rhs_expr.is_const);

        let is_comparison = matches!(
            op,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::And | BinaryOp::Or
        );

        let Some(common) = self.common_arith_type(lhs_ty, rhs_ty) else {
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::IncompatibleOperands,
                self.expanded(range),
                "operands to binary operator have incompatible types",
            );
            return self.error_expr(range);
        };

        let result_ty = if is_comparison { self.types.scalar(ScalarKind::Bool) } else { common };
        self.module.push_expr(ExprKind::Binary { op, lhs, rhs }, range, result_ty, lhs_const && rhs_const)
    }

    fn common_arith_type(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if a == b {
            return Some(a);
        }
        if self.types.is_convertible_to(a, b) && !self.types.is_convertible_to(b, a) {
            return Some(b);
        }
        if self.types.is_convertible_to(b, a) && !self.types.is_convertible_to(a, b) {
            return Some(a);
        }
        None
    }

    pub fn build_assignment(&mut self, op: AssignOp, lhs: ExprId, rhs: ExprId, range: SyntaxRange) -> ExprId {
        let ty = self.module.expr(lhs).ty;
        let rhs_ty = self.module.expr(rhs).ty;
        if !self.types.is_convertible_to(rhs_ty, ty) {
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::IncompatibleOperands,
                self.expanded(range),
                "right-hand side is not convertible to the assignment target's type",
            );
            return self.error_expr(range);
        }
        self.module.push_expr(ExprKind::Assignment { op, lhs, rhs }, range, ty, false)
    }

    /// Ternary unifies both branches via the same `hasBetterConversion`
    /// machinery used for overload tie-breaks (§4.7 supplement).
    pub fn build_ternary(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId, range: SyntaxRange) -> ExprId {
        let bool_ty = self.types.scalar(ScalarKind::Bool);
        let cond_ty = self.module.expr(cond).ty;
        if !self.types.is_convertible_to(cond_ty, bool_ty) {
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::IncompatibleOperands,
                self.expanded(range),
                "ternary condition must be convertible to bool",
            );
        }

        let then_expr = self.module.expr(then_branch);
        let else_expr = self.module.expr(else_branch);
        let (then_ty, then_const) = (then_expr.ty, then_expr.is_const);
        let (else_ty, else_const) = (else_expr.ty, else_expr.is_const);

        let unified = if then_ty == else_ty {
            Some(then_ty)
        } else {
            match self.types.has_better_conversion(then_ty, then_ty, else_ty) {
                Some(true) => Some(then_ty),
                Some(false) => Some(else_ty),
                None => None,
            }
        };

        let Some(ty) = unified else {
            self.diagnostics.error(
                crate::diagnostics::DiagnosticKind::IncompatibleOperands,
                self.expanded(range),
                "ternary branches do not unify to a common type",
            );
            return self.error_expr(range);
        };

        let cond_const = self.module.expr(cond).is_const;
        self.module.push_expr(
            ExprKind::Ternary { cond, then_branch, else_branch },
            range,
            ty,
            cond_const && then_const && else_const,
        )
    }

    /// Comma operator: types as the rightmost operand; const iff *both*
    /// operands are const, even though only the last one's value survives
    /// (§4.7 supplement).
    pub fn build_comma(&mut self, lhs: ExprId, rhs: ExprId, range: SyntaxRange) -> ExprId {
        let lhs_const = self.module.expr(lhs).is_const;
        let rhs_expr = self.module.expr(rhs);
        let (ty, rhs_const) = (rhs_expr.ty, rhs_expr.is_const);
        self.module.push_expr(ExprKind::Comma { lhs, rhs }, range, ty, lhs_const && rhs_const)
    }

    /// Resolves `callee(args...)` against every visible overload. Falls
    /// back to treating `callee` as a constructor invocation if no function
    /// overload exists but the name resolves to a builtin type.
    pub fn build_call(&mut self, callee: Atom, args: Vec<ExprId>, range: SyntaxRange) -> ExprId {
        let arg_types: Vec<TypeId> = args.iter().map(|&a| self.module.expr(a).ty).collect();
        let args_const = args.iter().all(|&a| self.module.expr(a).is_const);

        let candidate_decls = self.symbols.find_functions(callee);
        if !candidate_decls.is_empty() {
            let candidates: Vec<(DeclId, Vec<TypeId>)> = candidate_decls
                .iter()
                .filter_map(|&id| function_param_types(self.module, id).map(|params| (id, params)))
                .collect();

            return match resolve_overload(self.types, &candidates, &arg_types) {
                OverloadResult::Resolved(decl_id) => {
                    let ty = function_return_type(self.module, decl_id).unwrap_or(self.types.error_type());
                    self.module.push_expr(
                        ExprKind::FunctionCall { callee, args, resolved: Some(decl_id) },
                        range,
                        ty,
                        false,
                    )
                }
                OverloadResult::NoMatch => {
                    self.diagnostics.error(
                        crate::diagnostics::DiagnosticKind::NoViableOverload,
                        self.expanded(range),
                        format!("no matching overload for `{}`", self.atoms.resolve(callee)),
                    );
                    self.error_expr(range)
                }
                OverloadResult::Ambiguous(_) => {
                    self.diagnostics.error(
                        crate::diagnostics::DiagnosticKind::AmbiguousOverload,
                        self.expanded(range),
                        format!("ambiguous call to `{}`", self.atoms.resolve(callee)),
                    );
                    self.error_expr(range)
                }
            };
        }

        if let Some(target_ty) = self.types.get_builtin(self.atoms.resolve(callee)) {
            return self.module.push_expr(ExprKind::ConstructorCall { args }, range, target_ty, args_const);
        }

        self.diagnostics.error(
            crate::diagnostics::DiagnosticKind::UndeclaredName,
            self.expanded(range),
            format!("call to undeclared function `{}`", self.atoms.resolve(callee)),
        );
        self.error_expr(range)
    }

    /// Initializer-list context-typing: `target` drives element conversion;
    /// an unsized array target infers its size from the element count.
    pub fn build_initializer_list(&mut self, target: TypeId, elems: Vec<ExprId>, range: SyntaxRange) -> (ExprId, TypeId) {
        let is_const = elems.iter().all(|&e| self.module.expr(e).is_const);

        let resolved_ty = if let crate::types::TypeShape::Array(elem, dims) = &self.types.get(target).shape {
            if dims.first() == Some(&0) {
                let elem = *elem;
                let mut new_dims = vec![elems.len() as u32];
                new_dims.extend(dims.iter().skip(1).copied());
                self.types.get_array(elem, new_dims)
            } else {
                target
            }
        } else {
            target
        };

        for &e in &elems {
            let elem_ty = self.module.expr(e).ty;
            let expected = match &self.types.get(resolved_ty).shape {
                crate::types::TypeShape::Array(elem, _) => *elem,
                _ => resolved_ty,
            };
            if !self.types.is_convertible_to(elem_ty, expected) {
                self.diagnostics.error(
                    crate::diagnostics::DiagnosticKind::IncompatibleOperands,
                    self.expanded(range),
                    "initializer element is not convertible to the expected type",
                );
            }
        }

        let id = self.module.push_expr(ExprKind::InitializerList(elems), range, resolved_ty, is_const);
        (id, resolved_ty)
    }

    pub fn register_decl(&mut self, kind: DeclKind, range: SyntaxRange) -> DeclId {
        self.module.push_decl(kind, range)
    }

    pub fn register_stmt(&mut self, kind: super::StmtKind, range: SyntaxRange) -> StmtId {
        self.module.push_stmt(kind, range)
    }
}

fn vector_name(scalar: ScalarKind, arity: u8) -> String {
    let prefix = match scalar {
        ScalarKind::Bool => "bvec",
        ScalarKind::Int => "ivec",
        ScalarKind::UInt => "uvec",
        ScalarKind::Double => "dvec",
        _ => "vec",
    };
    format!("{prefix}{arity}")
}

fn declarator_info(module: &Module, r: DeclaratorRef) -> Option<(TypeId, bool)> {
    let decl = module.decl(r.decl);
    match &decl.kind {
        DeclKind::Variable { qual_type, declarators } | DeclKind::StructField { qual_type, declarators } | DeclKind::BlockField { qual_type, declarators } => {
            let d = declarators.get(r.index as usize)?;
            Some((d.resolved_type, qual_type.qualifiers.is_const()))
        }
        DeclKind::Param { resolved_type, qual_type, .. } => Some((*resolved_type, qual_type.qualifiers.is_const())),
        _ => None,
    }
}

fn function_param_types(module: &Module, id: DeclId) -> Option<Vec<TypeId>> {
    match &module.decl(id).kind {
        DeclKind::Function { params, .. } => Some(
            params
                .iter()
                .filter_map(|&p| match &module.decl(p).kind {
                    DeclKind::Param { resolved_type, .. } => Some(*resolved_type),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

fn function_return_type(module: &Module, id: DeclId) -> Option<TypeId> {
    match &module.decl(id).kind {
        DeclKind::Function { return_type, .. } => Some(return_type.resolved),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::aux::{QualType, TypeQualifierSeq};
    use crate::ast::{Declarator, Scalar};
    use crate::lexer::{PpToken, SpelledRange, TokenKind};
    use glsl_core::{Arena, FileId};

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

    fn declare_vec3(module: &mut Module, symbols: &mut SymbolTable, types: &TypeContext, name: Atom) {
        let vec3 = types.get_builtin("vec3").unwrap();
        let qual_type = QualType { qualifiers: TypeQualifierSeq::default(), base_name: name, resolved: vec3 };
        let declarator = Declarator { name, array_spec: None, initializer: None, resolved_type: vec3 };
        let decl_id = module.push_decl(DeclKind::Variable { qual_type, declarators: vec![declarator] }, SyntaxRange::new(0, 1));
        symbols.declare(name, DeclaratorRef { decl: decl_id, index: 0 });
    }

    #[test]
    fn swizzle_chain_narrows_to_scalar() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let v_name = atoms.intern("v");
        let yz = atoms.intern("yz");
        let y = atoms.intern("y");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        declare_vec3(&mut module, &mut symbols, &types, v_name);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let v_expr = builder.build_name_access(v_name, SyntaxRange::new(0, 1));
        let yz_expr = builder.build_member_access(v_expr, yz, SyntaxRange::new(0, 2));
        let y_expr = builder.build_member_access(yz_expr, y, SyntaxRange::new(0, 3));

        assert!(diagnostics.is_empty());
        assert_eq!(module.expr(yz_expr).ty, types.get_builtin("vec2").unwrap());
        assert_eq!(module.expr(y_expr).ty, types.scalar(ScalarKind::Float));
    }

    #[test]
    fn swizzle_out_of_bounds_reports_diagnostic() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let v_name = atoms.intern("v");
        let w = atoms.intern("w");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();
        declare_vec3(&mut module, &mut symbols, &types, v_name);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let v_expr = builder.build_name_access(v_name, SyntaxRange::new(0, 1));
        let result = builder.build_member_access(v_expr, w, SyntaxRange::new(0, 2));

        assert!(module.expr(result).is_error());
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn binary_op_widens_int_to_float() {
        let arena = Arena::new();
        let atoms = AtomTable::new(&arena);
        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let int_ty = types.scalar(ScalarKind::Int);
        let float_ty = types.scalar(ScalarKind::Float);
        let lhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Int, Scalar::Int(1))), SyntaxRange::new(0, 1), int_ty, true);
        let rhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Float, Scalar::Float(2.0))), SyntaxRange::new(1, 2), float_ty, true);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let sum = builder.build_binary(BinaryOp::Add, lhs, rhs, SyntaxRange::new(0, 2));

        assert_eq!(module.expr(sum).ty, float_ty);
        assert!(module.expr(sum).is_const);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ternary_unifies_branches_by_widening() {
        let arena = Arena::new();
        let atoms = AtomTable::new(&arena);
        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let bool_ty = types.scalar(ScalarKind::Bool);
        let int_ty = types.scalar(ScalarKind::Int);
        let float_ty = types.scalar(ScalarKind::Float);
        let cond = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Bool, Scalar::Bool(true))), SyntaxRange::new(0, 1), bool_ty, true);
        let then_e = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Int, Scalar::Int(1))), SyntaxRange::new(1, 2), int_ty, true);
        let else_e = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Float, Scalar::Float(2.0))), SyntaxRange::new(2, 3), float_ty, true);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let result = builder.build_ternary(cond, then_e, else_e, SyntaxRange::new(0, 3));

        assert_eq!(module.expr(result).ty, float_ty);
        assert!(module.expr(result).is_const);
    }

    #[test]
    fn comma_types_as_rightmost_and_requires_both_const() {
        let arena = Arena::new();
        let atoms = AtomTable::new(&arena);
        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let int_ty = types.scalar(ScalarKind::Int);
        let float_ty = types.scalar(ScalarKind::Float);
        let lhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Int, Scalar::Int(1))), SyntaxRange::new(0, 1), int_ty, true);
        let rhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Float, Scalar::Float(2.0))), SyntaxRange::new(1, 2), float_ty, false);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let result = builder.build_comma(lhs, rhs, SyntaxRange::new(0, 2));

        assert_eq!(module.expr(result).ty, float_ty);
        assert!(!module.expr(result).is_const);
    }

    #[test]
    fn struct_field_access_resolves_member_type() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let s_name = atoms.intern("s");
        let a_field = atoms.intern("a");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let int_ty = types.scalar(ScalarKind::Int);
        let struct_decl = module.push_decl(DeclKind::Struct { name: None, fields: vec![], resolved_type: int_ty }, SyntaxRange::new(0, 1));
        let struct_ty = types.create_struct("S", vec![(a_field, int_ty)], crate::ast::NodeId::from(struct_decl));

        let qual_type = QualType { qualifiers: TypeQualifierSeq::default(), base_name: s_name, resolved: struct_ty };
        let declarator = Declarator { name: s_name, array_spec: None, initializer: None, resolved_type: struct_ty };
        let decl_id = module.push_decl(DeclKind::Variable { qual_type, declarators: vec![declarator] }, SyntaxRange::new(0, 1));
        symbols.declare(s_name, DeclaratorRef { decl: decl_id, index: 0 });

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let s_expr = builder.build_name_access(s_name, SyntaxRange::new(0, 1));
        let field_expr = builder.build_member_access(s_expr, a_field, SyntaxRange::new(0, 2));

        assert!(diagnostics.is_empty());
        assert_eq!(module.expr(field_expr).ty, int_ty);
    }

    #[test]
    fn overload_resolution_picks_exact_match() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let f_name = atoms.intern("f");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let int_ty = types.scalar(ScalarKind::Int);
        let float_ty = types.scalar(ScalarKind::Float);

        let int_param_qual = QualType { qualifiers: TypeQualifierSeq::default(), base_name: f_name, resolved: int_ty };
        let int_param = module.push_decl(DeclKind::Param { qual_type: int_param_qual, name: None, array_spec: None, resolved_type: int_ty }, SyntaxRange::new(0, 1));
        let int_overload_return = QualType { qualifiers: TypeQualifierSeq::default(), base_name: f_name, resolved: int_ty };
        let int_overload = module.push_decl(
            DeclKind::Function { return_type: int_overload_return, name: f_name, params: vec![int_param], body: None, first_decl: None },
            SyntaxRange::new(0, 1),
        );

        let float_param_qual = QualType { qualifiers: TypeQualifierSeq::default(), base_name: f_name, resolved: float_ty };
        let float_param = module.push_decl(DeclKind::Param { qual_type: float_param_qual, name: None, array_spec: None, resolved_type: float_ty }, SyntaxRange::new(0, 1));
        let float_overload_return = QualType { qualifiers: TypeQualifierSeq::default(), base_name: f_name, resolved: int_ty };
        let float_overload = module.push_decl(
            DeclKind::Function { return_type: float_overload_return, name: f_name, params: vec![float_param], body: None, first_decl: None },
            SyntaxRange::new(0, 1),
        );

        symbols.declare_function(f_name, int_overload);
        symbols.declare_function(f_name, float_overload);

        let arg = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Int, Scalar::Int(1))), SyntaxRange::new(0, 1), int_ty, true);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let call = builder.build_call(f_name, vec![arg], SyntaxRange::new(0, 2));

        assert!(diagnostics.is_empty());
        match &module.expr(call).kind {
            ExprKind::FunctionCall { resolved: Some(decl), .. } => assert_eq!(*decl, int_overload),
            other => panic!("expected resolved call, got {other:?}"),
        }
    }

    #[test]
    fn assignment_allows_a_convertible_rhs() {
        let arena = Arena::new();
        let atoms = AtomTable::new(&arena);
        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let int_ty = types.scalar(ScalarKind::Int);
        let float_ty = types.scalar(ScalarKind::Float);
        let lhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Float, Scalar::Float(0.0))), SyntaxRange::new(0, 1), float_ty, false);
        let rhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Int, Scalar::Int(1))), SyntaxRange::new(1, 2), int_ty, true);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let result = builder.build_assignment(AssignOp::Assign, lhs, rhs, SyntaxRange::new(0, 2));

        assert!(diagnostics.is_empty());
        assert_eq!(module.expr(result).ty, float_ty);
    }

    #[test]
    fn assignment_rejects_an_inconvertible_rhs() {
        let arena = Arena::new();
        let atoms = AtomTable::new(&arena);
        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let int_ty = types.scalar(ScalarKind::Int);
        let bool_ty = types.scalar(ScalarKind::Bool);
        let lhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Int, Scalar::Int(0))), SyntaxRange::new(0, 1), int_ty, false);
        let rhs = module.push_expr(ExprKind::Literal(ConstValue::scalar(ScalarKind::Bool, Scalar::Bool(true))), SyntaxRange::new(1, 2), bool_ty, true);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let result = builder.build_assignment(AssignOp::Assign, lhs, rhs, SyntaxRange::new(0, 2));

        assert!(diagnostics.has_errors());
        assert!(module.expr(result).is_error());
    }

    #[test]
    fn length_of_a_vector_types_as_const_int() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let v_name = atoms.intern("v");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();
        declare_vec3(&mut module, &mut symbols, &types, v_name);

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let v_expr = builder.build_name_access(v_name, SyntaxRange::new(0, 1));
        let result = builder.build_length(v_expr, SyntaxRange::new(0, 2));

        assert_eq!(module.expr(result).ty, types.scalar(ScalarKind::Int));
        assert!(module.expr(result).is_const);
    }

    #[test]
    fn length_of_an_unsized_array_is_not_const() {
        let arena = Arena::new();
        let mut atoms = AtomTable::new(&arena);
        let a_name = atoms.intern("a");

        let mut module = Module::new();
        let mut types = TypeContext::new();
        let mut symbols = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        let lex = no_lex();

        let int_ty = types.scalar(ScalarKind::Int);
        let unsized_array_ty = types.get_array(int_ty, vec![0]);
        let qual_type = QualType { qualifiers: TypeQualifierSeq::default(), base_name: a_name, resolved: unsized_array_ty };
        let declarator = Declarator { name: a_name, array_spec: None, initializer: None, resolved_type: unsized_array_ty };
        let decl_id = module.push_decl(DeclKind::Variable { qual_type, declarators: vec![declarator] }, SyntaxRange::new(0, 1));
        symbols.declare(a_name, DeclaratorRef { decl: decl_id, index: 0 });

        let mut builder = AstBuilder::new(&mut module, &mut types, &mut symbols, &mut diagnostics, &atoms, &lex);
        let a_expr = builder.build_name_access(a_name, SyntaxRange::new(0, 1));
        let result = builder.build_length(a_expr, SyntaxRange::new(0, 2));

        assert_eq!(module.expr(result).ty, types.scalar(ScalarKind::Int));
        assert!(!module.expr(result).is_const);
    }
}
