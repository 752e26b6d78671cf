//! Expression nodes (§3, §4.7). Every `Expr` carries a deduced `Type` and a
//! const flag computed at construction time — there is no separate
//! type-checking pass over expressions.

use glsl_core::Atom;

use super::const_value::ConstValue;
use super::{DeclId, ExprId, SyntaxRange};
use crate::types::TypeId;

/// The canonical reference to a named entity: a declaring AST node plus the
/// index of the specific declarator within it, since one `int a, b;` decl
/// binds two names (§3 "Declarator view").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DeclaratorRef {
    pub decl: DeclId,
    pub index: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemberAccessKind {
    Field,
    Swizzle,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(ConstValue),
    /// An unqualified name; `resolved` is `None` until the symbol table
    /// finds it (possibly staying `None` forever for an undeclared name).
    NameAccess {
        name: Atom,
        resolved: Option<DeclaratorRef>,
    },
    MemberAccess {
        base: ExprId,
        member: Atom,
        kind: MemberAccessKind,
    },
    IndexAccess {
        base: ExprId,
        index: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Ternary {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Comma {
        lhs: ExprId,
        rhs: ExprId,
    },
    Assignment {
        op: AssignOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    FunctionCall {
        callee: Atom,
        args: Vec<ExprId>,
        resolved: Option<DeclId>,
    },
    ConstructorCall {
        args: Vec<ExprId>,
    },
    InitializerList(Vec<ExprId>),
    /// The `.length()` unary operator on arrays/vectors.
    Length(ExprId),
    Error,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
    pub range: SyntaxRange,
    pub ty: TypeId,
    pub is_const: bool,
}

impl Expr {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }
}
