//! Statement nodes (§3, §4.10).

use super::{DeclId, ExprId, StmtId, SyntaxRange};

#[derive(Clone, Debug)]
pub enum StmtKind {
    Compound(Vec<StmtId>),
    DeclStmt(DeclId),
    /// An expression statement; `None` is the bare-`;` empty statement.
    ExprStmt(Option<ExprId>),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        iter: Option<ExprId>,
        body: StmtId,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    Switch {
        value: ExprId,
        body: StmtId,
    },
    Case(ExprId),
    Default,
    Break,
    Continue,
    Return(Option<ExprId>),
    Discard,
    Empty,
    Error,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub id: StmtId,
    pub kind: StmtKind,
    pub range: SyntaxRange,
}

impl Stmt {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, StmtKind::Error)
    }
}
