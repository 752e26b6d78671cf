//! Declaration nodes (§3 "Declaration forms").

use glsl_core::Atom;

use super::aux::{ArraySpec, Initializer, QualType};
use super::{DeclId, StmtId, SyntaxRange};
use crate::types::TypeId;

/// One name bound by a declaration; several declarators can share one
/// `QualType` (`int a, b[4] = {0};`).
#[derive(Clone, Debug)]
pub struct Declarator {
    pub name: Atom,
    pub array_spec: Option<ArraySpec>,
    pub initializer: Option<Initializer>,
    pub resolved_type: TypeId,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockQualifier {
    In,
    Out,
    Uniform,
    Buffer,
}

#[derive(Clone, Debug)]
pub enum DeclKind {
    Variable {
        qual_type: QualType,
        declarators: Vec<Declarator>,
    },
    Struct {
        name: Option<Atom>,
        fields: Vec<DeclId>,
        resolved_type: TypeId,
    },
    /// A member of a `Struct`, distinct from `BlockField` (§9 open question:
    /// unnamed interface-block members need their own node kind since a
    /// struct field and a block field resolve names differently — a block's
    /// members are visible unqualified at the enclosing scope when the block
    /// has no instance name, a struct's members never are).
    StructField {
        qual_type: QualType,
        declarators: Vec<Declarator>,
    },
    InterfaceBlock {
        qualifier: BlockQualifier,
        block_name: Atom,
        members: Vec<DeclId>,
        instance: Option<Declarator>,
    },
    BlockField {
        qual_type: QualType,
        declarators: Vec<Declarator>,
    },
    Function {
        return_type: QualType,
        name: Atom,
        params: Vec<DeclId>,
        body: Option<StmtId>,
        /// Links a forward declaration to its definition (or vice versa);
        /// `None` on the first declaration seen.
        first_decl: Option<DeclId>,
    },
    Param {
        qual_type: QualType,
        name: Option<Atom>,
        array_spec: Option<ArraySpec>,
        resolved_type: TypeId,
    },
    Precision {
        precision: Atom,
        type_name: Atom,
    },
    Empty,
    Error,
}

#[derive(Clone, Debug)]
pub struct Decl {
    pub id: DeclId,
    pub kind: DeclKind,
    pub range: SyntaxRange,
}

impl Decl {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, DeclKind::Error)
    }
}
