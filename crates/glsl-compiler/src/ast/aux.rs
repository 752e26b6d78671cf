//! Auxiliary AST nodes: qualified types, array specs, qualifier sequences,
//! and initializers — everything that isn't itself a Decl/Stmt/Expr but
//! hangs off one (§3).

use glsl_core::Atom;

use super::ExprId;
use crate::types::TypeId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StorageQualifier {
    Const,
    In,
    Out,
    InOut,
    Uniform,
    Buffer,
    Shared,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InterpolationQualifier {
    Smooth,
    Flat,
    NoPerspective,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemoryQualifier {
    Coherent,
    Volatile,
    Restrict,
    Readonly,
    Writeonly,
}

/// A parsed qualifier list, collected independent of order the way the
/// grammar allows (`const highp in vec3` vs `in const highp vec3`).
#[derive(Clone, Default, Debug)]
pub struct TypeQualifierSeq {
    pub storage: Vec<StorageQualifier>,
    pub interpolation: Option<InterpolationQualifier>,
    pub memory: Vec<MemoryQualifier>,
    pub precision: Option<Atom>,
    pub layout: Vec<(Atom, Option<i64>)>,
}

impl TypeQualifierSeq {
    pub fn is_const(&self) -> bool {
        self.storage.contains(&StorageQualifier::Const)
    }
}

/// One array dimension; `None` is the unsized `[]` form.
pub type ArrayDim = Option<ExprId>;

#[derive(Clone, Debug)]
pub struct ArraySpec {
    pub dims: Vec<ArrayDim>,
}

impl ArraySpec {
    pub fn is_unsized(&self) -> bool {
        self.dims.iter().any(Option::is_none)
    }
}

/// The declared type surface of a declaration before the builder resolves it
/// to a concrete `TypeId`: a qualifier sequence plus a base-type spelling
/// (builtin keyword atom or struct-decl reference, resolved by the builder).
#[derive(Clone, Debug)]
pub struct QualType {
    pub qualifiers: TypeQualifierSeq,
    pub base_name: Atom,
    pub resolved: TypeId,
}

#[derive(Clone, Debug)]
pub enum Initializer {
    Expr(ExprId),
    List(InitializerList),
}

#[derive(Clone, Debug)]
pub struct InitializerList {
    pub elems: Vec<Initializer>,
}
