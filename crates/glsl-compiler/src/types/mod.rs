//! Type universe (§3, §4.6): scalar/vector/matrix/array/struct/sampler
//! types, interned per translation unit by canonical name.

pub mod convert;
pub mod kind;

use std::collections::HashMap;

use glsl_core::Atom;

pub use kind::{SamplerDim, ScalarKind};

use crate::ast::NodeId;

/// Handle to an interned [`Type`]. Valid only within the [`TypeContext`]
/// that produced it — types are per-TU, per §5's shared-resource policy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeId(u32);

#[derive(Clone, Debug)]
pub enum TypeShape {
    Error,
    Void,
    Scalar(ScalarKind),
    Vector(ScalarKind, u8),
    Matrix(ScalarKind, u8, u8),
    /// Element type plus outer-to-inner dimension list; `0` denotes unsized.
    Array(TypeId, Vec<u32>),
    Sampler {
        dim: SamplerDim,
        shadow: bool,
        arrayed: bool,
        sampled: ScalarKind,
    },
    /// Nominal: two struct decls never share a `Type` even with identical
    /// members (§3 invariant).
    Struct {
        members: Vec<(Atom, TypeId)>,
        decl: NodeId,
    },
}

#[derive(Clone, Debug)]
pub struct Type {
    pub shape: TypeShape,
    pub canonical_name: String,
}

impl Type {
    pub fn is_error(&self) -> bool {
        matches!(self.shape, TypeShape::Error)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.shape, TypeShape::Scalar(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self.shape, TypeShape::Vector(..))
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self.shape, TypeShape::Matrix(..))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array(..))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.shape, TypeShape::Struct { .. })
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.shape {
            TypeShape::Scalar(k) | TypeShape::Vector(k, _) | TypeShape::Matrix(k, ..) => Some(k),
            _ => None,
        }
    }

    pub fn vector_arity(&self) -> Option<u8> {
        match self.shape {
            TypeShape::Vector(_, n) => Some(n),
            _ => None,
        }
    }
}

/// Owns every `Type` constructed for one translation unit. `get_builtin`
/// resolves a textual keyword (`"vec3"`, `"sampler2D"`, ...) to its `TypeId`
/// without the caller needing to know the shape up front.
///
/// `Clone` lets a preamble's context seed a real translation unit's own
/// `TypeContext` by value (`lib.rs`'s `compile_with_preamble`) rather than
/// borrowing it, since unlike `SymbolTable` it has no separate "preamble
/// level" concept to layer through instead.
#[derive(Clone)]
pub struct TypeContext {
    types: Vec<Type>,
    by_name: HashMap<String, TypeId>,
    array_cache: HashMap<(TypeId, Vec<u32>), TypeId>,
}

impl TypeContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            types: Vec::new(),
            by_name: HashMap::new(),
            array_cache: HashMap::new(),
        };
        ctx.seed_builtins();
        ctx
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    /// Resolve a builtin keyword spelling (e.g. `"vec3"`, `"mat4"`,
    /// `"sampler2D"`, `"void"`) to its `TypeId`.
    pub fn get_builtin(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn error_type(&self) -> TypeId {
        self.by_name["<error>"]
    }

    pub fn void_type(&self) -> TypeId {
        self.by_name["void"]
    }

    pub fn scalar(&self, kind: ScalarKind) -> TypeId {
        self.by_name[kind.printable_name()]
    }

    /// `getArray(elementType, dimList)`: caches by `(element, dims)`.
    /// Constructing an array of an array folds the outer dims onto the
    /// inner array's dims (§4.6).
    pub fn get_array(&mut self, element: TypeId, dims: Vec<u32>) -> TypeId {
        let (element, dims) = match &self.get(element).shape {
            TypeShape::Array(inner_elem, inner_dims) => {
                let mut folded = dims;
                folded.extend(inner_dims.iter().copied());
                (*inner_elem, folded)
            }
            _ => (element, dims),
        };

        let key = (element, dims.clone());
        if let Some(&id) = self.array_cache.get(&key) {
            return id;
        }

        let elem_name = self.get(element).canonical_name.clone();
        let dim_suffix: String = dims
            .iter()
            .map(|d| if *d == 0 { "[]".to_string() } else { format!("[{d}]") })
            .collect();
        let name = format!("{elem_name}{dim_suffix}");

        let id = self.push(Type {
            shape: TypeShape::Array(element, dims.clone()),
            canonical_name: name,
        });
        self.array_cache.insert((element, dims), id);
        id
    }

    /// `createStruct(declNode)`: always a fresh nominal Type.
    pub fn create_struct(&mut self, name: &str, members: Vec<(Atom, TypeId)>, decl: NodeId) -> TypeId {
        self.push(Type {
            shape: TypeShape::Struct { members, decl },
            canonical_name: name.to_owned(),
        })
    }

    /// `isConvertibleTo`: identity; error-to-anything; scalar widening;
    /// component-wise vector lifting at equal arity; matrix-to-double-matrix
    /// at equal shape.
    pub fn is_convertible_to(&self, from: TypeId, to: TypeId) -> bool {
        if from == to {
            return true;
        }
        if self.get(from).is_error() {
            return true;
        }

        match (&self.get(from).shape, &self.get(to).shape) {
            (TypeShape::Scalar(a), TypeShape::Scalar(b)) => convert::is_convertible(*a, *b),
            (TypeShape::Vector(a, n1), TypeShape::Vector(b, n2)) => {
                n1 == n2 && convert::is_convertible(*a, *b)
            }
            (TypeShape::Matrix(a, r1, c1), TypeShape::Matrix(b, r2, c2)) => {
                r1 == r2 && c1 == c2 && convert::is_convertible(*a, *b)
            }
            _ => false,
        }
    }

    /// `hasBetterConversion`: exact match beats any conversion; among two
    /// conversions, the one whose result type is fewer widening steps away
    /// wins. `None` means incomparable (ambiguous).
    pub fn has_better_conversion(&self, from: TypeId, lhs: TypeId, rhs: TypeId) -> Option<bool> {
        if lhs == rhs {
            return None;
        }
        if lhs == from {
            return Some(true);
        }
        if rhs == from {
            return Some(false);
        }

        let from_scalar = self.get(from).scalar_kind()?;
        let lhs_scalar = self.get(lhs).scalar_kind()?;
        let rhs_scalar = self.get(rhs).scalar_kind()?;
        convert::has_better_conversion(from_scalar, lhs_scalar, rhs_scalar)
    }

    fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    fn define_builtin(&mut self, name: &str, shape: TypeShape) -> TypeId {
        let id = self.push(Type {
            shape,
            canonical_name: name.to_owned(),
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    fn seed_builtins(&mut self) {
        self.define_builtin("<error>", TypeShape::Error);
        self.define_builtin("void", TypeShape::Void);

        let scalars = [
            ScalarKind::Bool,
            ScalarKind::Int,
            ScalarKind::UInt,
            ScalarKind::Float,
            ScalarKind::Double,
            ScalarKind::Int8,
            ScalarKind::Int16,
            ScalarKind::Int64,
            ScalarKind::UInt8,
            ScalarKind::UInt16,
            ScalarKind::UInt64,
            ScalarKind::Float16,
        ];
        for kind in scalars {
            self.define_builtin(kind.printable_name(), TypeShape::Scalar(kind));
        }

        let vector_prefixes = [
            (ScalarKind::Bool, "bvec"),
            (ScalarKind::Int, "ivec"),
            (ScalarKind::UInt, "uvec"),
            (ScalarKind::Float, "vec"),
            (ScalarKind::Double, "dvec"),
        ];
        for (kind, prefix) in vector_prefixes {
            for arity in 2u8..=4 {
                self.define_builtin(&format!("{prefix}{arity}"), TypeShape::Vector(kind, arity));
            }
        }

        for kind in [ScalarKind::Float, ScalarKind::Double] {
            let prefix = if kind == ScalarKind::Double { "dmat" } else { "mat" };
            for rows in 2u8..=4 {
                for cols in 2u8..=4 {
                    let name = if rows == cols {
                        format!("{prefix}{rows}")
                    } else {
                        format!("{prefix}{rows}x{cols}")
                    };
                    self.define_builtin(&name, TypeShape::Matrix(kind, rows, cols));
                    if rows == cols {
                        // `matN` and `matNxN` are the same type; register
                        // the square alias too.
                        self.define_builtin(&format!("{prefix}{rows}x{cols}"), TypeShape::Matrix(kind, rows, cols));
                    }
                }
            }
        }

        let samplers: &[(&str, SamplerDim, bool, bool, ScalarKind)] = &[
            ("sampler1D", SamplerDim::D1, false, false, ScalarKind::Float),
            ("sampler2D", SamplerDim::D2, false, false, ScalarKind::Float),
            ("sampler3D", SamplerDim::D3, false, false, ScalarKind::Float),
            ("samplerCube", SamplerDim::Cube, false, false, ScalarKind::Float),
            ("sampler2DShadow", SamplerDim::D2, true, false, ScalarKind::Float),
            ("samplerCubeShadow", SamplerDim::Cube, true, false, ScalarKind::Float),
            ("sampler2DArray", SamplerDim::D2, false, true, ScalarKind::Float),
            ("sampler2DArrayShadow", SamplerDim::D2, true, true, ScalarKind::Float),
            ("isampler2D", SamplerDim::D2, false, false, ScalarKind::Int),
            ("usampler2D", SamplerDim::D2, false, false, ScalarKind::UInt),
        ];
        for &(name, dim, shadow, arrayed, sampled) in samplers {
            self.define_builtin(name, TypeShape::Sampler { dim, shadow, arrayed, sampled });
        }
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let ctx = TypeContext::new();
        let vec3 = ctx.get_builtin("vec3").unwrap();
        assert_eq!(ctx.get(vec3).vector_arity(), Some(3));
    }

    #[test]
    fn array_of_array_folds_dims() {
        let mut ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);
        let inner = ctx.get_array(int_ty, vec![3]);
        let outer = ctx.get_array(inner, vec![4]);
        match &ctx.get(outer).shape {
            TypeShape::Array(elem, dims) => {
                assert_eq!(*elem, int_ty);
                assert_eq!(dims, &vec![4, 3]);
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn array_construction_is_cached_by_element_and_dims() {
        let mut ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);
        let a = ctx.get_array(int_ty, vec![4]);
        let b = ctx.get_array(int_ty, vec![4]);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_struct_decls_are_distinct_types() {
        let mut ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);
        let s1 = ctx.create_struct("S", vec![], NodeId::from_raw(0));
        let s2 = ctx.create_struct("S", vec![], NodeId::from_raw(1));
        assert_ne!(s1, s2);
        let _ = int_ty;
    }

    #[test]
    fn error_converts_to_anything() {
        let ctx = TypeContext::new();
        let error = ctx.error_type();
        let int_ty = ctx.scalar(ScalarKind::Int);
        assert!(ctx.is_convertible_to(error, int_ty));
    }

    #[test]
    fn int_widens_but_float_does_not_narrow() {
        let ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);
        let float_ty = ctx.scalar(ScalarKind::Float);
        assert!(ctx.is_convertible_to(int_ty, float_ty));
        assert!(!ctx.is_convertible_to(float_ty, int_ty));
    }

    #[test]
    fn vectors_lift_only_at_equal_arity() {
        let ctx = TypeContext::new();
        let ivec3 = ctx.get_builtin("ivec3").unwrap();
        let vec3 = ctx.get_builtin("vec3").unwrap();
        let vec4 = ctx.get_builtin("vec4").unwrap();
        assert!(ctx.is_convertible_to(ivec3, vec3));
        assert!(!ctx.is_convertible_to(ivec3, vec4));
    }

    #[test]
    fn exact_match_beats_conversion() {
        let ctx = TypeContext::new();
        let int_ty = ctx.scalar(ScalarKind::Int);
        let float_ty = ctx.scalar(ScalarKind::Float);
        assert_eq!(ctx.has_better_conversion(int_ty, int_ty, float_ty), Some(true));
    }
}
