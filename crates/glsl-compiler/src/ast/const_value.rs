//! Compile-time constant values (§3's `ConstValue`): a packed (R, C) grid of
//! scalars produced by constant folding during AST construction.

use crate::types::ScalarKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Scalar {
    fn as_f64(self) -> f64 {
        match self {
            Scalar::Bool(b) => b as u8 as f64,
            Scalar::Int(v) => v as f64,
            Scalar::UInt(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }
}

/// `R=C=1` is scalar, `R=1 ∧ C>1` is vector, `R>1 ∧ C>1` is matrix, `R=C=0`
/// is the error constant. Move-only in spirit (we just don't impl `Copy`);
/// `clone()` is available where a genuine duplicate is needed.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstValue {
    kind: ScalarKind,
    rows: u8,
    cols: u8,
    elems: Vec<Scalar>,
}

impl ConstValue {
    pub fn error() -> Self {
        Self {
            kind: ScalarKind::Bool,
            rows: 0,
            cols: 0,
            elems: Vec::new(),
        }
    }

    pub fn scalar(kind: ScalarKind, value: Scalar) -> Self {
        Self {
            kind,
            rows: 1,
            cols: 1,
            elems: vec![value],
        }
    }

    pub fn vector(kind: ScalarKind, elems: Vec<Scalar>) -> Self {
        let cols = elems.len() as u8;
        Self { kind, rows: 1, cols, elems }
    }

    pub fn is_error(&self) -> bool {
        self.rows == 0 && self.cols == 0
    }

    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    pub fn is_vector(&self) -> bool {
        self.rows == 1 && self.cols > 1
    }

    pub fn is_matrix(&self) -> bool {
        self.rows > 1 && self.cols > 1
    }

    pub fn scalar_kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn shape(&self) -> (u8, u8) {
        (self.rows, self.cols)
    }

    pub fn elems(&self) -> &[Scalar] {
        &self.elems
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let [Scalar::Bool(b)] = self.elems[..] {
            Some(b)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.elems.first()? {
            Scalar::Int(v) => Some(*v),
            Scalar::UInt(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Element-wise application; both operands must share shape.
    pub fn zip_map(&self, other: &ConstValue, f: impl Fn(Scalar, Scalar) -> Scalar) -> ConstValue {
        if self.is_error() || other.is_error() || self.shape() != other.shape() {
            return ConstValue::error();
        }
        let elems = self.elems.iter().zip(&other.elems).map(|(&a, &b)| f(a, b)).collect();
        ConstValue {
            kind: self.kind,
            rows: self.rows,
            cols: self.cols,
            elems,
        }
    }

    pub fn map(&self, f: impl Fn(Scalar) -> Scalar) -> ConstValue {
        if self.is_error() {
            return ConstValue::error();
        }
        ConstValue {
            kind: self.kind,
            rows: self.rows,
            cols: self.cols,
            elems: self.elems.iter().map(|&e| f(e)).collect(),
        }
    }

    pub fn cast_to(&self, kind: ScalarKind) -> ConstValue {
        self.map(|s| match kind {
            ScalarKind::Bool => Scalar::Bool(s.as_f64() != 0.0),
            ScalarKind::Int | ScalarKind::Int8 | ScalarKind::Int16 | ScalarKind::Int64 => {
                Scalar::Int(s.as_f64() as i64)
            }
            ScalarKind::UInt | ScalarKind::UInt8 | ScalarKind::UInt16 | ScalarKind::UInt64 => {
                Scalar::UInt(s.as_f64() as u64)
            }
            ScalarKind::Float | ScalarKind::Double | ScalarKind::Float16 => Scalar::Float(s.as_f64()),
        })
        .with_kind(kind)
    }

    fn with_kind(mut self, kind: ScalarKind) -> Self {
        self.kind = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_distinguishable() {
        assert!(ConstValue::error().is_error());
        assert!(!ConstValue::scalar(ScalarKind::Int, Scalar::Int(1)).is_error());
    }

    #[test]
    fn zip_map_adds_scalars() {
        let a = ConstValue::scalar(ScalarKind::Int, Scalar::Int(1));
        let b = ConstValue::scalar(ScalarKind::Int, Scalar::Int(2));
        let sum = a.zip_map(&b, |x, y| match (x, y) {
            (Scalar::Int(x), Scalar::Int(y)) => Scalar::Int(x + y),
            _ => unreachable!(),
        });
        assert_eq!(sum.as_i64(), Some(3));
    }

    #[test]
    fn vector_shape_reported_correctly() {
        let v = ConstValue::vector(ScalarKind::Float, vec![Scalar::Float(1.0), Scalar::Float(2.0)]);
        assert!(v.is_vector());
        assert_eq!(v.shape(), (1, 2));
    }

    #[test]
    fn cast_int_to_float() {
        let i = ConstValue::scalar(ScalarKind::Int, Scalar::Int(3));
        let f = i.cast_to(ScalarKind::Float);
        assert_eq!(f.elems(), &[Scalar::Float(3.0)]);
    }
}
