//! Scalar kind enumeration and the sampler/image dimension tags.

/// Every scalar kind GLSL recognizes, including the extension-gated extended
/// widths (§4.6's "extended-width chain").
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
    Double,
    Int8,
    Int16,
    Int64,
    UInt8,
    UInt16,
    UInt64,
    Float16,
}

impl ScalarKind {
    pub fn printable_name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Int8 => "int8_t",
            ScalarKind::Int16 => "int16_t",
            ScalarKind::Int64 => "int64_t",
            ScalarKind::UInt8 => "uint8_t",
            ScalarKind::UInt16 => "uint16_t",
            ScalarKind::UInt64 => "uint64_t",
            ScalarKind::Float16 => "float16_t",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            ScalarKind::Int
                | ScalarKind::UInt
                | ScalarKind::Int8
                | ScalarKind::Int16
                | ScalarKind::Int64
                | ScalarKind::UInt8
                | ScalarKind::UInt16
                | ScalarKind::UInt64
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, ScalarKind::Float | ScalarKind::Double | ScalarKind::Float16)
    }

    /// The extension name that must appear in `CompileConfig::extensions`
    /// for this scalar to be an accepted type name (§4.6's extended-width
    /// chain); `None` for the five types every target accepts unconditionally.
    pub fn required_extension(self) -> Option<&'static str> {
        match self {
            ScalarKind::Int8 | ScalarKind::UInt8 => Some("GL_EXT_shader_explicit_arithmetic_types_int8"),
            ScalarKind::Int16 | ScalarKind::UInt16 => Some("GL_EXT_shader_explicit_arithmetic_types_int16"),
            ScalarKind::Int64 | ScalarKind::UInt64 => Some("GL_EXT_shader_explicit_arithmetic_types_int64"),
            ScalarKind::Float16 => Some("GL_EXT_shader_explicit_arithmetic_types_float16"),
            ScalarKind::Bool | ScalarKind::Int | ScalarKind::UInt | ScalarKind::Float | ScalarKind::Double => None,
        }
    }
}

/// Texture dimensionality for sampler/image types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SamplerDim {
    D1,
    D2,
    D3,
    Cube,
}

impl SamplerDim {
    pub fn printable_name(self) -> &'static str {
        match self {
            SamplerDim::D1 => "1D",
            SamplerDim::D2 => "2D",
            SamplerDim::D3 => "3D",
            SamplerDim::Cube => "Cube",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_vs_floating() {
        assert!(ScalarKind::Int.is_integral());
        assert!(!ScalarKind::Int.is_floating());
        assert!(ScalarKind::Double.is_floating());
        assert!(!ScalarKind::Bool.is_integral());
        assert!(!ScalarKind::Bool.is_floating());
    }

    #[test]
    fn printable_names() {
        assert_eq!(ScalarKind::UInt.printable_name(), "uint");
        assert_eq!(SamplerDim::Cube.printable_name(), "Cube");
    }

    #[test]
    fn core_scalars_need_no_extension() {
        for kind in [ScalarKind::Bool, ScalarKind::Int, ScalarKind::UInt, ScalarKind::Float, ScalarKind::Double] {
            assert_eq!(kind.required_extension(), None);
        }
    }

    #[test]
    fn extended_width_scalars_are_gated_by_extension() {
        assert_eq!(ScalarKind::Int8.required_extension(), Some("GL_EXT_shader_explicit_arithmetic_types_int8"));
        assert_eq!(ScalarKind::UInt8.required_extension(), Some("GL_EXT_shader_explicit_arithmetic_types_int8"));
        assert_eq!(ScalarKind::Int64.required_extension(), Some("GL_EXT_shader_explicit_arithmetic_types_int64"));
        assert_eq!(ScalarKind::Float16.required_extension(), Some("GL_EXT_shader_explicit_arithmetic_types_float16"));
    }
}
