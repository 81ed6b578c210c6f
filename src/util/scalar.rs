//! Element kinds of stored SOFA arrays.

use std::fmt;

/// Element kind of a decoded numeric array.
///
/// Arrays keep the width they were stored with, narrower integer types are
/// widened to [`ScalarKind::Int32`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ScalarKind {
    /// Signed 32-bit integer (also used for 8/16-bit storage)
    Int32 = 0,
    /// Signed 64-bit integer (also used for unsigned 32/64-bit storage)
    Int64 = 1,
    /// 32-bit floating point
    Float32 = 2,
    /// 64-bit floating point
    Float64 = 3,
}

impl ScalarKind {
    /// Returns the name of this kind as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
