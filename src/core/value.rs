//! Decoded field values.

use std::fmt;

use ndarray::{Array, ArrayD, Dimension};

use crate::util::{format_shape, Error, Result, ScalarKind};

/// Arrays with at most this many elements are printed in full.
const DISPLAY_LIMIT: usize = 16;

/// Numeric n-dimensional array with the stored element kind preserved.
#[derive(Clone, Debug, PartialEq)]
pub enum NdArray {
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
}

impl NdArray {
    /// Element kind of the array.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
        }
    }

    /// Shape of the array, outermost axis first.
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Float32(a) => a.shape(),
            Self::Float64(a) => a.shape(),
            Self::Int32(a) => a.shape(),
            Self::Int64(a) => a.shape(),
        }
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn num_elements(&self) -> usize {
        self.shape().iter().product()
    }

    /// Length of the outermost axis (number of rows), 1 for scalars.
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(1)
    }

    /// Check if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.num_elements() == 0
    }

    /// Borrow the array if it is stored as `f64`.
    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Float64(a) => Some(a),
            _ => None,
        }
    }

    /// Copy the array converted to `f64`.
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            Self::Float32(a) => a.mapv(f64::from),
            Self::Float64(a) => a.clone(),
            Self::Int32(a) => a.mapv(f64::from),
            Self::Int64(a) => a.mapv(|v| v as f64),
        }
    }

    /// Elements in logical (row-major) order, converted to `f64`.
    pub fn values_f64(&self) -> Vec<f64> {
        match self {
            Self::Float32(a) => a.iter().map(|&v| f64::from(v)).collect(),
            Self::Float64(a) => a.iter().copied().collect(),
            Self::Int32(a) => a.iter().map(|&v| f64::from(v)).collect(),
            Self::Int64(a) => a.iter().map(|&v| v as f64).collect(),
        }
    }

    /// First element converted to `f64`, if any.
    pub fn first_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(a) => a.iter().next().map(|&v| f64::from(v)),
            Self::Float64(a) => a.iter().next().copied(),
            Self::Int32(a) => a.iter().next().map(|&v| f64::from(v)),
            Self::Int64(a) => a.iter().next().map(|&v| v as f64),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        let data: Vec<serde_json::Value> = match self {
            Self::Int32(a) => a.iter().map(|&v| serde_json::Value::from(v)).collect(),
            Self::Int64(a) => a.iter().map(|&v| serde_json::Value::from(v)).collect(),
            _ => self.values_f64().into_iter().map(serde_json::Value::from).collect(),
        };
        serde_json::json!({
            "kind": self.kind().name(),
            "shape": self.shape(),
            "data": data,
        })
    }
}

macro_rules! impl_from_array {
    ($elem:ty, $variant:ident) => {
        impl<D: Dimension> From<Array<$elem, D>> for NdArray {
            fn from(array: Array<$elem, D>) -> Self {
                Self::$variant(array.into_dyn())
            }
        }
    };
}

impl_from_array!(f32, Float32);
impl_from_array!(f64, Float64);
impl_from_array!(i32, Int32);
impl_from_array!(i64, Int64);

impl fmt::Display for NdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), format_shape(self.shape()))?;
        if self.num_elements() <= DISPLAY_LIMIT {
            let values: Vec<String> = match self {
                Self::Int32(a) => a.iter().map(|v| v.to_string()).collect(),
                Self::Int64(a) => a.iter().map(|v| v.to_string()).collect(),
                _ => self.values_f64().iter().map(|v| v.to_string()).collect(),
            };
            write!(f, " = [{}]", values.join(", "))?;
        }
        Ok(())
    }
}

/// A decoded field value.
///
/// Values are owned copies of what is stored in the container.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Numeric dataset
    Array(NdArray),
    /// String attribute or scalar string dataset
    Text(String),
    /// One-dimensional string dataset
    TextList(Vec<String>),
    /// Floating point scalar attribute
    Float(f64),
    /// Integer scalar attribute
    Int(i64),
}

impl Value {
    /// Short name of the value kind, used in errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Text(_) => "text",
            Self::TextList(_) => "text list",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
        }
    }

    /// Borrow the numeric array, if this is one.
    pub fn as_array(&self) -> Option<&NdArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow the string, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of a scalar or a single-element array.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Array(a) if a.num_elements() == 1 => a.first_f64(),
            _ => None,
        }
    }

    /// Take the numeric array stored under `key`.
    pub fn into_array(self, key: &str) -> Result<NdArray> {
        match self {
            Self::Array(a) => Ok(a),
            other => Err(Error::TypeMismatch {
                key: key.to_string(),
                expected: "array",
                actual: other.kind_name(),
            }),
        }
    }

    /// Take the string stored under `key`.
    pub fn into_text(self, key: &str) -> Result<String> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(Error::TypeMismatch {
                key: key.to_string(),
                expected: "text",
                actual: other.kind_name(),
            }),
        }
    }

    /// JSON rendering for dumps.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Array(a) => a.to_json(),
            Self::Text(s) => serde_json::Value::from(s.as_str()),
            Self::TextList(items) => serde_json::Value::from(items.clone()),
            Self::Float(v) => serde_json::Value::from(*v),
            Self::Int(v) => serde_json::Value::from(*v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(a) => write!(f, "{}", a),
            Self::Text(s) => write!(f, "{:?}", s),
            Self::TextList(items) => write!(f, "{:?}", items),
            Self::Float(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
        }
    }
}

impl From<NdArray> for Value {
    fn from(array: NdArray) -> Self {
        Self::Array(array)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::TextList(items)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}
