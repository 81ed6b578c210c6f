//! HDF5 container backed by libhdf5 (the `hdf5` crate).
//!
//! SOFA files are netCDF-4 files: every SOFA variable is a dataset in the
//! root group, global attributes are root attributes, and variable
//! attributes (`Units`, `Type`, ...) hang off the datasets.
//!
//! Strings come in several layouts. netCDF writes text attributes as
//! fixed-length ASCII and `char` variables (`ReceiverDescriptions`, ...) as
//! arrays of one-byte strings whose last axis holds the characters of each
//! string. Files written through h5py or the HDF5 API directly may use
//! variable-length or UTF-8 strings. All of these decode to `Text` or
//! `TextList`.

use std::fmt::Display;
use std::path::Path;

use hdf5::types::{
    FixedAscii, FixedUnicode, FloatSize, H5Type, IntSize, TypeDescriptor, VarLenAscii,
    VarLenUnicode,
};
use hdf5::File;
use tracing::trace;

use crate::core::{Container, NdArray, Value};
use crate::util::{Error, Result};

/// Capacity of the in-memory buffer fixed-length strings are converted into.
/// Longer stored strings are rejected.
const TEXT_CAPACITY: usize = 8192;

fn h5err(e: hdf5::Error) -> Error {
    Error::container(format!("HDF5 error: {e}"))
}

/// A SOFA file opened through libhdf5.
pub struct Hdf5Container {
    name: String,
    file: File,
}

impl Hdf5Container {
    /// Open an HDF5 file read-only.
    ///
    /// Any failure of libhdf5 to open the file is reported as
    /// [`Error::InvalidFormat`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::invalid(format!("{}: {e}", path.display())))?;
        Ok(Self {
            name: path.display().to_string(),
            file,
        })
    }

    fn root_dataset(&self, key: &str) -> Option<hdf5::Dataset> {
        if !is_root_name(key) || !self.file.link_exists(key) {
            return None;
        }
        // a group of the same name is not a SOFA variable
        self.file.dataset(key).ok()
    }
}

impl Container for Hdf5Container {
    fn name(&self) -> &str {
        &self.name
    }

    fn dataset_names(&self) -> Result<Vec<String>> {
        let datasets = self.file.datasets().map_err(h5err)?;
        Ok(datasets
            .iter()
            .map(|ds| ds.name().trim_start_matches('/').to_string())
            .collect())
    }

    fn attribute_names(&self) -> Result<Vec<String>> {
        self.file.attr_names().map_err(h5err)
    }

    fn dataset(&self, key: &str) -> Result<Option<Value>> {
        match self.root_dataset(key) {
            Some(ds) => {
                trace!(key, shape = ?ds.shape(), "reading dataset");
                read_value(key, &ds, Origin::Dataset).map(Some)
            }
            None => Ok(None),
        }
    }

    fn attribute(&self, key: &str) -> Result<Option<Value>> {
        if !self.has_attribute(key)? {
            return Ok(None);
        }
        let attr = self.file.attr(key).map_err(h5err)?;
        read_value(key, &attr, Origin::Attribute).map(Some)
    }

    fn variable_attribute(&self, variable: &str, name: &str) -> Result<Option<Value>> {
        let Some(ds) = self.root_dataset(variable) else {
            return Ok(None);
        };
        if !ds.attr_names().map_err(h5err)?.iter().any(|n| n == name) {
            return Ok(None);
        }
        let attr = ds.attr(name).map_err(h5err)?;
        read_value(&format!("{variable}:{name}"), &attr, Origin::Attribute).map(Some)
    }

    fn variable_attribute_names(&self, variable: &str) -> Result<Vec<String>> {
        match self.root_dataset(variable) {
            Some(ds) => ds.attr_names().map_err(h5err),
            None => Ok(Vec::new()),
        }
    }

    fn has_dataset(&self, key: &str) -> Result<bool> {
        Ok(self.root_dataset(key).is_some())
    }

    fn dataset_shape(&self, key: &str) -> Result<Option<Vec<usize>>> {
        Ok(self.root_dataset(key).map(|ds| ds.shape()))
    }
}

/// SOFA keys live in the root group and never contain a path separator.
fn is_root_name(key: &str) -> bool {
    !key.is_empty() && !key.contains('/')
}

/// Where a value is read from.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    Dataset,
    Attribute,
}

/// Decode a dataset or attribute according to its stored datatype.
fn read_value(key: &str, c: &hdf5::Container, origin: Origin) -> Result<Value> {
    let descriptor = c.dtype().and_then(|t| t.to_descriptor()).map_err(h5err)?;
    match descriptor {
        TypeDescriptor::Float(FloatSize::U4) => read_numeric::<f32>(c, origin),
        TypeDescriptor::Float(FloatSize::U8) => read_numeric::<f64>(c, origin),
        TypeDescriptor::Integer(IntSize::U8) | TypeDescriptor::Unsigned(IntSize::U4) => {
            read_numeric::<i64>(c, origin)
        }
        TypeDescriptor::Unsigned(IntSize::U8) => read_unsigned64(key, c, origin),
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => read_numeric::<i32>(c, origin),
        TypeDescriptor::FixedAscii(1) if !c.is_scalar() => read_chars::<FixedAscii<1>>(c),
        TypeDescriptor::FixedUnicode(1) if !c.is_scalar() => read_chars::<FixedUnicode<1>>(c),
        TypeDescriptor::FixedAscii(len) => {
            check_capacity(key, len)?;
            read_text::<FixedAscii<TEXT_CAPACITY>>(c)
        }
        TypeDescriptor::FixedUnicode(len) => {
            check_capacity(key, len)?;
            read_text::<FixedUnicode<TEXT_CAPACITY>>(c)
        }
        TypeDescriptor::VarLenAscii => read_text::<VarLenAscii>(c),
        TypeDescriptor::VarLenUnicode => read_text::<VarLenUnicode>(c),
        other => Err(Error::UnsupportedDatatype(format!("{key}: {other}"))),
    }
}

/// Numeric attributes that hold one value decode to scalars, everything
/// else to an array of the stored shape.
fn read_numeric<T>(c: &hdf5::Container, origin: Origin) -> Result<Value>
where
    T: H5Type + Copy,
    NdArray: From<ndarray::ArrayD<T>>,
    Value: From<T>,
{
    if origin == Origin::Attribute && c.size() == 1 && c.ndim() <= 1 {
        let values: Vec<T> = c.read_raw().map_err(h5err)?;
        if let Some(v) = values.first() {
            return Ok(Value::from(*v));
        }
    }
    let array = c.read_dyn::<T>().map_err(h5err)?;
    Ok(Value::Array(NdArray::from(array)))
}

/// Unsigned 64-bit values are kept as `i64` and rejected when they do not
/// fit.
fn read_unsigned64(key: &str, c: &hdf5::Container, origin: Origin) -> Result<Value> {
    let array = c.read_dyn::<u64>().map_err(h5err)?;
    if let Some(v) = array.iter().find(|&&v| i64::try_from(v).is_err()) {
        return Err(Error::UnsupportedDatatype(format!(
            "{key}: uint64 value {v} exceeds the int64 range"
        )));
    }
    let array = array.mapv(|v| v as i64);
    if origin == Origin::Attribute && array.len() == 1 && array.ndim() <= 1 {
        if let Some(v) = array.iter().next() {
            return Ok(Value::Int(*v));
        }
    }
    Ok(Value::Array(NdArray::from(array)))
}

fn read_text<T: H5Type + Display>(c: &hdf5::Container) -> Result<Value> {
    if c.is_scalar() {
        let s: T = c.read_scalar().map_err(h5err)?;
        return Ok(Value::Text(clean(&s.to_string())));
    }
    let items: Vec<T> = c.read_raw().map_err(h5err)?;
    let mut items: Vec<String> = items.iter().map(|s| clean(&s.to_string())).collect();
    if c.ndim() == 1 && items.len() == 1 {
        return Ok(Value::Text(items.remove(0)));
    }
    Ok(Value::TextList(items))
}

/// netCDF `char` variable: one character per element, strings run along
/// the last axis.
fn read_chars<T: H5Type + Display>(c: &hdf5::Container) -> Result<Value> {
    let chars: Vec<T> = c.read_raw().map_err(h5err)?;
    let chars: Vec<String> = chars.iter().map(|ch| ch.to_string()).collect();
    Ok(join_char_rows(&chars, &c.shape()))
}

/// Join characters stored in row-major order into one string per row.
///
/// A single row (including 1-d storage) gives `Text`, more rows give
/// `TextList`. Trailing NULs of each row are dropped.
fn join_char_rows(chars: &[String], shape: &[usize]) -> Value {
    let Some((&width, outer)) = shape.split_last() else {
        return Value::Text(clean(&chars.concat()));
    };
    let num_rows: usize = outer.iter().product();
    let mut rows: Vec<String> = if width == 0 {
        vec![String::new(); num_rows]
    } else {
        chars.chunks(width).map(|row| clean(&row.concat())).collect()
    };
    if rows.len() == 1 {
        return Value::Text(rows.remove(0));
    }
    Value::TextList(rows)
}

fn clean(s: &str) -> String {
    s.trim_end_matches('\0').to_string()
}

fn check_capacity(key: &str, len: usize) -> Result<()> {
    if len > TEXT_CAPACITY {
        return Err(Error::UnsupportedDatatype(format!(
            "{key}: fixed-length string of {len} bytes exceeds {TEXT_CAPACITY}"
        )));
    }
    Ok(())
}
