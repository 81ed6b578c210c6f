//! Abstract interface to the container library.
//!
//! SOFA files are HDF5 (netCDF-4) files. The accessor never parses them
//! itself; it asks a [`Container`] for root datasets, root attributes and
//! the attributes attached to datasets. Lookups of absent names return
//! `Ok(None)` so the accessor can fall through its lookup order; `Err` is
//! reserved for read failures.

use super::Value;
use crate::util::Result;

/// Read-only view of an opened container file.
///
/// Dropping the container releases the underlying file handle.
pub trait Container: Send + Sync {
    /// Get the container name/path.
    fn name(&self) -> &str;

    /// Names of the datasets in the root group.
    fn dataset_names(&self) -> Result<Vec<String>>;

    /// Names of the root attributes.
    fn attribute_names(&self) -> Result<Vec<String>>;

    /// Read a root dataset.
    fn dataset(&self, key: &str) -> Result<Option<Value>>;

    /// Read a root attribute.
    fn attribute(&self, key: &str) -> Result<Option<Value>>;

    /// Read an attribute attached to the root dataset `variable`.
    ///
    /// Returns `None` if either the dataset or the attribute is absent.
    fn variable_attribute(&self, variable: &str, name: &str) -> Result<Option<Value>>;

    /// Names of the attributes attached to the root dataset `variable`.
    fn variable_attribute_names(&self, variable: &str) -> Result<Vec<String>>;

    /// Check if a root dataset exists.
    fn has_dataset(&self, key: &str) -> Result<bool> {
        Ok(self.dataset_names()?.iter().any(|n| n == key))
    }

    /// Check if a root attribute exists.
    fn has_attribute(&self, key: &str) -> Result<bool> {
        Ok(self.attribute_names()?.iter().any(|n| n == key))
    }

    /// Shape of a root dataset without reading its data.
    fn dataset_shape(&self, key: &str) -> Result<Option<Vec<usize>>> {
        Ok(self.dataset(key)?.map(|v| match v {
            Value::Array(a) => a.shape().to_vec(),
            Value::TextList(items) => vec![items.len()],
            _ => Vec::new(),
        }))
    }
}
