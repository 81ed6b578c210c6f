//! In-memory container.
//!
//! Holds root datasets, root attributes and dataset attributes in plain
//! tables. Useful for synthetic SOFA layouts and for code that already has
//! the data loaded from somewhere else.
//!
//! ## Example
//!
//! ```
//! use ndarray::arr2;
//! use sofa::container::MemContainer;
//! use sofa::{NdArray, Sofa};
//!
//! let container = MemContainer::new("synthetic")
//!     .with_dataset("ReceiverPosition", NdArray::from(arr2(&[[0.0, 0.0, 0.0]])))
//!     .with_attribute("ListenerDescription", "test listener");
//! let sofa = Sofa::from_container(Box::new(container));
//!
//! assert_eq!(sofa.listener().description().unwrap(), "test listener");
//! ```

use crate::core::{AttributeTable, Container, Value};
use crate::util::Result;

/// Container backed by in-memory tables.
#[derive(Clone, Debug, Default)]
pub struct MemContainer {
    name: String,
    attributes: AttributeTable,
    datasets: AttributeTable,
    variable_attributes: Vec<(String, AttributeTable)>,
}

impl MemContainer {
    /// Create an empty container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add or replace a root attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Add or replace a root dataset.
    pub fn with_dataset(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.datasets.set(key, value);
        self
    }

    /// Attach an attribute to the dataset `variable`.
    ///
    /// The attribute is only visible while `variable` exists as a dataset.
    pub fn with_variable_attribute(
        mut self,
        variable: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let variable = variable.into();
        match self.variable_attributes.iter_mut().find(|(v, _)| *v == variable) {
            Some((_, table)) => table.set(name, value),
            None => {
                let mut table = AttributeTable::new();
                table.set(name, value);
                self.variable_attributes.push((variable, table));
            }
        }
        self
    }

    fn attributes_of(&self, variable: &str) -> Option<&AttributeTable> {
        if !self.datasets.contains(variable) {
            return None;
        }
        self.variable_attributes
            .iter()
            .find(|(v, _)| v == variable)
            .map(|(_, table)| table)
    }
}

impl Container for MemContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn dataset_names(&self) -> Result<Vec<String>> {
        Ok(self.datasets.names())
    }

    fn attribute_names(&self) -> Result<Vec<String>> {
        Ok(self.attributes.names())
    }

    fn dataset(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.datasets.get(key).cloned())
    }

    fn attribute(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.attributes.get(key).cloned())
    }

    fn variable_attribute(&self, variable: &str, name: &str) -> Result<Option<Value>> {
        Ok(self
            .attributes_of(variable)
            .and_then(|table| table.get(name))
            .cloned())
    }

    fn variable_attribute_names(&self, variable: &str) -> Result<Vec<String>> {
        Ok(self
            .attributes_of(variable)
            .map(AttributeTable::names)
            .unwrap_or_default())
    }

    fn has_dataset(&self, key: &str) -> Result<bool> {
        Ok(self.datasets.contains(key))
    }

    fn has_attribute(&self, key: &str) -> Result<bool> {
        Ok(self.attributes.contains(key))
    }
}
