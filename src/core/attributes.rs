//! Named value tables.
//!
//! Used by the in-memory container for its root attributes and for the
//! attributes attached to each dataset.

use smallvec::SmallVec;

use super::Value;

/// Ordered name -> value table.
///
/// Uses SmallVec optimization for the common case of few entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeTable {
    entries: SmallVec<[(String, Value); 4]>,
}

impl AttributeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing an existing entry of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();

        for (k, v) in &mut self.entries {
            if k == &name {
                *v = value;
                return;
            }
        }
        self.entries.push((name, value));
    }

    /// Get a value by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Check if a name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Iterate over name-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttributeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.set(k, v);
        }
        table
    }
}
