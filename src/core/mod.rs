//! Core layer - value model, convention table and the container interface.
//!
//! This module provides:
//! - [`Value`] / [`NdArray`] - Decoded field values
//! - [`AttributeTable`] - Ordered name -> value storage
//! - [`Convention`] - Namespace registry and key construction
//! - [`Container`] - Interface to the container library

mod attributes;
mod convention;
mod traits;
mod value;

pub use attributes::AttributeTable;
pub use convention::{
    Convention, NamespaceKind, NamespaceSpec,
    DATATYPE_ATTRIBUTE, OPTIONAL_GLOBALS, REQUIRED_GLOBALS,
};
pub use traits::Container;
pub use value::{NdArray, Value};
