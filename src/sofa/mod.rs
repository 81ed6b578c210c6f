//! High-level SOFA API.
//!
//! This module provides the main entry point for reading SOFA files:
//! - [`Sofa`] - An opened file and its root attributes
//! - [`Namespace`] - Generic `Namespace.Field` access
//! - [`AudioObjectView`] / [`DataView`] / [`RoomView`] - Typed namespace views
//! - [`AudioObject`] / [`Fir`] / [`GlobalAttributes`] - Typed readers
//!
//! ## Example
//!
//! ```ignore
//! use sofa::Sofa;
//!
//! let sofa = Sofa::open("subject_003.sofa")?;
//! let positions = sofa.source().position()?;
//! let ir = sofa.data().ir()?;
//! println!("{} measurements", positions.len());
//! ```

mod namespace;
mod objects;

use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, info_span, trace};

use crate::container::open_container;
use crate::core::{Container, Convention, NamespaceKind, Value, DATATYPE_ATTRIBUTE};
use crate::util::{Error, Result};

pub use namespace::{AudioObjectView, DataView, Namespace, RoomView};
pub use objects::{AudioObject, ConventionReport, Fir, GlobalAttributes};

/// An opened SOFA file.
///
/// Owns the container handle. The handle is released by [`Sofa::close`] or
/// when the value is dropped; afterwards every access fails with
/// [`Error::UseAfterClose`]. A `Sofa` is `Send + Sync` and can be shared
/// between readers.
pub struct Sofa {
    name: String,
    convention: Convention,
    handle: RwLock<Option<Box<dyn Container>>>,
}

impl Sofa {
    /// Open a SOFA file for reading.
    ///
    /// # Errors
    /// - [`Error::FileNotFound`] if `path` does not exist
    /// - [`Error::PermissionDenied`] if it cannot be read
    /// - [`Error::InvalidFormat`] if it is not an HDF5 container
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, Convention::sofa())
    }

    /// Open a SOFA file with an explicit naming convention.
    pub fn open_with<P: AsRef<Path>>(path: P, convention: Convention) -> Result<Self> {
        let path = path.as_ref();
        let _span = info_span!("sofa_open", path = %path.display()).entered();
        let container = open_container(path)?;
        debug!(convention = convention.name(), "opened");
        Ok(Self::with_convention(container, convention))
    }

    /// Wrap an already opened container using the SOFA convention.
    pub fn from_container(container: Box<dyn Container>) -> Self {
        Self::with_convention(container, Convention::sofa())
    }

    /// Wrap an already opened container.
    pub fn with_convention(container: Box<dyn Container>, convention: Convention) -> Self {
        Self {
            name: container.name().to_string(),
            convention,
            handle: RwLock::new(Some(container)),
        }
    }

    /// Get the file name/path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The naming convention this file is read with.
    pub fn convention(&self) -> &Convention {
        &self.convention
    }

    /// Check if the handle is still open.
    pub fn is_open(&self) -> bool {
        self.handle.read().is_some()
    }

    /// Release the container handle.
    ///
    /// Returns `true` if this call released it, `false` if the file was
    /// already closed.
    pub fn close(&self) -> bool {
        let released = self.handle.write().take();
        match released {
            Some(container) => {
                debug!(name = container.name(), "closing");
                drop(container);
                true
            }
            None => false,
        }
    }

    /// Run `f` against the open container.
    pub(crate) fn with_container<T>(
        &self,
        f: impl FnOnce(&dyn Container) -> Result<T>,
    ) -> Result<T> {
        let guard = self.handle.read();
        match guard.as_deref() {
            Some(container) => f(container),
            None => Err(Error::UseAfterClose),
        }
    }

    // === Field access ===

    /// Resolve `namespace.field`.
    ///
    /// Equivalent to `self.namespace(namespace).field(field)`.
    pub fn get(&self, namespace: &str, field: &str) -> Result<Value> {
        self.namespace(namespace).field(field)
    }

    /// Resolve a dotted path such as `"Listener.Description"`.
    ///
    /// Only the first `.` splits, so `"Data.SamplingRate"` addresses the
    /// `SamplingRate` field of `Data`.
    pub fn get_path(&self, path: &str) -> Result<Value> {
        match path.split_once('.') {
            Some((namespace, field)) if !namespace.is_empty() && !field.is_empty() => {
                self.get(namespace, field)
            }
            _ => Err(Error::not_found(path)),
        }
    }

    /// Resolve a stored key directly: dataset, then root attribute, then
    /// `Variable_Attr` variable attribute.
    ///
    /// Keys under a data namespace (`Data.*`) are gated on `DataType` like
    /// [`Sofa::get`].
    pub fn lookup(&self, key: &str) -> Result<Value> {
        self.with_container(|c| {
            self.check_key_datatype(c, key)?;
            resolve(c, "", key)
        })
    }

    /// Read a root attribute by exact name.
    pub fn attribute(&self, name: &str) -> Result<Value> {
        self.with_container(|c| {
            self.check_key_datatype(c, name)?;
            c.attribute(name)?.ok_or_else(|| Error::not_found(name))
        })
    }

    /// Read a root string attribute by exact name.
    pub fn attribute_text(&self, name: &str) -> Result<String> {
        self.attribute(name)?.into_text(name)
    }

    /// Read an attribute attached to the dataset `variable`.
    pub fn variable_attribute(&self, variable: &str, name: &str) -> Result<Value> {
        self.with_container(|c| {
            self.check_key_datatype(c, variable)?;
            c.variable_attribute(variable, name)?
                .ok_or_else(|| Error::not_found(format!("{variable}_{name}")))
        })
    }

    /// Names of all root datasets.
    pub fn dataset_names(&self) -> Result<Vec<String>> {
        self.with_container(|c| c.dataset_names())
    }

    /// Names of all root attributes.
    pub fn attribute_names(&self) -> Result<Vec<String>> {
        self.with_container(|c| c.attribute_names())
    }

    /// Shape of a root dataset without reading its data. Not gated on
    /// `DataType`.
    pub fn dataset_shape(&self, key: &str) -> Result<Vec<usize>> {
        self.with_container(|c| c.dataset_shape(key)?.ok_or_else(|| Error::not_found(key)))
    }

    /// The `DataType` root attribute, if present.
    pub fn datatype(&self) -> Result<Option<String>> {
        self.with_container(|c| match c.attribute(DATATYPE_ATTRIBUTE)? {
            Some(v) => v.into_text(DATATYPE_ATTRIBUTE).map(Some),
            None => Ok(None),
        })
    }

    // === Namespaces ===

    /// Generic view of any namespace, registered or not.
    pub fn namespace<'a>(&'a self, name: &'a str) -> Namespace<'a> {
        Namespace::new(self, name)
    }

    /// Typed view of an audio object namespace (`Listener`, `Receiver`, ...).
    pub fn audio_object<'a>(&'a self, name: &'a str) -> AudioObjectView<'a> {
        AudioObjectView::new(self.namespace(name))
    }

    /// The `Listener` namespace.
    pub fn listener(&self) -> AudioObjectView<'_> {
        self.audio_object("Listener")
    }

    /// The `Receiver` namespace.
    pub fn receiver(&self) -> AudioObjectView<'_> {
        self.audio_object("Receiver")
    }

    /// The `Source` namespace.
    pub fn source(&self) -> AudioObjectView<'_> {
        self.audio_object("Source")
    }

    /// The `Emitter` namespace.
    pub fn emitter(&self) -> AudioObjectView<'_> {
        self.audio_object("Emitter")
    }

    /// The `Room` namespace.
    pub fn room(&self) -> RoomView<'_> {
        RoomView::new(self.namespace("Room"))
    }

    /// The `Data` namespace.
    pub fn data(&self) -> DataView<'_> {
        DataView::new(self.namespace("Data"))
    }

    // === Convention-level readers ===

    /// Read the SOFA global attributes.
    ///
    /// Fails with [`Error::NotFound`] on the first missing required one.
    pub fn globals(&self) -> Result<GlobalAttributes> {
        GlobalAttributes::read(self)
    }

    /// Report what the file is missing from the convention, without failing.
    pub fn check(&self) -> Result<ConventionReport> {
        ConventionReport::build(self)
    }

    /// Apply [`Sofa::check_datatype`] to a raw key stored under a data
    /// namespace.
    fn check_key_datatype(&self, c: &dyn Container, key: &str) -> Result<()> {
        if key == DATATYPE_ATTRIBUTE {
            return Ok(());
        }
        let data_namespace = self
            .convention
            .namespaces()
            .iter()
            .filter(|ns| ns.kind == NamespaceKind::Data)
            .find(|ns| key.starts_with(&ns.key("")));
        match data_namespace {
            Some(ns) => self.check_datatype(c, ns.name),
            None => Ok(()),
        }
    }

    /// Reject `Data` access when the stored `DataType` cannot be decoded.
    pub(crate) fn check_datatype(&self, c: &dyn Container, namespace: &str) -> Result<()> {
        if self.convention.kind_of(namespace) != NamespaceKind::Data {
            return Ok(());
        }
        match c.attribute(DATATYPE_ATTRIBUTE)? {
            None => Ok(()),
            Some(Value::Text(datatype)) if self.convention.supports_datatype(&datatype) => Ok(()),
            Some(Value::Text(datatype)) => Err(Error::UnsupportedDatatype(format!(
                "{DATATYPE_ATTRIBUTE} '{datatype}'"
            ))),
            Some(other) => Err(Error::UnsupportedDatatype(format!(
                "{DATATYPE_ATTRIBUTE} stored as {}",
                other.kind_name()
            ))),
        }
    }
}

impl std::fmt::Debug for Sofa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sofa")
            .field("name", &self.name)
            .field("convention", &self.convention.name())
            .field("open", &self.is_open())
            .finish()
    }
}

/// Resolve `prefix + field` against the container tables.
///
/// Order: dataset, root attribute, then for `Variable_Attr` fields the
/// attribute `Attr` of dataset `prefix + Variable`.
pub(crate) fn resolve(c: &dyn Container, prefix: &str, field: &str) -> Result<Value> {
    let key = format!("{prefix}{field}");
    if let Some(value) = c.dataset(&key)? {
        trace!(key = %key, "resolved dataset");
        return Ok(value);
    }
    if let Some(value) = c.attribute(&key)? {
        trace!(key = %key, "resolved attribute");
        return Ok(value);
    }
    if let Some((variable, attr)) = field.rsplit_once('_') {
        if !variable.is_empty() && !attr.is_empty() {
            let variable = format!("{prefix}{variable}");
            if let Some(value) = c.variable_attribute(&variable, attr)? {
                trace!(key = %key, variable = %variable, attr, "resolved variable attribute");
                return Ok(value);
            }
        }
    }
    Err(Error::not_found(key))
}
