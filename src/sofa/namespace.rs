//! Namespace views.
//!
//! A view carries nothing but the namespace name and a borrow of the
//! [`Sofa`] it came from. Every call goes back to the container, so a view
//! created before [`Sofa::close`] fails with `UseAfterClose` afterwards.

use crate::core::{NdArray, Value};
use crate::util::{Error, Result, ShapeRule};

use super::{resolve, AudioObject, Fir, Sofa};

/// Convert a missing key into `None`, keep every other outcome.
pub(crate) fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

// ============================================================================
// Generic namespace
// ============================================================================

/// Generic `Namespace.Field` access.
#[derive(Clone, Copy)]
pub struct Namespace<'a> {
    sofa: &'a Sofa,
    name: &'a str,
}

impl<'a> Namespace<'a> {
    pub(crate) fn new(sofa: &'a Sofa, name: &'a str) -> Self {
        Self { sofa, name }
    }

    /// Namespace name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The file this view reads from.
    pub fn sofa(&self) -> &'a Sofa {
        self.sofa
    }

    /// `name + separator`, the prefix of every stored key.
    fn prefix(&self) -> String {
        format!("{}{}", self.name, self.sofa.convention().separator_of(self.name))
    }

    /// Stored key of `field`.
    pub fn key(&self, field: &str) -> String {
        self.sofa.convention().key(self.name, field)
    }

    /// Resolve `field`.
    ///
    /// Looks up the dataset `key(field)`, then the root attribute of the same
    /// name, then (for `Variable_Attr` fields) the attribute `Attr` of the
    /// dataset `key(Variable)`. Fails with [`Error::NotFound`] naming the
    /// concatenated key.
    pub fn field(&self, field: &str) -> Result<Value> {
        self.sofa.with_container(|c| {
            self.sofa.check_datatype(c, self.name)?;
            resolve(c, &self.prefix(), field)
        })
    }

    /// Check if `field` resolves.
    pub fn has(&self, field: &str) -> Result<bool> {
        Ok(optional(self.field(field))?.is_some())
    }

    /// Resolve `field` as a numeric array.
    pub fn array(&self, field: &str) -> Result<NdArray> {
        self.field(field)?.into_array(&self.key(field))
    }

    /// Resolve `field` as a numeric array and check its shape.
    pub fn array_checked(&self, field: &str, rule: ShapeRule) -> Result<NdArray> {
        let key = self.key(field);
        let array = self.field(field)?.into_array(&key)?;
        rule.check(&key, array.shape())?;
        Ok(array)
    }

    /// Resolve `field` as a string.
    pub fn text(&self, field: &str) -> Result<String> {
        self.field(field)?.into_text(&self.key(field))
    }

    /// Read attribute `attr` attached to the dataset of `field`.
    pub fn attribute_of(&self, field: &str, attr: &str) -> Result<Value> {
        let variable = self.key(field);
        self.sofa.with_container(|c| {
            self.sofa.check_datatype(c, self.name)?;
            c.variable_attribute(&variable, attr)?
                .ok_or_else(|| Error::not_found(format!("{variable}_{attr}")))
        })
    }

    /// Read string attribute `attr` attached to the dataset of `field`.
    pub fn attribute_text_of(&self, field: &str, attr: &str) -> Result<String> {
        let key = format!("{}_{attr}", self.key(field));
        self.attribute_of(field, attr)?.into_text(&key)
    }

    /// Fields stored in this namespace: every root dataset or attribute whose
    /// name starts with the namespace prefix, prefix removed.
    pub fn fields(&self) -> Result<Vec<String>> {
        let prefix = self.prefix();
        self.sofa.with_container(|c| {
            let mut names = c.dataset_names()?;
            names.extend(c.attribute_names()?);
            let mut fields: Vec<String> = names
                .iter()
                .filter_map(|n| n.strip_prefix(prefix.as_str()))
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
            fields.sort();
            fields.dedup();
            Ok(fields)
        })
    }
}

impl std::fmt::Debug for Namespace<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace").field("name", &self.name).finish()
    }
}

// ============================================================================
// Audio objects
// ============================================================================

/// Typed view of `Listener`, `Receiver`, `Source` or `Emitter`.
#[derive(Clone, Copy, Debug)]
pub struct AudioObjectView<'a> {
    ns: Namespace<'a>,
}

impl<'a> AudioObjectView<'a> {
    pub(crate) fn new(ns: Namespace<'a>) -> Self {
        Self { ns }
    }

    /// The underlying generic view.
    pub fn namespace(&self) -> Namespace<'a> {
        self.ns
    }

    /// Resolve any field of this namespace.
    pub fn field(&self, field: &str) -> Result<Value> {
        self.ns.field(field)
    }

    /// `<Name>Position`, `[I|M, 3]` or `[R|E, 3, I|M]`.
    pub fn position(&self) -> Result<NdArray> {
        self.ns.array_checked("Position", ShapeRule::Coordinates)
    }

    /// `Type` attribute of `<Name>Position` (`cartesian` or `spherical`).
    pub fn position_type(&self) -> Result<String> {
        self.ns.attribute_text_of("Position", "Type")
    }

    /// `Units` attribute of `<Name>Position`.
    pub fn position_units(&self) -> Result<String> {
        self.ns.attribute_text_of("Position", "Units")
    }

    /// `<Name>View`, same shape rules as the position.
    pub fn view(&self) -> Result<NdArray> {
        self.ns.array_checked("View", ShapeRule::Coordinates)
    }

    /// `<Name>Up`, same shape rules as the position.
    pub fn up(&self) -> Result<NdArray> {
        self.ns.array_checked("Up", ShapeRule::Coordinates)
    }

    /// `<Name>Description`.
    pub fn description(&self) -> Result<String> {
        self.ns.text("Description")
    }

    /// Read the whole object: position with its `Type` and `Units`
    /// (required), description, view and up vectors (optional).
    pub fn read(&self) -> Result<AudioObject> {
        Ok(AudioObject {
            name: self.ns.name().to_string(),
            position: self.position()?,
            position_type: self.position_type()?,
            position_units: self.position_units()?,
            description: optional(self.description())?,
            view: optional(self.view())?,
            up: optional(self.up())?,
        })
    }
}

// ============================================================================
// Data
// ============================================================================

/// Typed view of the `Data` namespace.
///
/// Every access fails with [`Error::UnsupportedDatatype`] unless the
/// `DataType` root attribute is absent or names a supported datatype (FIR).
#[derive(Clone, Copy, Debug)]
pub struct DataView<'a> {
    ns: Namespace<'a>,
}

impl<'a> DataView<'a> {
    pub(crate) fn new(ns: Namespace<'a>) -> Self {
        Self { ns }
    }

    /// The underlying generic view.
    pub fn namespace(&self) -> Namespace<'a> {
        self.ns
    }

    /// Resolve any field of this namespace.
    pub fn field(&self, field: &str) -> Result<Value> {
        self.ns.field(field)
    }

    /// `Data.IR`, `[M, R, N]`.
    pub fn ir(&self) -> Result<NdArray> {
        self.ns.array_checked("IR", ShapeRule::ImpulseResponse)
    }

    /// `Data.Delay`, `[I|M, R]`.
    pub fn delay(&self) -> Result<NdArray> {
        self.ns.array_checked("Delay", ShapeRule::Delay)
    }

    /// `Data.SamplingRate`, `[I|M]`.
    pub fn sampling_rate(&self) -> Result<NdArray> {
        self.ns.array_checked("SamplingRate", ShapeRule::PerMeasurement)
    }

    /// `Units` attribute of `Data.SamplingRate`.
    pub fn sampling_rate_units(&self) -> Result<String> {
        self.ns.attribute_text_of("SamplingRate", "Units")
    }

    /// Read the FIR data set.
    pub fn fir(&self) -> Result<Fir> {
        Ok(Fir {
            ir: self.ir()?,
            delay: self.delay()?,
            sampling_rate: self.sampling_rate()?,
            sampling_rate_units: self.sampling_rate_units()?,
        })
    }
}

// ============================================================================
// Room
// ============================================================================

/// Typed view of the `Room` namespace.
#[derive(Clone, Copy, Debug)]
pub struct RoomView<'a> {
    ns: Namespace<'a>,
}

impl<'a> RoomView<'a> {
    pub(crate) fn new(ns: Namespace<'a>) -> Self {
        Self { ns }
    }

    /// The underlying generic view.
    pub fn namespace(&self) -> Namespace<'a> {
        self.ns
    }

    /// Resolve any field of this namespace.
    pub fn field(&self, field: &str) -> Result<Value> {
        self.ns.field(field)
    }

    /// `RoomType` (`free field`, `reverberant`, `shoebox`, ...).
    pub fn room_type(&self) -> Result<String> {
        self.ns.text("Type")
    }

    /// `RoomDescription`.
    pub fn description(&self) -> Result<String> {
        self.ns.text("Description")
    }
}
