//! Typed readers for whole SOFA objects.

use std::fmt;

use crate::core::{NdArray, DATATYPE_ATTRIBUTE};
use crate::util::{Error, Result};

use super::namespace::optional;
use super::Sofa;

/// A listener, receiver, source or emitter read in one go.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioObject {
    /// Namespace the object was read from (`Listener`, ...)
    pub name: String,
    pub position: NdArray,
    /// `cartesian` or `spherical`
    pub position_type: String,
    pub position_units: String,
    pub description: Option<String>,
    pub view: Option<NdArray>,
    pub up: Option<NdArray>,
}

impl AudioObject {
    /// Number of stored positions.
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Check if no positions are stored.
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Check if positions are spherical coordinates.
    pub fn is_spherical(&self) -> bool {
        self.position_type == "spherical"
    }
}

impl fmt::Display for AudioObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.len(), self.name)
    }
}

/// Finite impulse response data: `Data.IR`, `Data.Delay` and
/// `Data.SamplingRate` with its units.
#[derive(Clone, Debug, PartialEq)]
pub struct Fir {
    /// `[M, R, N]`
    pub ir: NdArray,
    /// `[I|M, R]`
    pub delay: NdArray,
    /// `[I|M]`
    pub sampling_rate: NdArray,
    pub sampling_rate_units: String,
}

impl Fir {
    /// Number of measurements (`M`).
    pub fn num_measurements(&self) -> usize {
        self.axis(0)
    }

    /// Number of receivers (`R`).
    pub fn num_receivers(&self) -> usize {
        self.axis(1)
    }

    /// Number of samples per impulse response (`N`).
    pub fn num_samples(&self) -> usize {
        self.axis(2)
    }

    fn axis(&self, index: usize) -> usize {
        self.ir.shape().get(index).copied().unwrap_or(0)
    }

    /// The first sampling rate, which is the only one for `[I]` storage.
    pub fn sampling_rate_hz(&self) -> Option<f64> {
        self.sampling_rate.first_f64()
    }
}

/// SOFA global (root) attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalAttributes {
    pub conventions: String,
    pub version: String,
    pub sofa_conventions: String,
    pub sofa_conventions_version: String,
    pub data_type: String,
    pub room_type: String,
    pub title: String,
    pub date_created: String,
    pub date_modified: String,
    pub api_name: String,
    pub api_version: String,
    pub author_contact: String,
    pub organization: String,
    pub license: String,

    pub application_name: Option<String>,
    pub application_version: Option<String>,
    pub comment: Option<String>,
    pub history: Option<String>,
    pub references: Option<String>,
    pub origin: Option<String>,
}

impl GlobalAttributes {
    pub(crate) fn read(sofa: &Sofa) -> Result<Self> {
        let required = |name: &str| sofa.attribute_text(name);
        let other = |name: &str| optional(sofa.attribute_text(name));

        Ok(Self {
            conventions: required("Conventions")?,
            version: required("Version")?,
            sofa_conventions: required("SOFAConventions")?,
            sofa_conventions_version: required("SOFAConventionsVersion")?,
            data_type: required(DATATYPE_ATTRIBUTE)?,
            room_type: required("RoomType")?,
            title: required("Title")?,
            date_created: required("DateCreated")?,
            date_modified: required("DateModified")?,
            api_name: required("APIName")?,
            api_version: required("APIVersion")?,
            author_contact: required("AuthorContact")?,
            organization: required("Organization")?,
            license: required("License")?,

            application_name: other("ApplicationName")?,
            application_version: other("ApplicationVersion")?,
            comment: other("Comment")?,
            history: other("History")?,
            references: other("References")?,
            origin: other("Origin")?,
        })
    }
}

/// What a file is missing from its convention.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConventionReport {
    /// Required root attributes that are absent
    pub missing_required: Vec<String>,
    /// Value of the `DataType` root attribute
    pub datatype: Option<String>,
    /// Whether `datatype` can be decoded
    pub datatype_supported: bool,
}

impl ConventionReport {
    pub(crate) fn build(sofa: &Sofa) -> Result<Self> {
        let present = sofa.attribute_names()?;
        let missing_required = sofa
            .convention()
            .required_globals()
            .iter()
            .filter(|name| !present.iter().any(|p| p == *name))
            .map(|name| name.to_string())
            .collect();
        // a non-text DataType is reported as unsupported rather than failing
        let datatype = match sofa.datatype() {
            Ok(datatype) => datatype,
            Err(Error::TypeMismatch { .. }) => None,
            Err(e) => return Err(e),
        };
        let datatype_supported = datatype
            .as_deref()
            .is_some_and(|d| sofa.convention().supports_datatype(d));

        Ok(Self {
            missing_required,
            datatype,
            datatype_supported,
        })
    }

    /// True if nothing required is missing and the data can be decoded.
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty() && self.datatype_supported
    }
}
