//! # SOFA
//!
//! Read-only access to SOFA (Spatially Oriented Format for Acoustics)
//! files, AES69.
//!
//! **Reading files from disk needs the `hdf5` feature**, which links
//! libhdf5 (or builds it with `static`). Without it [`Sofa::open`] still
//! checks that the path exists, is readable and is HDF5, then fails with
//! [`Error::BackendUnavailable`]; [`Sofa::from_container`] works either way.
//!
//! ```toml
//! sofa = { version = "0.1", features = ["hdf5"] }
//! ```
//!
//! A SOFA file is an HDF5 (netCDF-4) container whose root datasets and
//! attributes are named by concatenating a namespace (`Listener`,
//! `Receiver`, `Source`, `Emitter`, `Room`, `Data`) with a field
//! (`Position`, `Description`, `IR`, ...). This crate maps
//! `Namespace.Field` onto those stored keys. Parsing of the container itself
//! is left to libhdf5 through the `hdf5` crate (feature `hdf5`).
//!
//! ## Modules
//!
//! - [`util`] - Errors, element kinds, shape rules
//! - [`core`] - Value model, convention table, container interface
//! - [`container`] - Signature probe, in-memory and HDF5 containers
//! - [`sofa`] - The [`Sofa`] file object and namespace views
//!
//! ## Example
//!
//! ```ignore
//! use sofa::Sofa;
//!
//! let sofa = Sofa::open("hrtf.sofa")?;
//! let description = sofa.listener().description()?;
//! let positions = sofa.receiver().position()?;
//! let same = sofa.get("Receiver", "Position")?;
//! ```

pub mod util;
pub mod core;
pub mod container;
pub mod sofa;

// Re-export commonly used types
pub use util::{Error, Result, ScalarKind, ShapeRule};
pub use crate::core::{Container, Convention, NdArray, Value};
pub use crate::sofa::Sofa;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::core::{Container, Convention, NamespaceKind, NdArray, Value};
    pub use crate::container::MemContainer;
    pub use crate::sofa::{
        AudioObject, AudioObjectView, DataView, Fir, GlobalAttributes, Namespace, RoomView, Sofa,
    };
}
