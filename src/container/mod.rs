//! Container backends.
//!
//! - [`probe`] - Existence, permission and HDF5 signature checks
//! - [`MemContainer`] - In-memory container
//! - `Hdf5Container` - libhdf5-backed container (feature `hdf5`)

mod memory;
mod signature;

#[cfg(feature = "hdf5")]
mod hdf5;

use std::path::Path;

use tracing::debug;

use crate::core::Container;
use crate::util::Result;

pub use memory::MemContainer;
pub use signature::{find_signature, probe, HDF5_SIGNATURE};

#[cfg(feature = "hdf5")]
pub use self::hdf5::Hdf5Container;

/// Open `path` with the container library.
///
/// The file is probed first, so a missing file, an unreadable file and a
/// file that is not HDF5 are told apart before the library is involved.
pub fn open_container(path: &Path) -> Result<Box<dyn Container>> {
    let offset = probe(path)?;
    debug!(path = %path.display(), offset, "HDF5 signature found");

    #[cfg(feature = "hdf5")]
    {
        Ok(Box::new(Hdf5Container::open(path)?))
    }

    #[cfg(not(feature = "hdf5"))]
    {
        Err(crate::util::Error::BackendUnavailable)
    }
}
