//! HDF5 file signature detection.
//!
//! A file is only handed to the container library once its signature has
//! been found, so arbitrary bytes are rejected with
//! [`Error::InvalidFormat`](crate::Error::InvalidFormat) before libhdf5 sees
//! them.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::util::{Error, Result};

/// The 8-byte HDF5 magic signature.
pub const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1A, b'\n'];

/// First non-zero offset the signature may appear at (after a user block).
const FIRST_USER_BLOCK: u64 = 512;

/// Search for the HDF5 signature in an in-memory buffer.
///
/// The signature may appear at offset 0, 512, 1024, 2048, ...
pub fn find_signature(data: &[u8]) -> Option<usize> {
    let mut offset = 0usize;
    while offset + HDF5_SIGNATURE.len() <= data.len() {
        if data[offset..offset + HDF5_SIGNATURE.len()] == HDF5_SIGNATURE {
            return Some(offset);
        }
        offset = next_offset(offset as u64) as usize;
    }
    None
}

/// Check that `path` is a readable HDF5 file and return the signature offset.
///
/// Fails with `FileNotFound`, `PermissionDenied` or `InvalidFormat`.
pub fn probe(path: &Path) -> Result<u64> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        return Err(Error::invalid(format!("{}: not a regular file", path.display())));
    }

    let size = metadata.len();
    let mut buf = [0u8; 8];
    let mut offset = 0u64;
    while offset + HDF5_SIGNATURE.len() as u64 <= size {
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        if buf == HDF5_SIGNATURE {
            return Ok(offset);
        }
        offset = next_offset(offset);
    }

    Err(Error::invalid(format!(
        "{}: HDF5 signature not found",
        path.display()
    )))
}

/// Map an I/O error from opening `path` onto the error taxonomy.
pub(crate) fn open_error(path: &Path, e: std::io::Error) -> Error {
    match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
        _ => Error::Io(e),
    }
}

#[inline]
fn next_offset(offset: u64) -> u64 {
    if offset == 0 {
        FIRST_USER_BLOCK
    } else {
        offset * 2
    }
}
