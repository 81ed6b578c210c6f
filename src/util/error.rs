//! Error types for the SOFA reader.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SOFA operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exists but cannot be read by this process
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File is not a well-formed container
    #[error("Invalid SOFA file: {0}")]
    InvalidFormat(String),

    /// Requested namespace/field key is absent
    #[error("Key not found: {key}")]
    NotFound { key: String },

    /// Field exists but its stored representation cannot be decoded
    #[error("Unsupported datatype: {0}")]
    UnsupportedDatatype(String),

    /// Access after the file handle was released
    #[error("SOFA file is closed")]
    UseAfterClose,

    /// Stored array shape does not match the field's semantic
    #[error("Shape mismatch for {key}: expected {expected}, got {actual:?}")]
    ShapeMismatch {
        key: String,
        expected: &'static str,
        actual: Vec<usize>,
    },

    /// Stored value kind does not match the requested kind
    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Failure reported by the container library after open
    #[error("Container error: {0}")]
    Container(String),

    /// Crate was built without a container backend
    #[error("No container backend available; rebuild with the `hdf5` feature")]
    BackendUnavailable,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not-found error for a stored key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an invalid format error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create a container backend error.
    pub fn container(msg: impl Into<String>) -> Self {
        Self::Container(msg.into())
    }

    /// True for a missing key, as opposed to a read failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for SOFA operations.
pub type Result<T> = std::result::Result<T, Error>;
