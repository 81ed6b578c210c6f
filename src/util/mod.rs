//! Utility types for the SOFA reader.
//!
//! This module contains fundamental types used throughout the library:
//! - [`ScalarKind`] - Element kinds of stored values
//! - [`ShapeRule`] - Expected shapes of typed SOFA variables
//! - [`Error`] / [`Result`] - Error handling

mod error;
mod scalar;
mod shape;

pub use error::*;
pub use scalar::*;
pub use shape::*;
