//! Shape rules for SOFA variables.
//!
//! SOFA names its array axes with single letters: `I` (singleton), `M`
//! (measurements), `R` (receivers), `E` (emitters), `N` (samples) and `C`
//! (coordinates, always 3). Typed getters check stored shapes against these
//! rules; generic field access never does.

use std::fmt;

use crate::util::{Error, Result};

/// Size of the coordinate axis `C`.
pub const COORDINATES: usize = 3;

/// Expected shape of a SOFA variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeRule {
    /// `[I|M, C]` or `[R|E, C, I|M]`: positions, view and up vectors
    Coordinates,
    /// `[M, R, N]`: impulse responses
    ImpulseResponse,
    /// `[I|M, R]`: broadband delays
    Delay,
    /// `[I|M]`: sampling rates
    PerMeasurement,
}

impl ShapeRule {
    /// Human readable form of the rule, used in errors.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Coordinates => "[I|M, 3] or [R|E, 3, I|M]",
            Self::ImpulseResponse => "[M, R, N]",
            Self::Delay => "[I|M, R]",
            Self::PerMeasurement => "[I|M]",
        }
    }

    /// Returns true if `shape` satisfies this rule.
    pub fn matches(self, shape: &[usize]) -> bool {
        match self {
            Self::Coordinates => match shape {
                [_, c] => *c == COORDINATES,
                [_, c, _] => *c == COORDINATES,
                _ => false,
            },
            Self::ImpulseResponse => shape.len() == 3,
            Self::Delay => shape.len() == 2,
            Self::PerMeasurement => shape.len() == 1,
        }
    }

    /// Check `shape` of the value stored under `key`.
    pub fn check(self, key: &str, shape: &[usize]) -> Result<()> {
        if self.matches(shape) {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                key: key.to_string(),
                expected: self.describe(),
                actual: shape.to_vec(),
            })
        }
    }
}

impl fmt::Display for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Format a shape as `[a x b x c]`, `[]` for scalars.
pub fn format_shape(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(|s| s.to_string()).collect();
    format!("[{}]", dims.join(" x "))
}
