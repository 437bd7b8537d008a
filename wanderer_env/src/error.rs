//! Error types for the host boundary.

use thiserror::Error;

/// Errors raised while validating host-provided data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    /// World extent has no area on a planar axis (min >= max)
    #[error("Degenerate world bounds on {axis} axis: min={min}, max={max}")]
    DegenerateBounds {
        axis: char,
        min: f64,
        max: f64,
    },

    /// World extent is infinite on a planar axis, or too wide to sample from
    #[error("Unbounded world extent on {axis} axis: min={min}, max={max}")]
    UnboundedExtent {
        axis: char,
        min: f64,
        max: f64,
    },
}

impl EnvError {
    /// Creates a degenerate-bounds error.
    pub fn degenerate(axis: char, min: f64, max: f64) -> Self {
        Self::DegenerateBounds { axis, min, max }
    }

    /// Creates an unbounded-extent error.
    pub fn unbounded(axis: char, min: f64, max: f64) -> Self {
        Self::UnboundedExtent { axis, min, max }
    }
}
