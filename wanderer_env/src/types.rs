//! Common types shared across the host boundary.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};

/// 3D world position; `y` is elevation.
pub type Position = nalgebra::Vector3<f64>;

/// Squared distance in the `(x, z)` plane, ignoring elevation.
pub fn planar_distance_sq(a: &Position, b: &Position) -> f64 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Opaque identifier of a host-owned physical object.
///
/// Only the host assigns these; the manager stores and returns them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalHandle(pub u64);

impl PhysicalHandle {
    /// Returns the raw host identifier.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PhysicalHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Axis-aligned extent of the host world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Minimum corner
    pub min: Position,

    /// Maximum corner
    pub max: Position,
}

impl WorldBounds {
    /// Creates bounds from two corners.
    pub fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    /// Creates bounds spanning `[min_x, max_x] x [min_z, max_z]` at elevation 0.
    pub fn planar(min_x: f64, min_z: f64, max_x: f64, max_z: f64) -> Self {
        Self {
            min: Position::new(min_x, 0.0, min_z),
            max: Position::new(max_x, 0.0, max_z),
        }
    }

    /// Checks that the bounds have a non-empty, finite ground plane.
    ///
    /// Elevation is not checked: agents take their height from terrain, and a
    /// flat extent (`min.y == max.y`) is the common case. The span `max - min`
    /// must be finite too, otherwise uniform sampling along the edge overflows.
    pub fn validate(&self) -> Result<(), EnvError> {
        Self::validate_axis('x', self.min.x, self.max.x)?;
        Self::validate_axis('z', self.min.z, self.max.z)
    }

    fn validate_axis(axis: char, min: f64, max: f64) -> Result<(), EnvError> {
        // Written as !(min < max) so NaN is rejected too.
        if !(min < max) {
            return Err(EnvError::degenerate(axis, min, max));
        }
        if !(max - min).is_finite() {
            return Err(EnvError::unbounded(axis, min, max));
        }
        Ok(())
    }

    /// Returns true if [`validate`](Self::validate) would fail.
    pub fn is_degenerate(&self) -> bool {
        self.validate().is_err()
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along z.
    pub fn depth(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// Returns true if the planar part of `position` lies inside the bounds.
    pub fn contains_planar(&self, position: &Position) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.z >= self.min.z
            && position.z <= self.max.z
    }
}

impl std::fmt::Display for WorldBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "min=({:.0}, {:.0}, {:.0}) max=({:.0}, {:.0}, {:.0})",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_bounds_are_valid() {
        let bounds = WorldBounds::planar(0.0, 0.0, 100.0, 100.0);
        assert!(bounds.validate().is_ok());
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.depth(), 100.0);
    }

    #[test]
    fn test_degenerate_bounds() {
        let bounds = WorldBounds::planar(10.0, 0.0, 10.0, 100.0);
        assert_eq!(bounds.validate(), Err(EnvError::degenerate('x', 10.0, 10.0)));

        let bounds = WorldBounds::planar(0.0, 50.0, 100.0, 20.0);
        assert!(bounds.is_degenerate());

        let bounds = WorldBounds::planar(f64::NAN, 0.0, 100.0, 100.0);
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn test_unbounded_extents_are_rejected() {
        let infinite = WorldBounds::planar(f64::NEG_INFINITY, 0.0, f64::INFINITY, 100.0);
        assert!(matches!(
            infinite.validate(),
            Err(EnvError::UnboundedExtent { axis: 'x', .. })
        ));

        let half_open = WorldBounds::planar(0.0, 0.0, 100.0, f64::INFINITY);
        assert!(matches!(
            half_open.validate(),
            Err(EnvError::UnboundedExtent { axis: 'z', .. })
        ));

        // Each corner is finite but the span is not
        let huge = WorldBounds::planar(-1e308, -1e308, 1e308, 1e308);
        assert_eq!(huge.validate(), Err(EnvError::unbounded('x', -1e308, 1e308)));

        let wide = WorldBounds::planar(-1e300, -1e300, 1e300, 1e300);
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn test_planar_distance_ignores_elevation() {
        let a = Position::new(0.0, 500.0, 0.0);
        let b = Position::new(3.0, -20.0, 4.0);
        assert_eq!(planar_distance_sq(&a, &b), 25.0);
    }

    #[test]
    fn test_contains_planar() {
        let bounds = WorldBounds::planar(0.0, 0.0, 100.0, 100.0);
        assert!(bounds.contains_planar(&Position::new(100.0, 40.0, 0.0)));
        assert!(!bounds.contains_planar(&Position::new(100.1, 0.0, 50.0)));
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(PhysicalHandle(42).to_string(), "entity:42");
    }
}
