//! Minimal fixed collaborators for headless hosts and tests.

use crate::host::{PresenceOracle, TerrainHeightOracle};
use crate::types::Position;

/// Terrain with the same elevation everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    /// Ground elevation
    pub elevation: f64,
}

impl FlatTerrain {
    /// Creates flat terrain at the given elevation.
    pub fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl TerrainHeightOracle for FlatTerrain {
    fn height(&self, _x: f64, _z: f64) -> f64 {
        self.elevation
    }
}

/// Presence that gives the same answer for every position.
///
/// `FixedPresence::Nowhere` models a dedicated host with no observers nearby,
/// `FixedPresence::Everywhere` forces every agent to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPresence {
    Nowhere,
    Everywhere,
}

impl PresenceOracle for FixedPresence {
    fn is_active_area(&self, _position: &Position) -> bool {
        matches!(self, FixedPresence::Everywhere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_terrain_ground() {
        let terrain = FlatTerrain::new(12.5);
        let p = terrain.ground(3.0, 4.0);
        assert_eq!(p, Position::new(3.0, 12.5, 4.0));
    }

    #[test]
    fn test_fixed_presence() {
        let p = Position::zeros();
        assert!(FixedPresence::Everywhere.is_active_area(&p));
        assert!(!FixedPresence::Nowhere.is_active_area(&p));
    }
}
