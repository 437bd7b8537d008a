//! Query traits the host world exposes to the lifecycle manager.

use crate::factory::PhysicalAgentFactory;
use crate::types::Position;

/// Ground elevation lookup.
///
/// Pure query: implementations must not mutate host state. The manager calls
/// this at agent creation (origin and goal) and after every virtual step.
pub trait TerrainHeightOracle {
    /// Returns the ground elevation at planar coordinate `(x, z)`.
    fn height(&self, x: f64, z: f64) -> f64;

    /// Returns `(x, height(x, z), z)`.
    fn ground(&self, x: f64, z: f64) -> Position {
        Position::new(x, self.height(x, z), z)
    }
}

/// Observer-radius lookup.
///
/// A position is "active" when the host fully simulates objects there, i.e.
/// it lies within the active radius of at least one observer.
pub trait PresenceOracle {
    /// Returns true if `position` is inside any observer's active area.
    fn is_active_area(&self, position: &Position) -> bool;
}

/// Everything a tick needs from the host, as one bound.
///
/// Blanket-implemented for any type providing all three collaborators.
pub trait HostWorld: TerrainHeightOracle + PresenceOracle + PhysicalAgentFactory {}

impl<T> HostWorld for T where T: TerrainHeightOracle + PresenceOracle + PhysicalAgentFactory {}

impl<T: TerrainHeightOracle + ?Sized> TerrainHeightOracle for &T {
    fn height(&self, x: f64, z: f64) -> f64 {
        (**self).height(x, z)
    }
}

impl<T: PresenceOracle + ?Sized> PresenceOracle for &T {
    fn is_active_area(&self, position: &Position) -> bool {
        (**self).is_active_area(position)
    }
}
