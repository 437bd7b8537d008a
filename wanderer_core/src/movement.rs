//! Straight-line movement for virtual agents.
//!
//! No obstacle avoidance and no collision response: a virtual agent walks the
//! ground plane toward its goal and is glued to the terrain after every step.

use nalgebra::Vector3;
use wanderer_env::{Position, TerrainHeightOracle};

/// Advances `current` toward `goal` by `step_distance` on the ground plane.
///
/// When the goal is closer than one step the result snaps onto the goal's
/// planar coordinates. Elevation is always read from `terrain` at the new
/// point, including on snap, so a goal whose ground moved since creation is
/// reached at the current ground height.
pub fn step_toward<T>(terrain: &T, current: &Position, goal: &Position, step_distance: f64) -> Position
where
    T: TerrainHeightOracle + ?Sized,
{
    let direction = Vector3::new(goal.x - current.x, 0.0, goal.z - current.z);
    let distance = direction.norm();

    if distance < step_distance || distance == 0.0 {
        return terrain.ground(goal.x, goal.z);
    }

    let next = current + direction * (step_distance / distance);
    terrain.ground(next.x, next.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use wanderer_env::FlatTerrain;

    /// Terrain that slopes along x and counts queries.
    struct Slope {
        queries: Cell<usize>,
    }

    impl TerrainHeightOracle for Slope {
        fn height(&self, x: f64, _z: f64) -> f64 {
            self.queries.set(self.queries.get() + 1);
            x * 0.5
        }
    }

    #[test]
    fn test_single_step_along_z() {
        let terrain = FlatTerrain::new(2.0);
        let current = Position::new(50.0, 2.0, 50.0);
        let goal = Position::new(50.0, 2.0, 52.0);

        let next = step_toward(&terrain, &current, &goal, 0.1);
        assert_relative_eq!(next.x, 50.0);
        assert_relative_eq!(next.z, 50.1, epsilon = 1e-12);
        assert_eq!(next.y, 2.0);
    }

    #[test]
    fn test_step_ignores_elevation_difference() {
        let terrain = FlatTerrain::new(0.0);
        let current = Position::new(0.0, 0.0, 0.0);
        // Goal far above: planar distance is still 3-4-5
        let goal = Position::new(3.0, 1000.0, 4.0);

        let next = step_toward(&terrain, &current, &goal, 1.0);
        assert_relative_eq!(next.x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(next.z, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_elevation_follows_terrain() {
        let terrain = Slope { queries: Cell::new(0) };
        let current = Position::new(10.0, 5.0, 0.0);
        let goal = Position::new(20.0, 10.0, 0.0);

        let next = step_toward(&terrain, &current, &goal, 2.0);
        assert_relative_eq!(next.x, 12.0, epsilon = 1e-12);
        assert_relative_eq!(next.y, 6.0, epsilon = 1e-12);
        assert_eq!(terrain.queries.get(), 1);
    }

    #[test]
    fn test_snap_uses_fresh_elevation() {
        // Cached goal elevation is stale (99.0); terrain now says 0.5 * x
        let terrain = Slope { queries: Cell::new(0) };
        let current = Position::new(9.95, 0.0, 3.0);
        let goal = Position::new(10.0, 99.0, 3.0);

        let next = step_toward(&terrain, &current, &goal, 0.1);
        assert_eq!(next.x, 10.0);
        assert_eq!(next.z, 3.0);
        assert_relative_eq!(next.y, 5.0);
    }

    #[test]
    fn test_repeated_steps_terminate_on_goal() {
        let terrain = FlatTerrain::new(1.0);
        let goal = Position::new(37.3, 8.0, -12.9);
        let mut position = Position::new(0.0, 1.0, 0.0);
        let distance = (37.3f64.powi(2) + 12.9f64.powi(2)).sqrt();
        let expected = (distance / 0.7).ceil() as u32 + 1;

        let mut steps = 0;
        while position.x != goal.x || position.z != goal.z {
            position = step_toward(&terrain, &position, &goal, 0.7);
            steps += 1;
            assert!(steps <= expected, "did not converge in {} steps", expected);
        }

        assert_eq!(position, Position::new(37.3, 1.0, -12.9));
    }

    #[test]
    fn test_zero_distance_does_not_produce_nan() {
        let terrain = FlatTerrain::new(0.0);
        let here = Position::new(1.0, 0.0, 1.0);
        let next = step_toward(&terrain, &here, &here, 0.0);
        assert_eq!(next, here);
    }
}
