//! Edge placement: origin on one world edge, goal on the opposite one.

use rand::Rng;
use wanderer_env::{Position, TerrainHeightOracle, WorldBounds};

/// One of the four planar edges of the world extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// `x = min.x`
    West,
    /// `x = max.x`
    East,
    /// `z = min.z`
    South,
    /// `z = max.z`
    North,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::West, Edge::East, Edge::South, Edge::North];

    /// The edge across the world from this one.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::West => Edge::East,
            Edge::East => Edge::West,
            Edge::South => Edge::North,
            Edge::North => Edge::South,
        }
    }

    /// Picks an edge uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Edge {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Returns the edge a planar point lies on, if any.
    pub fn of(bounds: &WorldBounds, position: &Position) -> Option<Edge> {
        if position.x == bounds.min.x {
            Some(Edge::West)
        } else if position.x == bounds.max.x {
            Some(Edge::East)
        } else if position.z == bounds.min.z {
            Some(Edge::South)
        } else if position.z == bounds.max.z {
            Some(Edge::North)
        } else {
            None
        }
    }

    /// Samples a planar `(x, z)` point on this edge.
    ///
    /// Bounds must be validated first; an empty range panics in `gen_range`.
    fn sample<R: Rng + ?Sized>(self, rng: &mut R, bounds: &WorldBounds) -> (f64, f64) {
        match self {
            Edge::West => (bounds.min.x, rng.gen_range(bounds.min.z..bounds.max.z)),
            Edge::East => (bounds.max.x, rng.gen_range(bounds.min.z..bounds.max.z)),
            Edge::South => (rng.gen_range(bounds.min.x..bounds.max.x), bounds.min.z),
            Edge::North => (rng.gen_range(bounds.min.x..bounds.max.x), bounds.max.z),
        }
    }
}

/// A freshly placed route across the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRoute {
    /// Edge the origin lies on
    pub edge: Edge,

    /// Start point, elevation resolved from terrain
    pub origin: Position,

    /// End point on the opposite edge, elevation resolved from terrain
    pub goal: Position,
}

/// Places a route from a random edge to a random point on the opposite edge.
///
/// Terrain is queried exactly twice (origin and goal).
pub fn edge_route<R, T>(rng: &mut R, bounds: &WorldBounds, terrain: &T) -> EdgeRoute
where
    R: Rng + ?Sized,
    T: TerrainHeightOracle + ?Sized,
{
    let edge = Edge::random(rng);
    let (ox, oz) = edge.sample(rng, bounds);
    let (gx, gz) = edge.opposite().sample(rng, bounds);

    EdgeRoute {
        edge,
        origin: terrain.ground(ox, oz),
        goal: terrain.ground(gx, gz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;
    use wanderer_env::FlatTerrain;

    #[test]
    fn test_route_spans_opposite_edges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let bounds = WorldBounds::planar(0.0, 0.0, 100.0, 100.0);
        let terrain = FlatTerrain::new(4.0);

        for _ in 0..200 {
            let route = edge_route(&mut rng, &bounds, &terrain);
            assert_eq!(Edge::of(&bounds, &route.origin), Some(route.edge));
            assert_eq!(Edge::of(&bounds, &route.goal), Some(route.edge.opposite()));
            assert_eq!(route.origin.y, 4.0);
            assert_eq!(route.goal.y, 4.0);
            assert!(bounds.contains_planar(&route.origin));
            assert!(bounds.contains_planar(&route.goal));
        }
    }

    #[test]
    fn test_all_edges_are_used() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let seen: HashSet<Edge> = (0..100).map(|_| Edge::random(&mut rng)).collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_opposite_is_involution() {
        for edge in Edge::ALL {
            assert_ne!(edge.opposite(), edge);
            assert_eq!(edge.opposite().opposite(), edge);
        }
    }

    #[test]
    fn test_same_seed_same_route() {
        let bounds = WorldBounds::planar(-500.0, -500.0, 500.0, 500.0);
        let terrain = FlatTerrain::default();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);

        assert_eq!(
            edge_route(&mut a, &bounds, &terrain),
            edge_route(&mut b, &bounds, &terrain)
        );
    }
}
